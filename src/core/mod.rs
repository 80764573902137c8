//! Core direct debit types, Creditor Identifier calculation, amount
//! formatting and validation.
//!
//! Everything here is independent of the XML syntax; the `pain008` module
//! turns a [`DirectDebitFile`] into a document.

mod amount;
mod builder;
mod clock;
mod creditor_id;
mod error;
mod file;
mod types;
mod validation;

pub use amount::*;
pub use builder::*;
pub use clock::*;
pub use creditor_id::*;
pub use error::*;
pub use file::*;
pub use types::*;
pub use validation::*;
