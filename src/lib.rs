//! # incasso
//!
//! SEPA Direct Debit initiation files (ISO 20022 `pain.008.001.02`) for
//! Dutch creditors: collect transactions, then generate one XML document
//! with a single payment information batch.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! The time a document is generated at comes from an injected
//! [`Clock`](crate::core::Clock), so output is reproducible in tests.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use incasso::core::*;
//! use rust_decimal_macros::dec;
//!
//! let creditor = Creditor::new("Celp BV", "NL91ABNA0417164300", "12345678");
//! assert_eq!(creditor_identifier("12345678").unwrap(), "NL69ZZZ123456780000");
//!
//! let mut file = DirectDebitFile::new("MSG-2024-06-001", creditor);
//! file.add_transaction(
//!     TransactionBuilder::new("E2E-0001", dec!(12.5))
//!         .mandate("MNDT-0001", NaiveDate::from_ymd_opt(2023, 11, 1).unwrap())
//!         .debtor("J. Jansen", "NL02RABO0123456789")
//!         .remittance("Contributie juni")
//!         .build(),
//! );
//!
//! assert_eq!(file.number_of_transactions(), 1);
//! assert_eq!(format_amount(dec!(12.5)), "12.50");
//! assert!(validate_direct_debit(&file).is_empty());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Types, Creditor Identifier, amount formatting, validation |
//! | `pain008` | pain.008.001.02 XML generation and delivery helpers |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "pain008")]
pub mod pain008;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
