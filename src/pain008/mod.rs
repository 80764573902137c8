//! ISO 20022 pain.008.001.02 (SEPA Direct Debit initiation) generation.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use incasso::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut file = DirectDebitFile::new(
//!     "MSG-2024-06-001",
//!     Creditor::new("Celp BV", "NL91ABNA0417164300", "12345678"),
//! );
//! file.add_transaction(
//!     TransactionBuilder::new("E2E-0001", dec!(12.50))
//!         .mandate("MNDT-0001", NaiveDate::from_ymd_opt(2023, 11, 1).unwrap())
//!         .debtor("J. Jansen", "NL02RABO0123456789")
//!         .remittance("Contributie juni")
//!         .build(),
//! );
//!
//! let now = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap().and_hms_opt(9, 0, 0).unwrap();
//! let xml = file.to_xml(&FixedClock(now)).unwrap();
//! assert!(xml.contains("<NbOfTxs>1</NbOfTxs>"));
//! assert!(xml.contains("<Id>NL69ZZZ123456780000</Id>"));
//! ```

pub mod delivery;
mod document;
pub(crate) mod xml_utils;

use chrono::NaiveDateTime;

pub use delivery::{BufferedResponse, Delivery, DeliveryOptions, ResponseChannel};
pub use document::*;
pub use xml_utils::XmlResult;

use crate::core::{Clock, DirectDebitFile, IncassoError, validate_direct_debit};

/// pain.008.001.02 default namespace.
pub const PAIN_008_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02";

/// XML Schema instance namespace.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// `xsi:schemaLocation` value pointing at the pain.008.001.02 XSD.
pub const SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02 pain.008.001.02.xsd";

/// ISO 2.2 `PmtMtd` for direct debits.
pub const PAYMENT_METHOD_DIRECT_DEBIT: &str = "DD";

/// `CdtrSchmeId/.../SchmeNm/Prtry`.
pub const SCHEME_NAME_SEPA: &str = "SEPA";

impl DirectDebitFile {
    /// Build the typed document tree as of `now`.
    pub fn to_document(&self, now: NaiveDateTime) -> Result<Document<'_>, IncassoError> {
        Document::assemble(self, now)
    }

    /// Generate the XML document using the time read from `clock`.
    ///
    /// Does not validate field contents; see [`Self::to_xml_strict`].
    /// Markup characters are escaped, but characters XML 1.0 forbids
    /// (such as U+0001) are copied through, so such input yields a
    /// document that XML parsers reject.
    pub fn to_xml(&self, clock: &dyn Clock) -> XmlResult {
        self.to_xml_at(clock.now())
    }

    /// Generate the XML document as of `now`.
    pub fn to_xml_at(&self, now: NaiveDateTime) -> XmlResult {
        self.to_document(now)?.to_xml()
    }

    /// Like [`Self::to_xml`], but runs [`validate_direct_debit`] first and
    /// refuses to generate a document with any violation.
    pub fn to_xml_strict(&self, clock: &dyn Clock) -> XmlResult {
        let errors = validate_direct_debit(self);
        if !errors.is_empty() {
            let msg = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(IncassoError::Validation(msg));
        }
        self.to_xml(clock)
    }
}
