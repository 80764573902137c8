use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency of every instructed amount. Multi-currency files are not supported.
pub const CURRENCY: &str = "EUR";

/// Maximum length of unstructured remittance information (ISO 2.89 `Ustrd`).
pub const MAX_REMITTANCE_LEN: usize = 140;

/// The party collecting the direct debits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creditor {
    /// ISO 1.8 / 2.19: Initiating party and creditor name.
    pub name: String,
    /// ISO 2.20: Creditor account IBAN.
    pub iban: String,
    /// National business registration number (KvK) the Creditor Identifier
    /// is derived from.
    pub registration_number: String,
    /// ISO 2.27: Explicit Creditor Identifier. Takes precedence over the
    /// one derived from `registration_number`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_id: Option<String>,
}

impl Creditor {
    pub fn new(
        name: impl Into<String>,
        iban: impl Into<String>,
        registration_number: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            iban: iban.into(),
            registration_number: registration_number.into(),
            scheme_id: None,
        }
    }

    /// Use a pre-computed Creditor Identifier instead of deriving one.
    pub fn with_scheme_id(mut self, scheme_id: impl Into<String>) -> Self {
        self.scheme_id = Some(scheme_id.into());
        self
    }
}

/// ISO 2.28: One direct debit transaction (`DrctDbtTxInf`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// ISO 2.31: End-to-end reference, unique per transaction.
    pub end_to_end_id: String,
    /// ISO 2.44: Instructed amount in EUR.
    pub amount: Decimal,
    /// ISO 2.48: Mandate reference.
    pub mandate_id: String,
    /// ISO 2.49: Date the mandate was signed.
    pub signature_date: NaiveDate,
    /// ISO 2.72: Debtor name.
    pub debtor_name: String,
    /// ISO 2.73: Debtor account IBAN.
    pub debtor_iban: String,
    /// ISO 2.89: Unstructured remittance information, stored untruncated.
    pub remittance_info: String,
}

impl Transaction {
    /// Remittance text cut to [`MAX_REMITTANCE_LEN`] characters.
    ///
    /// Counts characters, not bytes, so multi-byte text is never split.
    pub fn truncated_remittance(&self) -> &str {
        truncate_chars(&self.remittance_info, MAX_REMITTANCE_LEN)
    }

    /// Whether the remittance text exceeds the ISO field limit.
    pub fn remittance_truncated(&self) -> bool {
        self.remittance_info.chars().count() > MAX_REMITTANCE_LEN
    }
}

pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
