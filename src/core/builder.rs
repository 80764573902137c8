use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::*;

/// Builder for a single direct debit [`Transaction`].
///
/// No field is validated here; see [`validate_direct_debit`](super::validate_direct_debit)
/// for the optional strictness pass.
///
/// ```
/// use incasso::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// let tx = TransactionBuilder::new("E2E-2024-0001", dec!(12.50))
///     .mandate("MNDT-0001", NaiveDate::from_ymd_opt(2023, 11, 1).unwrap())
///     .debtor("J. Jansen", "NL02RABO0123456789")
///     .remittance("Contributie juni 2024")
///     .build();
///
/// assert_eq!(tx.mandate_id, "MNDT-0001");
/// ```
pub struct TransactionBuilder {
    end_to_end_id: String,
    amount: Decimal,
    mandate_id: String,
    signature_date: NaiveDate,
    debtor_name: String,
    debtor_iban: String,
    remittance_info: String,
}

impl TransactionBuilder {
    pub fn new(end_to_end_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            end_to_end_id: end_to_end_id.into(),
            amount,
            mandate_id: String::new(),
            signature_date: NaiveDate::default(),
            debtor_name: String::new(),
            debtor_iban: String::new(),
            remittance_info: String::new(),
        }
    }

    pub fn mandate(mut self, mandate_id: impl Into<String>, signature_date: NaiveDate) -> Self {
        self.mandate_id = mandate_id.into();
        self.signature_date = signature_date;
        self
    }

    pub fn debtor(mut self, name: impl Into<String>, iban: impl Into<String>) -> Self {
        self.debtor_name = name.into();
        self.debtor_iban = iban.into();
        self
    }

    /// Free text for the debtor's statement. Longer than 140 characters is
    /// accepted and cut at serialization time.
    pub fn remittance(mut self, text: impl Into<String>) -> Self {
        self.remittance_info = text.into();
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            end_to_end_id: self.end_to_end_id,
            amount: self.amount,
            mandate_id: self.mandate_id,
            signature_date: self.signature_date,
            debtor_name: self.debtor_name,
            debtor_iban: self.debtor_iban,
            remittance_info: self.remittance_info,
        }
    }
}
