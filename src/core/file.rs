use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::creditor_id::creditor_identifier;
use super::error::IncassoError;
use super::types::*;

/// One direct debit message: a creditor plus the transactions to collect.
///
/// Transactions keep their insertion order; that order is the order of the
/// `DrctDbtTxInf` blocks in the generated document. Serialization lives in
/// the `pain008` module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectDebitFile {
    /// ISO 1.1: Message identification.
    pub message_id: String,
    /// ISO 2.1: Payment information identification.
    pub payment_info_id: String,
    /// ISO 1.8 / 2.19-2.27: Creditor details.
    pub creditor: Creditor,
    /// ISO 2.18: Requested collection date. `None` means the assembly date.
    #[serde(default)]
    pub requested_collection_date: Option<NaiveDate>,
    transactions: Vec<Transaction>,
}

impl DirectDebitFile {
    /// Create an empty file. The payment information id defaults to the
    /// message id.
    pub fn new(message_id: impl Into<String>, creditor: Creditor) -> Self {
        let message_id = message_id.into();
        Self {
            payment_info_id: message_id.clone(),
            message_id,
            creditor,
            requested_collection_date: None,
            transactions: Vec::new(),
        }
    }

    pub fn with_payment_info_id(mut self, id: impl Into<String>) -> Self {
        self.payment_info_id = id.into();
        self
    }

    pub fn with_collection_date(mut self, date: NaiveDate) -> Self {
        self.requested_collection_date = Some(date);
        self
    }

    /// Append a transaction. Contents are not checked.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        trace!(
            end_to_end_id = %transaction.end_to_end_id,
            position = self.transactions.len(),
            "transaction added"
        );
        self.transactions.push(transaction);
    }

    /// Transactions in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// ISO 1.6 `NbOfTxs`.
    pub fn number_of_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// The Creditor Identifier written to `CdtrSchmeId`: the explicit one if
    /// set, otherwise derived from the registration number.
    pub fn creditor_scheme_id(&self) -> Result<String, IncassoError> {
        match &self.creditor.scheme_id {
            Some(id) => Ok(id.clone()),
            None => creditor_identifier(&self.creditor.registration_number),
        }
    }
}

impl Extend<Transaction> for DirectDebitFile {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for transaction in iter {
            self.add_transaction(transaction);
        }
    }
}
