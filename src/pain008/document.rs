//! Typed pain.008.001.02 element tree.
//!
//! One struct per ISO block. Each block writes its children in field
//! declaration order, which is the order the schema requires.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use super::xml_utils::{XmlResult, XmlWriter};
use super::{
    PAIN_008_NAMESPACE, PAYMENT_METHOD_DIRECT_DEBIT, SCHEMA_LOCATION, SCHEME_NAME_SEPA,
    XSI_NAMESPACE,
};
use crate::core::*;

/// `Document/CstmrDrctDbtInitn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub group_header: GroupHeader<'a>,
    pub payment_information: PaymentInformation<'a>,
}

/// ISO 1.0 `GrpHdr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupHeader<'a> {
    /// 1.1 `MsgId`
    pub message_id: &'a str,
    /// 1.2 `CreDtTm`
    pub creation_date_time: NaiveDateTime,
    /// 1.6 `NbOfTxs`
    pub number_of_transactions: usize,
    /// 1.8 `InitgPty`
    pub initiating_party: PartyIdentification<'a>,
}

/// ISO 2.0 `PmtInf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInformation<'a> {
    /// 2.1 `PmtInfId`
    pub payment_info_id: &'a str,
    /// 2.2 `PmtMtd`
    pub payment_method: &'static str,
    /// 2.18 `ReqdColltnDt`
    pub requested_collection_date: NaiveDate,
    /// 2.19 `Cdtr`
    pub creditor: PartyIdentification<'a>,
    /// 2.20 `CdtrAcct`
    pub creditor_account: CashAccount<'a>,
    /// 2.21 `CdtrAgt`
    pub creditor_agent: FinancialInstitution,
    /// 2.27 `CdtrSchmeId`
    pub creditor_scheme_id: SchemeIdentification,
    /// 2.28 `DrctDbtTxInf`
    pub transactions: Vec<DirectDebitTransaction<'a>>,
}

/// Party with only a name (`Nm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyIdentification<'a> {
    pub name: &'a str,
}

/// Account identified by IBAN (`Id/IBAN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashAccount<'a> {
    pub iban: &'a str,
}

/// Agent placeholder with an empty `FinInstnId`; the bank resolves the
/// institution from the IBAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FinancialInstitution;

/// `CdtrSchmeId/Id/PrvtId/Othr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeIdentification {
    /// The Creditor Identifier.
    pub id: String,
    /// `SchmeNm/Prtry`
    pub proprietary_scheme: &'static str,
}

/// ISO 2.28 `DrctDbtTxInf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectDebitTransaction<'a> {
    /// 2.31 `PmtId/EndToEndId`
    pub end_to_end_id: &'a str,
    /// 2.44 `InstdAmt`
    pub instructed_amount: InstructedAmount,
    /// 2.47 `DrctDbtTx/MndtRltdInf`
    pub mandate: MandateRelatedInformation<'a>,
    /// 2.70 `DbtrAgt`
    pub debtor_agent: FinancialInstitution,
    /// 2.72 `Dbtr`
    pub debtor: PartyIdentification<'a>,
    /// 2.73 `DbtrAcct`
    pub debtor_account: CashAccount<'a>,
    /// 2.88 `RmtInf/Ustrd`, already truncated.
    pub remittance_information: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructedAmount {
    /// Formatted with two decimals.
    pub value: String,
    pub currency: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MandateRelatedInformation<'a> {
    /// 2.48 `MndtId`
    pub mandate_id: &'a str,
    /// 2.49 `DtOfSgntr`
    pub date_of_signature: NaiveDate,
}

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

impl<'a> Document<'a> {
    /// Assemble the tree for `file` as of `now`.
    ///
    /// Fails only when no Creditor Identifier can be produced.
    pub fn assemble(file: &'a DirectDebitFile, now: NaiveDateTime) -> Result<Self, IncassoError> {
        let creditor = &file.creditor;
        let scheme_id = file.creditor_scheme_id()?;

        let transactions = file
            .transactions()
            .iter()
            .map(|tx| {
                if tx.remittance_truncated() {
                    warn!(
                        end_to_end_id = %tx.end_to_end_id,
                        length = tx.remittance_info.chars().count(),
                        "remittance text truncated to {MAX_REMITTANCE_LEN} characters"
                    );
                }
                DirectDebitTransaction {
                    end_to_end_id: &tx.end_to_end_id,
                    instructed_amount: InstructedAmount {
                        value: format_amount(tx.amount),
                        currency: CURRENCY,
                    },
                    mandate: MandateRelatedInformation {
                        mandate_id: &tx.mandate_id,
                        date_of_signature: tx.signature_date,
                    },
                    debtor_agent: FinancialInstitution,
                    debtor: PartyIdentification {
                        name: &tx.debtor_name,
                    },
                    debtor_account: CashAccount {
                        iban: &tx.debtor_iban,
                    },
                    remittance_information: tx.truncated_remittance(),
                }
            })
            .collect();

        Ok(Self {
            group_header: GroupHeader {
                message_id: &file.message_id,
                creation_date_time: now,
                number_of_transactions: file.number_of_transactions(),
                initiating_party: PartyIdentification {
                    name: &creditor.name,
                },
            },
            payment_information: PaymentInformation {
                payment_info_id: &file.payment_info_id,
                payment_method: PAYMENT_METHOD_DIRECT_DEBIT,
                requested_collection_date: file
                    .requested_collection_date
                    .unwrap_or_else(|| now.date()),
                creditor: PartyIdentification {
                    name: &creditor.name,
                },
                creditor_account: CashAccount {
                    iban: &creditor.iban,
                },
                creditor_agent: FinancialInstitution,
                creditor_scheme_id: SchemeIdentification {
                    id: scheme_id,
                    proprietary_scheme: SCHEME_NAME_SEPA,
                },
                transactions,
            },
        })
    }

    /// Serialize to a UTF-8 XML string.
    pub fn to_xml(&self) -> XmlResult {
        debug!(
            message_id = self.group_header.message_id,
            transactions = self.group_header.number_of_transactions,
            "writing pain.008 document"
        );

        let mut w = XmlWriter::new()?;
        w.start_element_with_attrs(
            "Document",
            &[
                ("xmlns", PAIN_008_NAMESPACE),
                ("xmlns:xsi", XSI_NAMESPACE),
                ("xsi:schemaLocation", SCHEMA_LOCATION),
            ],
        )?;
        w.start_element("CstmrDrctDbtInitn")?;
        self.group_header.write(&mut w)?;
        self.payment_information.write(&mut w)?;
        w.end_element("CstmrDrctDbtInitn")?;
        w.end_element("Document")?;
        w.into_string()
    }
}

impl GroupHeader<'_> {
    fn write(&self, w: &mut XmlWriter) -> Result<(), IncassoError> {
        w.start_element("GrpHdr")?;
        w.text_element("MsgId", self.message_id)?;
        w.text_element(
            "CreDtTm",
            &self.creation_date_time.format(DATE_TIME_FORMAT).to_string(),
        )?;
        w.text_element("NbOfTxs", &self.number_of_transactions.to_string())?;
        self.initiating_party.write(w, "InitgPty")?;
        w.end_element("GrpHdr")?;
        Ok(())
    }
}

impl PaymentInformation<'_> {
    fn write(&self, w: &mut XmlWriter) -> Result<(), IncassoError> {
        w.start_element("PmtInf")?;
        w.text_element("PmtInfId", self.payment_info_id)?;
        w.text_element("PmtMtd", self.payment_method)?;
        w.text_element(
            "ReqdColltnDt",
            &self.requested_collection_date.format(DATE_FORMAT).to_string(),
        )?;
        self.creditor.write(w, "Cdtr")?;
        self.creditor_account.write(w, "CdtrAcct")?;
        self.creditor_agent.write(w, "CdtrAgt")?;
        self.creditor_scheme_id.write(w)?;
        for tx in &self.transactions {
            tx.write(w)?;
        }
        w.end_element("PmtInf")?;
        Ok(())
    }
}

impl PartyIdentification<'_> {
    fn write(&self, w: &mut XmlWriter, tag: &str) -> Result<(), IncassoError> {
        w.start_element(tag)?;
        w.text_element("Nm", self.name)?;
        w.end_element(tag)?;
        Ok(())
    }
}

impl CashAccount<'_> {
    fn write(&self, w: &mut XmlWriter, tag: &str) -> Result<(), IncassoError> {
        w.start_element(tag)?;
        w.start_element("Id")?;
        w.text_element("IBAN", self.iban)?;
        w.end_element("Id")?;
        w.end_element(tag)?;
        Ok(())
    }
}

impl FinancialInstitution {
    fn write(&self, w: &mut XmlWriter, tag: &str) -> Result<(), IncassoError> {
        w.start_element(tag)?;
        w.empty_element("FinInstnId")?;
        w.end_element(tag)?;
        Ok(())
    }
}

impl SchemeIdentification {
    fn write(&self, w: &mut XmlWriter) -> Result<(), IncassoError> {
        w.start_element("CdtrSchmeId")?;
        w.start_element("Id")?;
        w.start_element("PrvtId")?;
        w.start_element("Othr")?;
        w.text_element("Id", &self.id)?;
        w.start_element("SchmeNm")?;
        w.text_element("Prtry", self.proprietary_scheme)?;
        w.end_element("SchmeNm")?;
        w.end_element("Othr")?;
        w.end_element("PrvtId")?;
        w.end_element("Id")?;
        w.end_element("CdtrSchmeId")?;
        Ok(())
    }
}

impl DirectDebitTransaction<'_> {
    fn write(&self, w: &mut XmlWriter) -> Result<(), IncassoError> {
        w.start_element("DrctDbtTxInf")?;

        w.start_element("PmtId")?;
        w.text_element("EndToEndId", self.end_to_end_id)?;
        w.end_element("PmtId")?;

        w.amount_element(
            "InstdAmt",
            &self.instructed_amount.value,
            self.instructed_amount.currency,
        )?;

        w.start_element("DrctDbtTx")?;
        w.start_element("MndtRltdInf")?;
        w.text_element("MndtId", self.mandate.mandate_id)?;
        w.text_element(
            "DtOfSgntr",
            &self.mandate.date_of_signature.format(DATE_FORMAT).to_string(),
        )?;
        w.end_element("MndtRltdInf")?;
        w.end_element("DrctDbtTx")?;

        self.debtor_agent.write(w, "DbtrAgt")?;
        self.debtor.write(w, "Dbtr")?;
        self.debtor_account.write(w, "DbtrAcct")?;

        w.start_element("RmtInf")?;
        w.text_element("Ustrd", self.remittance_information)?;
        w.end_element("RmtInf")?;

        w.end_element("DrctDbtTxInf")?;
        Ok(())
    }
}
