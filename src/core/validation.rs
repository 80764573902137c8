use std::collections::HashSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::creditor_id::is_valid_creditor_identifier;
use super::error::ValidationError;
use super::file::DirectDebitFile;
use super::types::Transaction;

/// `Max35Text` fields: message, payment info, end-to-end and mandate ids.
const MAX_ID_LEN: usize = 35;

/// `Max70Text` fields: party names.
const MAX_NAME_LEN: usize = 70;

/// Largest instructed amount the scheme accepts.
const MAX_AMOUNT: Decimal = dec!(999999999.99);

/// Validate a direct debit file against the pain.008 field constraints.
///
/// Serialization never calls this on its own; use it (or `to_xml_strict`)
/// when a bank rejection is worse than a local error. Returns all errors
/// found, in document order.
pub fn validate_direct_debit(file: &DirectDebitFile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_id(&file.message_id, "message_id", &mut errors);
    check_id(&file.payment_info_id, "payment_info_id", &mut errors);
    check_name(&file.creditor.name, "creditor.name", &mut errors);
    check_iban(&file.creditor.iban, "creditor.iban", &mut errors);

    match &file.creditor.scheme_id {
        Some(id) if !is_valid_creditor_identifier(id) => {
            errors.push(ValidationError::with_rule(
                "creditor.scheme_id",
                format!("'{id}' is not a valid Creditor Identifier"),
                "CI-CHECK",
            ));
        }
        Some(_) => {}
        None => {
            if let Err(e) = file.creditor_scheme_id() {
                errors.push(ValidationError::with_rule(
                    "creditor.registration_number",
                    e.to_string(),
                    "CI-CHECK",
                ));
            }
        }
    }

    let mut seen = HashSet::new();
    for (index, tx) in file.transactions().iter().enumerate() {
        validate_transaction(tx, index, &mut errors);
        if !tx.end_to_end_id.is_empty() && !seen.insert(tx.end_to_end_id.as_str()) {
            errors.push(ValidationError::with_rule(
                format!("transactions[{index}].end_to_end_id"),
                format!("duplicate end-to-end id '{}'", tx.end_to_end_id),
                "E2E-UNIQUE",
            ));
        }
    }

    errors
}

fn validate_transaction(tx: &Transaction, index: usize, errors: &mut Vec<ValidationError>) {
    let prefix = format!("transactions[{index}]");

    check_id(&tx.end_to_end_id, &format!("{prefix}.end_to_end_id"), errors);
    check_id(&tx.mandate_id, &format!("{prefix}.mandate_id"), errors);
    check_name(&tx.debtor_name, &format!("{prefix}.debtor_name"), errors);
    check_iban(&tx.debtor_iban, &format!("{prefix}.debtor_iban"), errors);

    if tx.amount < Decimal::new(1, 2) {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.amount"),
            format!("amount {} must be at least 0.01", tx.amount),
            "AMT-MIN",
        ));
    } else if tx.amount > MAX_AMOUNT {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.amount"),
            format!("amount {} exceeds 999999999.99", tx.amount),
            "AMT-MAX",
        ));
    }
    if tx.amount.normalize().scale() > 2 {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.amount"),
            format!("amount {} has more than 2 decimal places", tx.amount),
            "AMT-DP",
        ));
    }
}

fn check_id(value: &str, field: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
    } else if value.chars().count() > MAX_ID_LEN {
        errors.push(ValidationError::with_rule(
            field,
            format!("must not exceed {MAX_ID_LEN} characters"),
            "MAX-35",
        ));
    }
}

fn check_name(value: &str, field: &str, errors: &mut Vec<ValidationError>) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, "must not be empty"));
    } else if value.chars().count() > MAX_NAME_LEN {
        errors.push(ValidationError::with_rule(
            field,
            format!("must not exceed {MAX_NAME_LEN} characters"),
            "MAX-70",
        ));
    }
}

/// Shape check only: country letters, two digits, alphanumeric BBAN.
/// The MOD 97 checksum is not verified.
fn check_iban(value: &str, field: &str, errors: &mut Vec<ValidationError>) {
    if !is_iban_shaped(value) {
        errors.push(ValidationError::with_rule(
            field,
            format!("'{value}' is not a well-formed IBAN"),
            "IBAN-FORMAT",
        ));
    }
}

pub(crate) fn is_iban_shaped(value: &str) -> bool {
    let compact: Vec<u8> = value
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    (15..=34).contains(&compact.len())
        && compact[..2].iter().all(|b| b.is_ascii_uppercase())
        && compact[2..4].iter().all(|b| b.is_ascii_digit())
        && compact[4..].iter().all(|b| b.is_ascii_alphanumeric())
}
