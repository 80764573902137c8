//! SEPA Creditor Identifier check digits (ISO 7064 MOD 97-10).
//!
//! A Creditor Identifier is laid out as
//! `country (2) + check digits (2) + business code (3) + national id`.
//! The business code is not part of the checksum.

use super::error::IncassoError;

/// Country prefix for Dutch creditors.
pub const NL_COUNTRY_CODE: &str = "NL";

/// Default creditor business code used when none has been assigned.
pub const DEFAULT_BUSINESS_CODE: &str = "ZZZ";

/// Suffix appended to a KvK number to form the Dutch national identifier.
const KVK_SUFFIX: &str = "0000";

/// Maximum length of the `CdtrSchmeId/Id/PrvtId/Othr/Id` field.
const MAX_IDENTIFIER_LEN: usize = 35;

/// Dutch Creditor Identifier for a KvK registration number.
///
/// Produces `NL<check>ZZZ<kvk>0000`, check digits always two characters.
///
/// ```
/// assert_eq!(
///     incasso::core::creditor_identifier("12345678").unwrap(),
///     "NL69ZZZ123456780000"
/// );
/// ```
pub fn creditor_identifier(kvk: &str) -> Result<String, IncassoError> {
    if kvk.is_empty() {
        return Err(IncassoError::InvalidInput(
            "registration number is empty".into(),
        ));
    }
    if !kvk.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IncassoError::InvalidInput(format!(
            "registration number '{kvk}' must contain digits only"
        )));
    }
    creditor_identifier_for(
        NL_COUNTRY_CODE,
        DEFAULT_BUSINESS_CODE,
        &format!("{kvk}{KVK_SUFFIX}"),
    )
}

/// Creditor Identifier for any SEPA country.
///
/// `national_id` may contain letters; they are mapped A=10 .. Z=35 for
/// the checksum as ISO 7064 prescribes.
pub fn creditor_identifier_for(
    country: &str,
    business_code: &str,
    national_id: &str,
) -> Result<String, IncassoError> {
    if country.len() != 2 || !country.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(IncassoError::InvalidInput(format!(
            "country code '{country}' must be two uppercase letters"
        )));
    }
    if business_code.len() != 3 || !business_code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(IncassoError::InvalidInput(format!(
            "business code '{business_code}' must be three alphanumeric characters"
        )));
    }
    if national_id.is_empty() || !national_id.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(IncassoError::InvalidInput(format!(
            "national identifier '{national_id}' must be non-empty and alphanumeric"
        )));
    }

    let remainder = mod97(national_id.chars().chain(country.chars()).chain("00".chars()))
        .ok_or_else(|| IncassoError::InvalidInput("identifier is not alphanumeric".into()))?;
    let check = 98 - remainder;

    Ok(format!("{country}{check:02}{business_code}{national_id}"))
}

/// Check the format and check digits of a Creditor Identifier.
///
/// Spaces are ignored and letters are compared case-insensitively.
pub fn is_valid_creditor_identifier(identifier: &str) -> bool {
    let compact: String = identifier
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if compact.len() < 8 || compact.len() > MAX_IDENTIFIER_LEN || !compact.is_ascii() {
        return false;
    }

    let (country, rest) = compact.split_at(2);
    let (check, rest) = rest.split_at(2);
    let national_id = &rest[3..];

    if !country.bytes().all(|b| b.is_ascii_uppercase())
        || !check.bytes().all(|b| b.is_ascii_digit())
        || !rest[..3].bytes().all(|b| b.is_ascii_alphanumeric())
    {
        return false;
    }

    mod97(national_id.chars().chain(country.chars()).chain(check.chars())) == Some(1)
}

/// Remainder of the numeral formed by `chars` modulo 97, computed one
/// digit at a time so the numeral never has to fit in a machine integer.
fn mod97(chars: impl Iterator<Item = char>) -> Option<u32> {
    let mut remainder = 0u32;
    for c in chars {
        let value = c.to_ascii_uppercase().to_digit(36)?;
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }
    Some(remainder)
}
