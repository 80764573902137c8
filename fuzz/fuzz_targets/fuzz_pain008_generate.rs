#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Arbitrary text in every free-form field must never panic the writer.
    let mut file = incasso::DirectDebitFile::new(
        s,
        incasso::Creditor::new(s, s, "12345678"),
    );
    for part in s.split('|').take(16) {
        file.add_transaction(
            incasso::TransactionBuilder::new(part, rust_decimal::Decimal::ONE)
                .debtor(part, part)
                .remittance(s)
                .build(),
        );
    }
    let at = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let _ = file.to_xml_at(at);
    let _ = incasso::validate_direct_debit(&file);
});
