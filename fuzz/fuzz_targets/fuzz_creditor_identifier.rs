#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Any accepted registration number must yield a self-consistent identifier.
        if let Ok(ci) = incasso::creditor_identifier(s) {
            assert!(incasso::is_valid_creditor_identifier(&ci) || ci.len() > 35);
        }
        let _ = incasso::is_valid_creditor_identifier(s);
    }
});
