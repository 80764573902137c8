use chrono::NaiveDate;
use incasso::core::*;
use incasso::pain008::{BufferedResponse, Delivery};
use rust_decimal_macros::dec;

fn main() {
    let creditor = Creditor::new("Sportvereniging De Zwaluw", "NL91ABNA0417164300", "40123456");

    let mut file = DirectDebitFile::new("ZWALUW-2024-06", creditor)
        .with_collection_date(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());

    file.add_transaction(
        TransactionBuilder::new("ZWALUW-2024-06-0001", dec!(12.50))
            .mandate("LID-0001", NaiveDate::from_ymd_opt(2021, 9, 1).unwrap())
            .debtor("J. Jansen", "NL02RABO0123456789")
            .remittance("Contributie juli 2024")
            .build(),
    );
    file.add_transaction(
        TransactionBuilder::new("ZWALUW-2024-06-0002", dec!(25))
            .mandate("LID-0002", NaiveDate::from_ymd_opt(2022, 3, 15).unwrap())
            .debtor("P. de Vries", "NL20INGB0001234567")
            .remittance("Contributie juli 2024 (gezin)")
            .build(),
    );

    // ── Optional strict check before handing the file to the bank ─────
    let errors = validate_direct_debit(&file);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("  - {e}");
        }
        return;
    }

    // ── Generate ──────────────────────────────────────────────────────
    match file.to_xml(&SystemClock) {
        Ok(xml) => println!("{xml}"),
        Err(e) => {
            eprintln!("generation failed: {e}");
            return;
        }
    }

    // ── Download-style delivery into an in-memory response ────────────
    let mut response = BufferedResponse::default();
    match file.download(&SystemClock, &mut response) {
        Ok(Delivery::Terminated) => eprintln!(
            "download ready: {} ({} bytes)",
            response.header("Content-Disposition").unwrap_or_default(),
            response.body.len()
        ),
        Ok(Delivery::Continue) => {}
        Err(e) => eprintln!("download failed: {e}"),
    }
}
