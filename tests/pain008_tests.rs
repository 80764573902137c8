#![cfg(feature = "pain008")]

use std::cell::Cell;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use incasso::core::*;
use incasso::pain008::delivery::XML_CONTENT_TYPE;
use incasso::pain008::{BufferedResponse, Delivery, DeliveryOptions, ResponseChannel};
use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn instant() -> NaiveDateTime {
    date(2024, 6, 14).and_hms_opt(9, 30, 0).unwrap()
}

fn clock() -> FixedClock {
    FixedClock(instant())
}

fn creditor() -> Creditor {
    Creditor::new("Celp BV", "NL91ABNA0417164300", "12345678")
}

fn transaction(id: &str, amount: rust_decimal::Decimal) -> Transaction {
    TransactionBuilder::new(id, amount)
        .mandate(format!("MNDT-{id}"), date(2023, 11, 1))
        .debtor("J. Jansen", "NL02RABO0123456789")
        .remittance(format!("Contributie {id}"))
        .build()
}

fn reference_file() -> DirectDebitFile {
    let mut file = DirectDebitFile::new("MSG-2024-06-001", creditor());
    file.add_transaction(
        TransactionBuilder::new("E2E-0001", dec!(12.5))
            .mandate("MNDT-0001", date(2023, 11, 1))
            .debtor("J. Jansen", "NL02RABO0123456789")
            .remittance("Contributie juni 2024")
            .build(),
    );
    file.add_transaction(
        TransactionBuilder::new("E2E-0002", dec!(7.25))
            .mandate("MNDT-0002", date(2024, 1, 15))
            .debtor("P. de Vries & Zn", "NL20INGB0001234567")
            .remittance("Lidmaatschap <Q2>")
            .build(),
    );
    file
}

/// Element paths in document order, each with its text content (empty
/// elements get `Some("")`). Panics if the XML is not well-formed.
fn parse(xml: &str) -> Vec<(String, Option<String>)> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries: Vec<(String, Option<String>)> = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap());
                open.push(entries.len());
                entries.push((path.join("/"), None));
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                entries.push((format!("{}/{name}", path.join("/")), Some(String::new())));
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap().to_string();
                let idx = *open.last().expect("text outside of an element");
                entries[idx].1 = Some(text);
            }
            Ok(Event::End(_)) => {
                path.pop();
                open.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {e}", reader.buffer_position()),
        }
    }
    assert!(path.is_empty(), "unclosed elements: {path:?}");
    entries
}

fn texts(entries: &[(String, Option<String>)], suffix: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|(p, _)| p.ends_with(suffix))
        .map(|(_, t)| t.clone().unwrap_or_default())
        .collect()
}

fn count(entries: &[(String, Option<String>)], suffix: &str) -> usize {
    entries.iter().filter(|(p, _)| p.ends_with(suffix)).count()
}

const TX: &str = "Document/CstmrDrctDbtInitn/PmtInf/DrctDbtTxInf";

// --- Structure ---

#[test]
fn root_declares_namespace_and_schema_location() {
    let xml = reference_file().to_xml(&clock()).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xmlns=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02\""));
    assert!(xml.contains("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""));
    assert!(xml.contains(
        "xsi:schemaLocation=\"urn:iso:std:iso:20022:tech:xsd:pain.008.001.02 pain.008.001.02.xsd\""
    ));
}

#[test]
fn exactly_one_group_header_and_payment_information() {
    let entries = parse(&reference_file().to_xml(&clock()).unwrap());
    assert_eq!(count(&entries, "Document/CstmrDrctDbtInitn"), 1);
    assert_eq!(count(&entries, "Document/CstmrDrctDbtInitn/GrpHdr"), 1);
    assert_eq!(count(&entries, "Document/CstmrDrctDbtInitn/PmtInf"), 1);
}

#[test]
fn group_header_field_order() {
    let entries = parse(&reference_file().to_xml(&clock()).unwrap());
    let header: Vec<_> = entries
        .iter()
        .filter_map(|(p, _)| p.strip_prefix("Document/CstmrDrctDbtInitn/GrpHdr/"))
        .collect();
    assert_eq!(header, ["MsgId", "CreDtTm", "NbOfTxs", "InitgPty", "InitgPty/Nm"]);
    assert_eq!(texts(&entries, "GrpHdr/MsgId"), ["MSG-2024-06-001"]);
    assert_eq!(texts(&entries, "GrpHdr/CreDtTm"), ["2024-06-14T09:30:00"]);
    assert_eq!(texts(&entries, "GrpHdr/InitgPty/Nm"), ["Celp BV"]);
}

#[test]
fn payment_information_field_order() {
    let file = DirectDebitFile::new("MSG-1", creditor()).with_payment_info_id("PMT-1");
    let entries = parse(&file.to_xml(&clock()).unwrap());
    let block: Vec<_> = entries
        .iter()
        .filter_map(|(p, _)| p.strip_prefix("Document/CstmrDrctDbtInitn/PmtInf/"))
        .collect();
    assert_eq!(
        block,
        [
            "PmtInfId",
            "PmtMtd",
            "ReqdColltnDt",
            "Cdtr",
            "Cdtr/Nm",
            "CdtrAcct",
            "CdtrAcct/Id",
            "CdtrAcct/Id/IBAN",
            "CdtrAgt",
            "CdtrAgt/FinInstnId",
            "CdtrSchmeId",
            "CdtrSchmeId/Id",
            "CdtrSchmeId/Id/PrvtId",
            "CdtrSchmeId/Id/PrvtId/Othr",
            "CdtrSchmeId/Id/PrvtId/Othr/Id",
            "CdtrSchmeId/Id/PrvtId/Othr/SchmeNm",
            "CdtrSchmeId/Id/PrvtId/Othr/SchmeNm/Prtry",
        ]
    );
    assert_eq!(texts(&entries, "PmtInf/PmtInfId"), ["PMT-1"]);
    assert_eq!(texts(&entries, "PmtInf/PmtMtd"), ["DD"]);
    assert_eq!(texts(&entries, "PmtInf/ReqdColltnDt"), ["2024-06-14"]);
    assert_eq!(texts(&entries, "CdtrAcct/Id/IBAN"), ["NL91ABNA0417164300"]);
    assert_eq!(texts(&entries, "CdtrAgt/FinInstnId"), [""]);
    assert_eq!(texts(&entries, "Othr/Id"), ["NL69ZZZ123456780000"]);
    assert_eq!(texts(&entries, "SchmeNm/Prtry"), ["SEPA"]);
}

#[test]
fn transaction_field_order() {
    let entries = parse(&reference_file().to_xml(&clock()).unwrap());
    let prefix = format!("{TX}/");
    let first: Vec<_> = entries
        .iter()
        .filter_map(|(p, _)| p.strip_prefix(prefix.as_str()))
        .take_while(|p| *p != "RmtInf/Ustrd")
        .chain(std::iter::once("RmtInf/Ustrd"))
        .collect();
    assert_eq!(
        first,
        [
            "PmtId",
            "PmtId/EndToEndId",
            "InstdAmt",
            "DrctDbtTx",
            "DrctDbtTx/MndtRltdInf",
            "DrctDbtTx/MndtRltdInf/MndtId",
            "DrctDbtTx/MndtRltdInf/DtOfSgntr",
            "DbtrAgt",
            "DbtrAgt/FinInstnId",
            "Dbtr",
            "Dbtr/Nm",
            "DbtrAcct",
            "DbtrAcct/Id",
            "DbtrAcct/Id/IBAN",
            "RmtInf",
            "RmtInf/Ustrd",
        ]
    );
}

#[test]
fn transaction_values() {
    let xml = reference_file().to_xml(&clock()).unwrap();
    assert!(xml.contains("<InstdAmt Ccy=\"EUR\">12.50</InstdAmt>"));
    assert!(xml.contains("<InstdAmt Ccy=\"EUR\">7.25</InstdAmt>"));

    let entries = parse(&xml);
    assert_eq!(texts(&entries, "MndtRltdInf/MndtId"), ["MNDT-0001", "MNDT-0002"]);
    assert_eq!(
        texts(&entries, "MndtRltdInf/DtOfSgntr"),
        ["2023-11-01", "2024-01-15"]
    );
    assert_eq!(
        texts(&entries, "Dbtr/Nm"),
        ["J. Jansen", "P. de Vries & Zn"]
    );
    assert_eq!(
        texts(&entries, "DbtrAcct/Id/IBAN"),
        ["NL02RABO0123456789", "NL20INGB0001234567"]
    );
    assert_eq!(
        texts(&entries, "RmtInf/Ustrd"),
        ["Contributie juni 2024", "Lidmaatschap <Q2>"]
    );
}

// --- Counts and order ---

#[test]
fn count_matches_transactions() {
    let mut file = DirectDebitFile::new("MSG-1", creditor());
    for i in 0..25 {
        file.add_transaction(transaction(&format!("E2E-{i:03}"), dec!(1.00)));
    }
    let entries = parse(&file.to_xml(&clock()).unwrap());
    assert_eq!(texts(&entries, "GrpHdr/NbOfTxs"), ["25"]);
    assert_eq!(count(&entries, TX), 25);
}

#[test]
fn transactions_keep_insertion_order() {
    let mut file = DirectDebitFile::new("MSG-1", creditor());
    for id in ["Z-3", "A-1", "M-2"] {
        file.add_transaction(transaction(id, dec!(5)));
    }
    let entries = parse(&file.to_xml(&clock()).unwrap());
    assert_eq!(texts(&entries, "PmtId/EndToEndId"), ["Z-3", "A-1", "M-2"]);
}

#[test]
fn empty_file_is_well_formed() {
    let file = DirectDebitFile::new("MSG-EMPTY", creditor());
    let entries = parse(&file.to_xml(&clock()).unwrap());
    assert_eq!(texts(&entries, "GrpHdr/NbOfTxs"), ["0"]);
    assert_eq!(count(&entries, TX), 0);
    assert_eq!(count(&entries, "Document/CstmrDrctDbtInitn/PmtInf"), 1);
}

// --- Remittance truncation ---

#[test]
fn long_remittance_truncated_to_140() {
    let mut file = DirectDebitFile::new("MSG-1", creditor());
    file.add_transaction(
        TransactionBuilder::new("E2E-1", dec!(1))
            .remittance("x".repeat(141))
            .build(),
    );
    file.add_transaction(
        TransactionBuilder::new("E2E-2", dec!(1))
            .remittance("y".repeat(500))
            .build(),
    );
    let entries = parse(&file.to_xml(&clock()).unwrap());
    let ustrd = texts(&entries, "RmtInf/Ustrd");
    assert_eq!(ustrd[0], "x".repeat(140));
    assert_eq!(ustrd[1], "y".repeat(140));
}

#[test]
fn short_remittance_unchanged() {
    let mut file = DirectDebitFile::new("MSG-1", creditor());
    let exact = "z".repeat(140);
    file.add_transaction(TransactionBuilder::new("E2E-1", dec!(1)).remittance(&exact).build());
    file.add_transaction(TransactionBuilder::new("E2E-2", dec!(1)).remittance("kort").build());
    let entries = parse(&file.to_xml(&clock()).unwrap());
    assert_eq!(texts(&entries, "RmtInf/Ustrd"), [exact.as_str(), "kort"]);
}

#[test]
fn truncation_counts_characters() {
    let mut file = DirectDebitFile::new("MSG-1", creditor());
    file.add_transaction(
        TransactionBuilder::new("E2E-1", dec!(1))
            .remittance("ë".repeat(200))
            .build(),
    );
    let entries = parse(&file.to_xml(&clock()).unwrap());
    assert_eq!(texts(&entries, "RmtInf/Ustrd")[0].chars().count(), 140);
}

// --- Determinism and permissiveness ---

#[test]
fn same_clock_same_bytes() {
    let file = reference_file();
    let a = file.to_xml(&clock()).unwrap();
    let b = file.to_xml(&clock()).unwrap();
    assert_eq!(a, b);
    assert_eq!(file.number_of_transactions(), 2);
}

#[test]
fn creation_and_collection_date_share_one_instant() {
    let midnight_minus = date(2024, 12, 31).and_hms_opt(23, 59, 59).unwrap();
    let entries = parse(
        &reference_file()
            .to_xml(&FixedClock(midnight_minus))
            .unwrap(),
    );
    assert_eq!(texts(&entries, "GrpHdr/CreDtTm"), ["2024-12-31T23:59:59"]);
    assert_eq!(texts(&entries, "PmtInf/ReqdColltnDt"), ["2024-12-31"]);
}

/// Moves one second forward on every read.
struct TickingClock(Cell<NaiveDateTime>);

impl TickingClock {
    fn new_year_eve() -> Self {
        Self(Cell::new(date(2024, 12, 31).and_hms_opt(23, 59, 59).unwrap()))
    }
}

impl Clock for TickingClock {
    fn now(&self) -> NaiveDateTime {
        let now = self.0.get();
        self.0.set(now + TimeDelta::seconds(1));
        now
    }
}

#[test]
fn to_xml_reads_the_clock_once() {
    let entries = parse(&reference_file().to_xml(&TickingClock::new_year_eve()).unwrap());
    assert_eq!(texts(&entries, "GrpHdr/CreDtTm"), ["2024-12-31T23:59:59"]);
    assert_eq!(texts(&entries, "PmtInf/ReqdColltnDt"), ["2024-12-31"]);
}

#[test]
fn download_reads_the_clock_once() {
    let mut response = BufferedResponse::default();
    let outcome = reference_file()
        .download(&TickingClock::new_year_eve(), &mut response)
        .unwrap();
    assert_eq!(outcome, Delivery::Terminated);
    assert_eq!(
        response.header("Content-Disposition"),
        Some("attachment; filename=sepa_31122024-235959.xml")
    );
    let entries = parse(&String::from_utf8(response.body).unwrap());
    assert_eq!(texts(&entries, "GrpHdr/CreDtTm"), ["2024-12-31T23:59:59"]);
    assert_eq!(texts(&entries, "PmtInf/ReqdColltnDt"), ["2024-12-31"]);
}

#[test]
fn save_to_reads_the_clock_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = reference_file()
        .save_to(&TickingClock::new_year_eve(), dir.path())
        .unwrap();
    assert_eq!(path, dir.path().join("sepa_31122024-235959.xml"));
    let entries = parse(&std::fs::read_to_string(&path).unwrap());
    assert_eq!(texts(&entries, "GrpHdr/CreDtTm"), ["2024-12-31T23:59:59"]);
    assert_eq!(texts(&entries, "PmtInf/ReqdColltnDt"), ["2024-12-31"]);
}

#[test]
fn explicit_scheme_id_is_written_verbatim() {
    let file = DirectDebitFile::new(
        "MSG-1",
        creditor().with_scheme_id("DE98ZZZ09999999999"),
    );
    let entries = parse(&file.to_xml(&clock()).unwrap());
    assert_eq!(texts(&entries, "Othr/Id"), ["DE98ZZZ09999999999"]);
}

#[test]
fn invalid_values_flow_into_output() {
    let mut file = DirectDebitFile::new("M".repeat(50), creditor());
    file.add_transaction(
        TransactionBuilder::new("E2E-1", dec!(-10))
            .debtor("", "not-an-iban")
            .build(),
    );
    let xml = file.to_xml(&clock()).unwrap();
    assert!(xml.contains(&"M".repeat(50)));
    assert!(xml.contains("<InstdAmt Ccy=\"EUR\">-10.00</InstdAmt>"));
    assert!(xml.contains("<IBAN>not-an-iban</IBAN>"));
}

#[test]
fn control_characters_are_copied_through() {
    let mut file = DirectDebitFile::new("MSG-1", creditor());
    file.add_transaction(
        TransactionBuilder::new("E2E-1", dec!(1))
            .debtor("a\u{1}b", "NL02RABO0123456789")
            .build(),
    );
    let xml = file.to_xml(&clock()).unwrap();
    assert!(xml.contains("<Nm>a\u{1}b</Nm>"));
}

#[test]
fn unusable_registration_number_is_an_error() {
    let file = DirectDebitFile::new(
        "MSG-1",
        Creditor::new("Celp BV", "NL91ABNA0417164300", "KVK-123"),
    );
    let err = file.to_xml(&clock()).unwrap_err();
    assert!(matches!(err, IncassoError::InvalidInput(_)));
}

#[test]
fn strict_mode_rejects_invalid_files() {
    let mut file = reference_file();
    file.add_transaction(TransactionBuilder::new("E2E-0001", dec!(0)).build());
    let err = file.to_xml_strict(&clock()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("validation failed:"));
    assert!(msg.contains("transactions[2].amount"));
    assert!(msg.contains("E2E-UNIQUE"));

    let ok = reference_file().to_xml_strict(&clock()).unwrap();
    assert_eq!(ok, reference_file().to_xml(&clock()).unwrap());
}

// --- Delivery ---

#[test]
fn respond_sets_content_type_and_body() {
    let file = reference_file();
    let mut response = BufferedResponse::default();
    let outcome = file.respond(&clock(), &mut response).unwrap();
    assert_eq!(outcome, Delivery::Continue);
    assert_eq!(response.header("Content-Type"), Some(XML_CONTENT_TYPE));
    assert_eq!(response.header("Content-Disposition"), None);
    assert_eq!(
        String::from_utf8(response.body).unwrap(),
        file.to_xml(&clock()).unwrap()
    );
}

#[test]
fn download_is_terminal_attachment() {
    let file = reference_file();
    let mut response = BufferedResponse::default();
    let outcome = file.download(&clock(), &mut response).unwrap();
    assert_eq!(outcome, Delivery::Terminated);
    assert_eq!(response.header("Content-Type"), Some("text/xml"));
    assert_eq!(
        response.header("Content-Disposition"),
        Some("attachment; filename=sepa_14062024-093000.xml")
    );
    assert_eq!(
        String::from_utf8(response.body).unwrap(),
        file.to_xml(&clock()).unwrap()
    );
}

struct BrokenPipe;

impl ResponseChannel for BrokenPipe {
    fn set_header(&mut self, _name: &str, _value: &str) {}

    fn write_body(&mut self, _body: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "client went away",
        ))
    }
}

#[test]
fn write_errors_propagate() {
    let err = reference_file()
        .download(&clock(), &mut BrokenPipe)
        .unwrap_err();
    match err {
        IncassoError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn save_to_writes_timestamped_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = reference_file();
    let path = file.save_to(&clock(), dir.path()).unwrap();
    assert_eq!(path, dir.path().join("sepa_14062024-093000.xml"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, file.to_xml(&clock()).unwrap());
}

#[test]
fn save_to_with_custom_prefix() {
    let dir = tempfile::tempdir().unwrap();
    let options = DeliveryOptions {
        filename_prefix: "incasso-juni".into(),
    };
    let path = reference_file()
        .save_to_with(&clock(), dir.path(), &options)
        .unwrap();
    assert!(path.ends_with("incasso-juni_14062024-093000.xml"));
    assert!(path.exists());
}

#[test]
fn save_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let err = reference_file().save_to(&clock(), &missing).unwrap_err();
    assert!(matches!(err, IncassoError::Io(_)));
}

// --- Snapshot ---

#[test]
fn reference_document_snapshot() {
    let xml = reference_file().to_xml(&clock()).unwrap();
    insta::assert_snapshot!("reference_document", xml);
}
