use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const BILL: &str = r#"<Bill id="HB 1"><BillBody>
  <BillSection number="1">
    <Appropriations agency="011">
      <Appropriation><AccountName>General Fund—State Appropriation (FY 2026)</AccountName><DollarAmount>$1,000</DollarAmount></Appropriation>
    </Appropriations>
  </BillSection>
</BillBody></Bill>"#;

fn bin() -> Command {
    Command::cargo_bin("bill-extract").expect("binary built")
}

#[test]
fn test_cli_writes_json_and_database() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("bill.xml");
    let output = tmp.path().join("bill.json");
    let db = tmp.path().join("bills.db");
    fs::write(&input, BILL).unwrap();

    bin()
        .arg(&input)
        .arg(&output)
        .arg("--db")
        .arg(&db)
        .assert()
        .success();

    let json: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["bill_id"], "HB 1");
    assert_eq!(json["fiscal_impact"]["total_cents"], 100_000);
    assert!(db.exists());
}

#[test]
fn test_cli_fails_on_malformed_input() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("broken.xml");
    let output = tmp.path().join("out.json");
    fs::write(&input, "<Bill><BillBody>").unwrap();

    bin().arg(&input).arg(&output).assert().failure().code(1);
    assert!(!output.exists());
}

#[test]
fn test_cli_requires_two_paths() {
    bin().arg("only-one.xml").assert().failure().code(1);
}

#[test]
fn test_cli_uses_config_file() {
    let tmp = TempDir::new().expect("create temp dir");
    let input = tmp.path().join("bill.xml");
    let output = tmp.path().join("bill.json");
    let config = tmp.path().join("config.json");
    fs::write(&input, BILL).unwrap();
    fs::write(&config, r#"{"parser_version": "ci-run"}"#).unwrap();

    bin()
        .arg(&input)
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let json: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["parser_version"], "ci-run");
}
