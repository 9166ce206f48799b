//! End-to-end tests for the factura binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn factura() -> Command {
    Command::cargo_bin("factura").unwrap()
}

const VALID_REGISTRY: &str = r#"{
  "company_partner_id": 1,
  "partners": [
    {
      "id": 1,
      "name": "My Company",
      "vat": "FR00000000000"
    },
    {
      "id": 2,
      "name": "Acme SARL",
      "keywords": "Acme|SARL",
      "currency": "EUR",
      "fields": [
        { "name": "date", "date_format": "dd-mm-y4" },
        { "name": "amount_total", "extract_rule": "max" },
        { "name": "invoice_number" }
      ]
    }
  ]
}"#;

const BROKEN_REGISTRY: &str = r#"{
  "partners": [
    {
      "id": 2,
      "name": "Acme SARL",
      "keywords": "Acme",
      "fields": [
        { "name": "date" },
        { "name": "amount_total", "extract_rule": "position_start" }
      ]
    }
  ]
}"#;

#[test]
fn registry_validate_accepts_valid_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");
    fs::write(&path, VALID_REGISTRY).unwrap();

    factura()
        .args(["registry", "validate", "-r"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registry is valid"));
}

#[test]
fn registry_validate_reports_issues() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");
    fs::write(&path, BROKEN_REGISTRY).unwrap();

    factura()
        .args(["registry", "validate", "-r"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("date field without a date format"))
        .stderr(predicate::str::contains("position rule without a position"));
}

#[test]
fn registry_show_lists_partners() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registry.json");
    fs::write(&path, VALID_REGISTRY).unwrap();

    factura()
        .args(["registry", "show", "-r"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme SARL"))
        .stdout(predicate::str::contains("own company, excluded"));
}

#[test]
fn config_init_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    factura()
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .success();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("default_currency"));

    // Refuses to overwrite without --force.
    factura()
        .args(["config", "init", "-o"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn process_rejects_missing_input() {
    let dir = tempdir().unwrap();
    let registry = dir.path().join("registry.json");
    fs::write(&registry, VALID_REGISTRY).unwrap();

    factura()
        .args(["process", "missing.pdf", "-r"])
        .arg(&registry)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn process_rejects_garbage_pdf() {
    let dir = tempdir().unwrap();
    let registry = dir.path().join("registry.json");
    fs::write(&registry, VALID_REGISTRY).unwrap();
    let pdf = dir.path().join("invoice.pdf");
    fs::write(&pdf, b"this is not a pdf").unwrap();

    factura()
        .arg("process")
        .arg(&pdf)
        .args(["-r"])
        .arg(&registry)
        .assert()
        .failure();
}

#[test]
fn batch_requires_matching_files() {
    let dir = tempdir().unwrap();
    let registry = dir.path().join("registry.json");
    fs::write(&registry, VALID_REGISTRY).unwrap();

    factura()
        .arg("batch")
        .arg(dir.path().join("*.pdf"))
        .args(["-r"])
        .arg(&registry)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}
