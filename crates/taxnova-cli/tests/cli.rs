use std::path::{Path, PathBuf};

use assert_cmd::Command;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use predicates::prelude::*;
use tempfile::TempDir;

/// Single-page certificate with the given text on one line.
fn write_certificate(dir: &Path, text: &str) -> PathBuf {
    write_pdf(dir, Some(text))
}

/// Single page with `text` on one line, or an empty page.
fn write_pdf(dir: &Path, text: Option<&str>) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let operations = match text {
        Some(text) => vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 10.into()]),
            Operation::new("Td", vec![40.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
        None => vec![],
    };
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join("form16.pdf");
    doc.save(&path).unwrap();
    path
}

/// Command isolated from the user's config, env file and API key.
fn taxnova(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taxnova").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("GROQ_API_KEY");
    cmd
}

#[test]
fn estimate_floored_by_default() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["estimate", "--taxable-income", "8,00,000", "--tds", "30000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Tax Liability: ₹12,250.00"))
        .stdout(predicate::str::contains("Remaining Tax Payable: ₹0.00"));
}

#[test]
fn estimate_signed_reports_refund() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["estimate", "--taxable-income", "800000", "--tds", "30000", "--policy", "signed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refund Due: ₹17,750.00"));
}

#[test]
fn estimate_high_income_payable() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["estimate", "--taxable-income", "15,00,000", "--tds", "50,000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxable Income after Deductions: ₹11,25,000.00"))
        .stdout(predicate::str::contains("Remaining Tax Payable: ₹1,00,000.00"));
}

#[test]
fn estimate_from_certificate() {
    let home = TempDir::new().unwrap();
    let pdf = write_certificate(
        home.path(),
        "Gross Salary: 9,50,000 Tax Deducted at Source: 30,000 Taxable Income: 8,00,000",
    );
    taxnova(&home)
        .args(["estimate", "--policy", "signed"])
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("Gross Salary:    ₹9,50,000.00"))
        .stdout(predicate::str::contains("Refund Due: ₹17,750.00"));
}

#[test]
fn extract_csv() {
    let home = TempDir::new().unwrap();
    let pdf = write_certificate(
        home.path(),
        "Gross Salary: 9,50,000 Tax Deducted at Source: 30,000 Taxable Income: 8,00,000",
    );
    taxnova(&home)
        .args(["extract", "--format", "csv"])
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("gross_salary,tax_deducted_at_source,taxable_income"))
        .stdout(predicate::str::contains("950000,30000,800000"));
}

#[test]
fn extract_blank_document_defaults_to_zero() {
    let home = TempDir::new().unwrap();
    let pdf = write_pdf(home.path(), None);
    taxnova(&home)
        .args(["extract", "--format", "csv"])
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("0,0,0"));
}

#[test]
fn estimate_negative_income_passes_through() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["estimate", "--taxable-income=-800000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Taxable Income after Deductions: ₹0.00"))
        .stdout(predicate::str::contains("Total Tax Liability: ₹0.00"));
}

#[test]
fn estimate_rejects_malformed_amount() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["estimate", "--taxable-income", "8 lakh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an amount"));
}

#[test]
fn extract_missing_file_fails() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["extract", "no-such-form16.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn file_is_marked_as_simulation() {
    let home = TempDir::new().unwrap();
    let pdf = write_certificate(home.path(), "Taxable Income: 8,00,000");
    taxnova(&home)
        .arg("file")
        .arg(&pdf)
        .assert()
        .success()
        .stdout(predicate::str::contains("SIMULATION"))
        .stdout(predicate::str::contains("ITR123456789"));
}

#[test]
fn resources_lists_portal() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .arg("resources")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://www.incometax.gov.in/iec/foportal/"));
}

#[test]
fn ask_without_api_key_fails() {
    let home = TempDir::new().unwrap();
    taxnova(&home)
        .args(["ask", "What", "is", "80C?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("taxnova.json");
    let config = config.to_str().unwrap();

    taxnova(&home)
        .args(["--config", config, "config", "set", "tax.due_policy", "signed"])
        .assert()
        .success();
    taxnova(&home)
        .args(["--config", config, "config", "get", "tax.due_policy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"signed\""));

    taxnova(&home)
        .args(["--config", config, "estimate", "--taxable-income", "800000", "--tds", "30000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Refund Due: ₹17,750.00"));
}

#[test]
fn config_rejects_unknown_policy() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("taxnova.json");
    taxnova(&home)
        .args(["--config", config.to_str().unwrap(), "config", "set", "tax.due_policy", "sometimes"])
        .assert()
        .failure();
}
