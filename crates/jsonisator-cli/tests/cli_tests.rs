//! Integration tests for the `jsonisator` CLI binary.
//!
//! These exercise the sample, parse, reformat and check subcommands through
//! the built binary, including stdin/stdout piping, file output, append mode
//! and error exits.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn customer_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/customer.json")
}

fn products_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/products.json")
}

fn customer_json() -> String {
    std::fs::read_to_string(customer_json_path()).expect("customer.json fixture must exist")
}

fn temp_path(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("jsonisator-cli-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_file(&path);
    path
}

fn jsonisator() -> Command {
    Command::cargo_bin("jsonisator").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// sample
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sample_to_stdout_is_valid_json() {
    let output = jsonisator().arg("sample").assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["firstName"], "Reuben");
    assert_eq!(value["orders"][0]["products"][1]["name"], "product 2");
}

#[test]
fn sample_many_is_array() {
    let output = jsonisator()
        .args(["sample", "--count", "3"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(3));
}

#[test]
fn sample_to_file_then_append() {
    let path = temp_path("sample.json");

    jsonisator()
        .args(["sample", "-o"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let first = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str::<serde_json::Value>(&first).unwrap();

    jsonisator()
        .args(["sample", "--append", "-o"])
        .arg(&path)
        .assert()
        .success();
    let both = std::fs::read_to_string(&path).unwrap();
    assert!(both.starts_with(&first));
    assert!(both.len() > first.len());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn append_requires_output() {
    jsonisator().args(["sample", "--append"]).assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// parse
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn parse_customer_prints_debug_form() {
    jsonisator()
        .args(["parse", "--type", "customer", "-i", customer_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Customer {"))
        .stdout(predicate::str::contains("first_name: \"first name\""))
        .stdout(predicate::str::contains("Product {"));
}

#[test]
fn parse_from_stdin() {
    jsonisator()
        .args(["parse", "--type", "model"])
        .write_stdin(r#"{"id": 42, "products": []}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("id: 42"));
}

#[test]
fn parse_reports_field_path() {
    jsonisator()
        .args(["parse", "--type", "product"])
        .write_stdin(r#"{"price": "cheap"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse Product"))
        .stderr(predicate::str::contains("`price`"));
}

#[test]
fn parse_unknown_type_fails() {
    jsonisator()
        .args(["parse", "--type", "invoice"])
        .write_stdin("{}")
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// reformat
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reformat_canonical_document_is_identity() {
    jsonisator()
        .args(["reformat", "--type", "customer", "-i", customer_json_path()])
        .assert()
        .success()
        .stdout(customer_json().trim_end().to_string());
}

#[test]
fn reformat_many_normalizes() {
    let output = jsonisator()
        .args(["reformat", "--type", "product", "--many", "-i", products_json_path()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert!(text.starts_with("[\n  {\n"), "{text}");
    assert!(text.contains("\"price\": 2.0"), "{text}");
    assert!(text.contains("\"id\": \"\""), "{text}");
    assert!(!text.contains("discontinued"), "{text}");
}

#[test]
fn reformat_compact_input_to_file() {
    let path = temp_path("reformat.json");
    jsonisator()
        .args(["reformat", "--type", "model", "-o"])
        .arg(&path)
        .write_stdin(r#"{"products":[{"name":"p","price":1.5,"stock":[]}],"id":3}"#)
        .assert()
        .success();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "{\n  \"id\": 3,\n  \"products\": [\n    {\n      \"id\": \"\",\n      \"name\": \"p\",\n      \"price\": 1.5,\n      \"stock\": []\n    }\n  ]\n}"
    );
    let _ = std::fs::remove_file(&path);
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_valid_document() {
    jsonisator()
        .args(["check", "-i", customer_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid JSON"));
}

#[test]
fn check_reports_offset() {
    jsonisator()
        .arg("check")
        .write_stdin(r#"{"a": [1, 2}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("at byte 11"));
}

#[test]
fn missing_input_file_fails() {
    jsonisator()
        .args(["check", "-i", "/nonexistent/jsonisator.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}
