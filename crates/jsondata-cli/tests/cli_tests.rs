//! Integration tests for the `jsondata` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to drive each subcommand
//! through the actual binary, covering stdin/stdout piping, file I/O with
//! extension-based format detection, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use jsondata_core::{parse_json, Value};
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn jsondata() -> Command {
    Command::cargo_bin("jsondata").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// convert
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn convert_stdin_json_to_xml() {
    jsondata()
        .args(["convert", "--to", "xml"])
        .write_stdin(r#"{"note":{"@id":1,"to":"Tove"}}"#)
        .assert()
        .success()
        .stdout("<note id=\"1\">\n  <to>Tove</to>\n</note>\n");
}

#[test]
fn convert_compact_json() {
    jsondata()
        .args(["convert", "--compact"])
        .write_stdin("{ \"b\": 1,\n \"a\": [true, null] }")
        .assert()
        .success()
        .stdout("{\"b\":1,\"a\":[true,null]}\n");
}

#[test]
fn convert_csv_file_to_json_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("people.json");
    jsondata()
        .args(["convert", "-i", fixture("people.csv").as_str(), "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let value = parse_json(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let rows = value.as_list().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[1].as_document().unwrap().get("city"),
        Some(&Value::from("Portland, OR"))
    );
}

#[test]
fn convert_xml_file_to_json() {
    jsondata()
        .args(["convert", "-i", fixture("note.xml").as_str(), "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"note":{"@priority":2,"to":"Tove","from":"Jani""#,
        ));
}

#[test]
fn convert_multi_key_to_xml_needs_root() {
    jsondata()
        .args(["convert", "--to", "xml"])
        .write_stdin(r#"{"a":1,"b":2}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one root element"));

    jsondata()
        .args(["convert", "--to", "xml", "--root", "doc"])
        .write_stdin(r#"{"a":1,"b":2}"#)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<doc>"));
}

#[test]
fn convert_invalid_json_fails() {
    jsondata()
        .arg("convert")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse json input"));
}

#[test]
fn convert_unknown_output_extension_fails() {
    let dir = tempdir().unwrap();
    jsondata()
        .args(["convert", "-i", fixture("sample.json").as_str(), "-o"])
        .arg(dir.path().join("out.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file extension"));
}

#[test]
fn explicit_output_format_must_match_extension() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.txt");
    jsondata()
        .args(["convert", "--to", "json", "-i", fixture("sample.json").as_str(), "-o"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file extension"));
    assert!(!out.exists());
}

#[test]
fn explicit_input_format_must_match_extension() {
    jsondata()
        .args(["convert", "--from", "json", "-i", fixture("note.xml").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file extension"));
}

#[test]
fn explicit_formats_with_matching_files() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("note.json");
    jsondata()
        .args(["convert", "--from", "xml", "-i", fixture("note.xml").as_str()])
        .args(["--to", "json", "--compact", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(r#"{"note":{"@priority":2,"#));
}

// ─────────────────────────────────────────────────────────────────────────────
// get / remove / sort-keys
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn get_nested_scalar() {
    jsondata()
        .args(["get", "user.address.city", "-i", fixture("sample.json").as_str()])
        .assert()
        .success()
        .stdout("Portland\n");
}

#[test]
fn get_container_prints_json() {
    jsondata()
        .args(["get", "tags", "-i", fixture("sample.json").as_str()])
        .assert()
        .success()
        .stdout("[\n  \"admin\",\n  \"dev\"\n]\n");
}

#[test]
fn get_flat_does_not_descend() {
    jsondata()
        .args(["get", "user.name", "--flat", "-i", fixture("sample.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key not found"));
}

#[test]
fn get_through_scalar_reports_type_mismatch() {
    jsondata()
        .args(["get", "active.flag", "-i", fixture("sample.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a document"));
}

#[test]
fn remove_prunes_empty_parents() {
    jsondata()
        .args(["remove", "a.b", "c", "--compact"])
        .write_stdin(r#"{"a":{"b":1},"c":2,"d":3}"#)
        .assert()
        .success()
        .stdout("{\"d\":3}\n");
}

#[test]
fn remove_missing_key_fails() {
    jsondata()
        .args(["remove", "nope"])
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .failure();
}

#[test]
fn sort_keys_orders_top_level() {
    jsondata()
        .args(["sort-keys", "--compact"])
        .write_stdin(r#"{"b":{"z":1,"y":2},"a":0}"#)
        .assert()
        .success()
        .stdout("{\"a\":0,\"b\":{\"z\":1,\"y\":2}}\n");
}

#[test]
fn non_document_input_is_rejected() {
    jsondata()
        .arg("sort-keys")
        .write_stdin("[1, 2]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected a document, found list"));
}

// ─────────────────────────────────────────────────────────────────────────────
// merge / options
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn merge_with_combine_collects_values() {
    jsondata()
        .args(["merge", fixture("sample.json").as_str(), fixture("extra.json").as_str()])
        .args(["--policy", "Combine", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tags":["admin","dev","ops"]"#));
}

#[test]
fn merge_default_policy_rejects_duplicates() {
    jsondata()
        .args(["merge", fixture("sample.json").as_str(), fixture("extra.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate key"));
}

#[test]
fn merge_update_keeps_last_writer() {
    jsondata()
        .args(["merge", fixture("sample.json").as_str(), fixture("extra.json").as_str()])
        .args(["--policy", "update", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tags":"ops""#))
        .stdout(predicate::str::contains(r#""email":"alice@example.com""#));
}

#[test]
fn merge_unknown_policy_is_a_usage_error() {
    jsondata()
        .args(["merge", fixture("sample.json").as_str(), "--policy", "Overwrite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Overwrite"));
}

#[test]
fn options_lists_policy_names() {
    jsondata()
        .arg("options")
        .assert()
        .success()
        .stdout("None\tReject\nUpdate\tReplace\nCombine\tCombine\n");
}

#[test]
fn debug_logging_goes_to_stderr() {
    jsondata()
        .args(["convert", "--compact"])
        .env("RUST_LOG", "jsondata_core=trace")
        .write_stdin(r#"{"a":1}"#)
        .assert()
        .success()
        .stdout("{\"a\":1}\n")
        .stderr(predicate::str::contains("inserting key"));
}
