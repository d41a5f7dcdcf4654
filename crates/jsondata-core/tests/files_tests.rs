/// File collaborator tests: extension checks and read/write through each
/// bridge, using temporary directories.
use std::fs;

use jsondata_core::{
    read_csv_file, read_file, read_file_as, read_json_file, read_xml_file, write_csv_file,
    write_file, write_file_as, write_json_file, write_xml_file, ConflictPolicy, DocError,
    Document, Format, Value,
};
use tempfile::tempdir;

fn sample() -> Document {
    Document::from_keys_and_values(
        ["user.name", "user.age"],
        vec![Value::from("Ann"), Value::from(41)],
        true,
        ConflictPolicy::Reject,
    )
    .unwrap()
}

#[test]
fn json_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.json");
    write_json_file(&path, &Value::Document(sample())).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("\n  \"user\": {"));
    assert_eq!(read_json_file(&path).unwrap(), Value::Document(sample()));
}

#[test]
fn xml_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.xml");
    write_xml_file(&path, &sample(), None).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<user>\n  <name>Ann</name>\n  <age>41</age>\n</user>\n"
    );
    assert_eq!(read_xml_file(&path).unwrap(), Value::Document(sample()));
}

#[test]
fn csv_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rows.csv");
    let rows: Vec<Document> = ["a", "b"]
        .into_iter()
        .map(|n| Document::from_keys_and_values(["name"], [n], false, ConflictPolicy::Reject).unwrap())
        .collect();
    write_csv_file(&path, &rows).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "name\na\nb");
    assert_eq!(read_csv_file(&path).unwrap(), rows);
}

#[test]
fn typed_functions_check_extension_before_io() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    let err = write_json_file(&path, &Value::Null).unwrap_err();
    assert!(matches!(err, DocError::UnsupportedExtension { .. }));
    assert!(!path.exists());

    let wrong = dir.path().join("doc.json");
    assert!(matches!(
        read_xml_file(&wrong),
        Err(DocError::UnsupportedExtension { .. })
    ));
}

#[test]
fn extension_check_ignores_case() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("DOC.JSON");
    write_json_file(&path, &Value::from(1)).unwrap();
    assert_eq!(read_json_file(&path).unwrap(), Value::from(1));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DocError::Io(_)));
}

#[test]
fn generic_functions_dispatch_by_extension() {
    let dir = tempdir().unwrap();
    let value = Value::Document(sample());
    for format in Format::ALL {
        let path = dir.path().join(format!("out.{format}"));
        write_file(&path, &value, None).unwrap();
        let back = read_file(&path).unwrap();
        match format {
            Format::Csv => assert_eq!(back.as_list().map(<[Value]>::len), Some(1)),
            _ => assert_eq!(back, value),
        }
    }
}

#[test]
fn generic_write_rejects_unknown_extension() {
    let dir = tempdir().unwrap();
    let err = write_file(dir.path().join("x.yaml"), &Value::Null, None).unwrap_err();
    assert!(err.to_string().contains(".json, .xml, .csv"));
}

#[test]
fn explicit_format_still_checks_extension() {
    let dir = tempdir().unwrap();
    let value = Value::Document(sample());

    let txt = dir.path().join("out.txt");
    let err = write_file_as(&txt, Format::Json, &value, None, false).unwrap_err();
    assert!(matches!(err, DocError::UnsupportedExtension { .. }));
    assert!(!txt.exists());

    let xml = dir.path().join("out.xml");
    assert!(matches!(
        write_file_as(&xml, Format::Json, &value, None, false),
        Err(DocError::UnsupportedExtension { .. })
    ));
    assert!(!xml.exists());

    write_file_as(&xml, Format::Xml, &value, Some("doc"), false).unwrap();
    assert!(fs::read_to_string(&xml).unwrap().starts_with("<doc>"));
    assert!(matches!(
        read_file_as(&xml, Format::Json),
        Err(DocError::UnsupportedExtension { .. })
    ));
    let back = read_file_as(&xml, Format::Xml).unwrap();
    assert_eq!(back.as_document().and_then(|d| d.get("doc")), Some(&value));
}

#[test]
fn explicit_format_writes_compact_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.json");
    write_file_as(&path, Format::Json, &Value::Document(sample()), None, true).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"{"user":{"name":"Ann","age":41}}"#
    );
}
