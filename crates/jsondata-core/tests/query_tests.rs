/// Sort-by-path and filter-by-value tests over collections of documents.
use jsondata_core::{
    filter_by_field_value, parse_json, sort_by_path_value, ConflictPolicy, DocError, Document,
    Value,
};

fn docs_from_json(text: &str) -> Vec<Document> {
    match parse_json(text).unwrap() {
        Value::List(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Document(doc) => doc,
                other => panic!("expected document, got {other:?}"),
            })
            .collect(),
        other => panic!("expected list, got {other:?}"),
    }
}

fn filter_fixture() -> Vec<Document> {
    let keys = ["one", "two", "three"];
    vec![
        Document::from_keys_and_values(
            keys,
            vec![Value::from(1), Value::from("dos"), Value::from("tres")],
            false,
            ConflictPolicy::Reject,
        )
        .unwrap(),
        Document::from_keys_and_values(
            keys,
            vec![Value::from(2), Value::from("uno"), Value::from(3)],
            false,
            ConflictPolicy::Reject,
        )
        .unwrap(),
        Document::from_keys_and_values(["uno", "dos"], [1, 2], false, ConflictPolicy::Reject)
            .unwrap(),
    ]
}

// ============================================================================
// Filter
// ============================================================================

#[test]
fn filter_missing_key_matches_nothing() {
    let (matching, rest) = filter_by_field_value(&filter_fixture(), "eins", &Value::from(1));
    assert_eq!(matching.len(), 0);
    assert_eq!(rest.len(), 3);
}

#[test]
fn filter_non_string_uses_equality() {
    let (matching, rest) = filter_by_field_value(&filter_fixture(), "one", &Value::from(1));
    assert_eq!(matching.len(), 1);
    assert_eq!(rest.len(), 2);
}

#[test]
fn filter_string_is_case_insensitive_substring() {
    let docs = filter_fixture();
    let (matching, rest) = filter_by_field_value(&docs, "two", &Value::from("O"));
    assert_eq!(matching.len(), 2);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0], docs[2]);

    let (matching, rest) = filter_by_field_value(&docs, "three", &Value::from("TRES"));
    assert_eq!(matching.len(), 1);
    assert_eq!(rest.len(), 2);
}

#[test]
fn filter_string_matches_stringified_numbers() {
    let (matching, _) = filter_by_field_value(&filter_fixture(), "three", &Value::from("3"));
    assert_eq!(matching.len(), 1);
}

#[test]
fn filter_follows_nested_paths() {
    let docs = docs_from_json(r#"[{"a":{"b":"Hello"}},{"a":"flat"},{"a":{"b":"bye"}}]"#);
    let (matching, rest) = filter_by_field_value(&docs, "a.b", &Value::from("ell"));
    assert_eq!(matching, vec![docs[0].clone()]);
    assert_eq!(rest, vec![docs[1].clone(), docs[2].clone()]);
}

// ============================================================================
// Sort
// ============================================================================

#[test]
fn sort_is_ascending_and_reports_values() {
    let docs = docs_from_json(r#"[{"n":3,"id":"c"},{"n":1,"id":"a"},{"n":2.5,"id":"b"}]"#);
    let (sorted, values) = sort_by_path_value(&docs, "n").unwrap();
    let ids: Vec<&str> = sorted
        .iter()
        .map(|d| d.get("id").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
    assert_eq!(values, vec![Value::from(1), Value::from(2.5), Value::from(3)]);
}

#[test]
fn sort_is_stable_for_equal_values() {
    let docs = docs_from_json(r#"[{"k":"x","i":0},{"k":"a","i":1},{"k":"x","i":2}]"#);
    let (sorted, _) = sort_by_path_value(&docs, "k").unwrap();
    let order: Vec<i64> = sorted
        .iter()
        .map(|d| d.get("i").and_then(Value::as_i64).unwrap())
        .collect();
    assert_eq!(order, [1, 0, 2]);
}

#[test]
fn sort_puts_missing_paths_first() {
    let docs = docs_from_json(r#"[{"a":{"b":2}},{"other":1},{"a":{"b":1}},{"a":5}]"#);
    let (sorted, values) = sort_by_path_value(&docs, "a.b").unwrap();
    assert_eq!(
        values,
        vec![Value::Null, Value::Null, Value::from(1), Value::from(2)]
    );
    assert_eq!(sorted[0], docs[1]);
    assert_eq!(sorted[1], docs[3]);
    assert_eq!(sorted[2], docs[2]);
}

#[test]
fn sort_mixed_types_is_not_comparable() {
    let docs = docs_from_json(r#"[{"v":1},{"v":"1"}]"#);
    let err = sort_by_path_value(&docs, "v").unwrap_err();
    assert!(matches!(
        err,
        DocError::NotComparable {
            left: "integer",
            right: "string"
        }
    ));
}

#[test]
fn sort_containers_is_not_comparable() {
    let docs = docs_from_json(r#"[{"v":[1]},{"v":[0]}]"#);
    assert!(sort_by_path_value(&docs, "v").is_err());
}

#[test]
fn sort_empty_input() {
    let (sorted, values) = sort_by_path_value(&[], "x").unwrap();
    assert!(sorted.is_empty());
    assert!(values.is_empty());
}
