//! Purpose: Lock the record store and handle contract through the public API.
//! Exports: Integration tests only.
//! Role: Checks partition, ordering, first-match and lifecycle properties end to end.
//! Invariants: Fixtures mix scalar and list-valued fields in one collection.

use recsearch::api::{Database, ErrorKind, Record, ScalarValue, Source, matches};
use serde_json::{Value, json};

fn fixture() -> Vec<Value> {
    vec![
        json!({"_id": 1, "role": "admin", "tags": ["a", "b"], "active": true}),
        json!({"_id": 2, "role": "agent", "tags": ["b"], "active": false}),
        json!({"_id": 3, "role": "admin", "tags": [], "active": true, "note": null}),
        json!({"_id": "3", "role": "end-user"}),
    ]
}

fn connected() -> Database {
    Database::labeled("users")
        .connect(Source::Records(fixture()), None)
        .expect("connect")
}

fn queries() -> Vec<(&'static str, ScalarValue)> {
    vec![
        ("_id", ScalarValue::from(3)),
        ("_id", ScalarValue::from("3")),
        ("role", ScalarValue::from("admin")),
        ("tags", ScalarValue::from("b")),
        ("tags", ScalarValue::from("z")),
        ("active", ScalarValue::from(true)),
        ("note", ScalarValue::from("")),
    ]
}

fn records() -> Vec<Record> {
    fixture()
        .into_iter()
        .map(|value| value.as_object().cloned().expect("object"))
        .collect()
}

#[test]
fn filter_is_an_ordered_partition() {
    let db = connected();
    let all = records();
    for (field, value) in queries() {
        let hits = db.filter(field, &value).expect("filter");
        let expected = all
            .iter()
            .filter(|record| matches(record, field, &value))
            .collect::<Vec<_>>();
        assert_eq!(hits, expected, "query {field}={value}");
        for record in &all {
            let included = hits.contains(&record);
            assert_eq!(included, matches(record, field, &value));
        }
    }
}

#[test]
fn get_is_first_of_filter() {
    let db = connected();
    for (field, value) in queries() {
        let first = db.filter(field, &value).expect("filter").first().copied();
        assert_eq!(db.get(field, &value).expect("get"), first);
    }
}

#[test]
fn ids_do_not_cross_types() {
    let db = connected();
    let by_int = db.filter("_id", &ScalarValue::from(3)).expect("filter");
    assert_eq!(by_int.len(), 1);
    assert_eq!(by_int[0]["role"], "admin");
    let by_text = db.filter("_id", &ScalarValue::from("3")).expect("filter");
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0]["role"], "end-user");
}

#[test]
fn unknown_field_fails_for_any_value() {
    let db = connected();
    for value in [
        ScalarValue::from(""),
        ScalarValue::from(0),
        ScalarValue::from(false),
    ] {
        let err = db.filter("nickname", &value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FieldNotFound);
        assert_eq!(err.collection(), Some("users"));
    }
}

#[test]
fn unconnected_handle_never_answers() {
    let db = Database::new();
    for (field, value) in queries() {
        assert_eq!(
            db.filter(field, &value).unwrap_err().kind(),
            ErrorKind::NotConnected
        );
        assert_eq!(db.get(field, &value).unwrap_err().kind(), ErrorKind::NotConnected);
    }
    assert_eq!(db.fields().unwrap_err().kind(), ErrorKind::NotConnected);
}

#[test]
fn repeated_queries_are_stable() {
    let db = connected();
    let fields = db.fields().expect("fields").clone();
    for (field, value) in queries() {
        let once = db.filter(field, &value).expect("filter");
        let twice = db.filter(field, &value).expect("filter");
        assert_eq!(once, twice);
    }
    assert_eq!(db.fields().expect("fields"), &fields);
    assert!(!fields.is_empty());
}

#[test]
fn wrong_typed_values_are_rejected_before_querying() {
    for raw in [json!(null), json!(1.25), json!(["a"]), json!({"a": 1})] {
        let err = ScalarValue::try_from(&raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}

#[test]
fn file_sources_load_and_reject_bad_shapes() {
    let temp = tempfile::tempdir().expect("tempdir");
    let good = temp.path().join("good.json");
    std::fs::write(&good, r#"[{"_id": 5, "active": true}, {"_id": 9, "active": false}]"#)
        .expect("write");
    let db = Database::new()
        .connect(Source::path(&good), None)
        .expect("connect");
    let hits = db.filter("active", &ScalarValue::from(true)).expect("filter");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["_id"], 5);

    let cases = [
        ("object.json", r#"{"_id": 1}"#, ErrorKind::DataFormat),
        ("broken.json", r#"[{"_id": 1},"#, ErrorKind::DataFormat),
        ("mixed.json", r#"[{"a": 1}, "not-an-object"]"#, ErrorKind::DataInvalid),
    ];
    for (name, body, kind) in cases {
        let path = temp.path().join(name);
        std::fs::write(&path, body).expect("write");
        let err = Database::new()
            .connect(Source::path(&path), None)
            .unwrap_err();
        assert_eq!(err.kind(), kind, "{name}");
    }
}
