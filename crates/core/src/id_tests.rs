// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId;
}

#[test]
fn define_id_hash_map_lookup() {
    let mut map = HashMap::new();
    map.insert(TestId::new("k"), 42);
    assert_eq!(map.get("k"), Some(&42));
}

#[test]
fn define_id_display_is_raw_value() {
    assert_eq!(TestId::new("nightly-import").to_string(), "nightly-import");
}

#[test]
fn define_id_from_number() {
    assert_eq!(TestId::from(42), "42");
}

#[yare::parameterized(
    string_id = { r#""abc-1""#, "abc-1" },
    number_id = { "42",         "42" },
    zero      = { "0",          "0" },
)]
fn define_id_deserializes_text_or_number(json: &str, expected: &str) {
    let id: TestId = serde_json::from_str(json).unwrap();
    assert_eq!(id, expected);
}

#[test]
fn define_id_serializes_as_string() {
    let json = serde_json::to_string(&TestId::from(7)).unwrap();
    assert_eq!(json, "\"7\"");
}

#[test]
fn define_id_rejects_objects() {
    assert!(serde_json::from_str::<TestId>("{}").is_err());
}
