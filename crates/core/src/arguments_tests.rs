// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_single_string_argument() {
    let args = parse_arguments("stores:str:saxo,bog").unwrap();
    assert_eq!(
        args,
        vec![RunArgument {
            name: "stores".into(),
            kind: ArgumentKind::Str,
            values: vec![ArgumentValue::Str("saxo".into()), ArgumentValue::Str("bog".into())],
        }]
    );
}

#[test]
fn parses_typed_values_across_lines() {
    let text = "limit:int:10\n\ndryRun:bool:TRUE,0\n";
    let args = parse_arguments(text).unwrap();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].values, vec![ArgumentValue::Int(10)]);
    assert_eq!(args[1].values, vec![ArgumentValue::Bool(true), ArgumentValue::Bool(false)]);
}

#[test]
fn empty_text_yields_no_arguments() {
    assert_eq!(parse_arguments("").unwrap(), vec![]);
    assert_eq!(parse_arguments("\n  \n").unwrap(), vec![]);
}

#[yare::parameterized(
    missing_parts   = { "limit:int",          ArgumentError::Format { line: 1 } },
    too_many_parts  = { "a:int:1:2",          ArgumentError::Format { line: 1 } },
    bad_name        = { "my-arg:str:x",       ArgumentError::InvalidName { line: 1, name: "my-arg".into() } },
    bad_type        = { "limit:float:1",      ArgumentError::InvalidType { line: 1, kind: "float".into() } },
    bad_chars       = { "ids:str:a b",        ArgumentError::InvalidValues { line: 1, name: "ids".into() } },
    missing_values  = { "ids:str:",           ArgumentError::InvalidValues { line: 1, name: "ids".into() } },
    not_an_int      = { "limit:int:ten",      ArgumentError::InvalidValue { line: 1, name: "limit".into(), kind: ArgumentKind::Int, value: "ten".into() } },
    not_a_bool      = { "flag:bool:yes",      ArgumentError::InvalidValue { line: 1, name: "flag".into(), kind: ArgumentKind::Bool, value: "yes".into() } },
)]
fn rejects_invalid_line(text: &str, expected: ArgumentError) {
    let err = parse_arguments(text).unwrap_err();
    assert_eq!(err.0, vec![expected]);
}

#[test]
fn reports_errors_from_every_line() {
    let err = parse_arguments("ok:str:x\nbad\nlimit:int:nope").unwrap_err();
    assert_eq!(err.0.len(), 2);
    assert!(matches!(err.0[0], ArgumentError::Format { line: 2 }));
    assert!(matches!(err.0[1], ArgumentError::InvalidValue { line: 3, .. }));
    assert!(err.to_string().contains("; "));
}

#[test]
fn format_renders_text_form() {
    let args = parse_arguments("limit:int:10,20\nflag:bool:1").unwrap();
    assert_eq!(format_arguments(&args), "limit:int:10,20\nflag:bool:true");
}

#[test]
fn argument_json_uses_type_key() {
    let args = parse_arguments("limit:int:10").unwrap();
    let json = serde_json::to_value(&args[0]).unwrap();
    assert_eq!(json, serde_json::json!({"name": "limit", "type": "int", "values": [10]}));
}
