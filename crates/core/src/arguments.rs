// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed run arguments and their line-oriented text form.
//!
//! One argument per line: `<name>:<type>:<v1>,<v2>,...` where `type` is one
//! of `str`, `int`, `bool`. Names and values are ASCII alphanumeric.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value type of a run argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentKind {
    #[serde(rename = "str")]
    Str,
    #[serde(rename = "int")]
    Int,
    #[serde(rename = "bool")]
    Bool,
}

crate::simple_display! {
    ArgumentKind {
        Str => "str",
        Int => "int",
        Bool => "bool",
    }
}

impl ArgumentKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "str" => Some(Self::Str),
            "int" => Some(Self::Int),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl std::fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// A named, typed argument passed to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunArgument {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArgumentKind,
    pub values: Vec<ArgumentValue>,
}

impl std::fmt::Display for RunArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:", self.name, self.kind)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// A problem with one line of argument text. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("line {line}: expected <name>:<type>:<values>")]
    Format { line: usize },
    #[error("line {line}: invalid argument name '{name}'")]
    InvalidName { line: usize, name: String },
    #[error("line {line}: invalid argument type '{kind}'")]
    InvalidType { line: usize, kind: String },
    #[error("line {line}: invalid characters or missing values for argument '{name}'")]
    InvalidValues { line: usize, name: String },
    #[error("line {line}: '{value}' is not a valid {kind} value for argument '{name}'")]
    InvalidValue { line: usize, name: String, kind: ArgumentKind, value: String },
}

/// Every problem found while parsing a block of argument text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_errors(.0))]
pub struct ArgumentErrors(pub Vec<ArgumentError>);

fn join_errors(errors: &[ArgumentError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

fn is_valid_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Parse argument text. Blank lines are skipped.
///
/// All lines are checked so the operator sees every problem at once.
pub fn parse_arguments(text: &str) -> Result<Vec<RunArgument>, ArgumentErrors> {
    let mut arguments = Vec::new();
    let mut errors = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match parse_line(line, raw) {
            Ok(arg) => arguments.push(arg),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if errors.is_empty() {
        Ok(arguments)
    } else {
        Err(ArgumentErrors(errors))
    }
}

fn parse_line(line: usize, raw: &str) -> Result<RunArgument, Vec<ArgumentError>> {
    let parts: Vec<&str> = raw.split(':').collect();
    let [name, kind, values] = parts.as_slice() else {
        return Err(vec![ArgumentError::Format { line }]);
    };

    let mut errors = Vec::new();
    if !is_valid_token(name) {
        errors.push(ArgumentError::InvalidName { line, name: name.to_string() });
    }
    let parsed_kind = ArgumentKind::parse(kind);
    if parsed_kind.is_none() {
        errors.push(ArgumentError::InvalidType { line, kind: kind.to_string() });
    }

    let raw_values: Vec<&str> = values.split(',').map(str::trim).collect();
    if !raw_values.iter().all(|v| is_valid_token(v)) {
        errors.push(ArgumentError::InvalidValues { line, name: name.to_string() });
        return Err(errors);
    }

    let Some(kind) = parsed_kind else {
        return Err(errors);
    };

    let mut parsed = Vec::with_capacity(raw_values.len());
    for value in raw_values {
        match parse_value(kind, value) {
            Some(v) => parsed.push(v),
            None => errors.push(ArgumentError::InvalidValue {
                line,
                name: name.to_string(),
                kind,
                value: value.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(RunArgument { name: name.to_string(), kind, values: parsed })
    } else {
        Err(errors)
    }
}

fn parse_value(kind: ArgumentKind, value: &str) -> Option<ArgumentValue> {
    match kind {
        ArgumentKind::Str => Some(ArgumentValue::Str(value.to_string())),
        ArgumentKind::Int => value.parse().ok().map(ArgumentValue::Int),
        ArgumentKind::Bool => match value.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(ArgumentValue::Bool(true)),
            "false" | "0" => Some(ArgumentValue::Bool(false)),
            _ => None,
        },
    }
}

/// Render arguments back to their text form, one per line.
pub fn format_arguments(arguments: &[RunArgument]) -> String {
    arguments.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
#[path = "arguments_tests.rs"]
mod tests;
