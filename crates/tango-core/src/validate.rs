use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};
use tango_types::{VocabList, wire};

use crate::language::VocabLanguage;

/// Why a single field failed its shape check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeProblem {
    Missing,
    WrongType { expected: &'static str },
    Empty,
    NotAnObject,
    /// An entry inside a string array is empty or not a string
    BadEntry { position: usize },
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "is missing"),
            Self::WrongType { expected } => write!(f, "has the wrong type, expected {expected}"),
            Self::Empty => write!(f, "is empty"),
            Self::NotAnObject => write!(f, "is not an object"),
            Self::BadEntry { position } => {
                write!(f, "has an empty or non-string entry at position {position}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("completion text is not valid JSON: {reason}")]
    NotParseable { reason: String },

    #[error("expected a JSON array at the top level, found {found}")]
    NotAnArray { found: &'static str },

    #[error("item {index}: `{field}` {problem}")]
    InvalidItemShape {
        index: usize,
        field: &'static str,
        problem: ShapeProblem,
    },

    #[error("item {item}, part {part}: `{field}` {problem}")]
    InvalidPartShape {
        item: usize,
        part: usize,
        field: &'static str,
        problem: ShapeProblem,
    },
}

impl ValidationError {
    /// Stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotParseable { .. } => "not_parseable",
            Self::NotAnArray { .. } => "not_an_array",
            Self::InvalidItemShape { .. } => "invalid_item_shape",
            Self::InvalidPartShape { .. } => "invalid_part_shape",
        }
    }
}

/// Field label used when an array element is not an object at all
const ELEMENT: &str = "element";

/// Parse model output and enforce the vocabulary schema.
///
/// Every element is checked before any typed value is built, so a list is
/// either returned whole or not at all. No trimming or normalization happens.
pub fn validate(raw: &str) -> Result<VocabList, ValidationError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ValidationError::NotParseable {
        reason: e.to_string(),
    })?;

    let Value::Array(items) = &value else {
        return Err(ValidationError::NotAnArray {
            found: kind_of(&value),
        });
    };

    for (index, item) in items.iter().enumerate() {
        check_item(index, item)?;
    }

    serde_json::from_value(value).map_err(|e| ValidationError::NotParseable {
        reason: e.to_string(),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_item(index: usize, item: &Value) -> Result<(), ValidationError> {
    let item_error = |field, problem| ValidationError::InvalidItemShape {
        index,
        field,
        problem,
    };

    let Value::Object(fields) = item else {
        return Err(item_error(ELEMENT, ShapeProblem::NotAnObject));
    };

    for field in [wire::TOKEN, wire::TRANSLITERATION, wire::GLOSS] {
        check_text(fields, field).map_err(|problem| item_error(field, problem))?;
    }

    let parts = check_array(fields, wire::PARTS).map_err(|problem| item_error(wire::PARTS, problem))?;

    for (part_index, part) in parts.iter().enumerate() {
        check_part(index, part_index, part)?;
    }

    Ok(())
}

fn check_part(item: usize, part: usize, value: &Value) -> Result<(), ValidationError> {
    let part_error = |field, problem| ValidationError::InvalidPartShape {
        item,
        part,
        field,
        problem,
    };

    let Value::Object(fields) = value else {
        return Err(part_error(ELEMENT, ShapeProblem::NotAnObject));
    };

    check_text(fields, wire::PART_UNIT).map_err(|problem| part_error(wire::PART_UNIT, problem))?;

    let readings = check_array(fields, wire::PART_READINGS)
        .map_err(|problem| part_error(wire::PART_READINGS, problem))?;

    for (position, reading) in readings.iter().enumerate() {
        if !matches!(reading, Value::String(s) if !s.is_empty()) {
            return Err(part_error(
                wire::PART_READINGS,
                ShapeProblem::BadEntry { position },
            ));
        }
    }

    Ok(())
}

/// Present, a string and non-empty. `null` counts as missing
fn check_text(fields: &Map<String, Value>, field: &str) -> Result<(), ShapeProblem> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ShapeProblem::Missing),
        Some(Value::String(s)) if s.is_empty() => Err(ShapeProblem::Empty),
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err(ShapeProblem::WrongType { expected: "string" }),
    }
}

/// Present, an array and non-empty
fn check_array<'a>(
    fields: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a Vec<Value>, ShapeProblem> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ShapeProblem::Missing),
        Some(Value::Array(values)) if values.is_empty() => Err(ShapeProblem::Empty),
        Some(Value::Array(values)) => Ok(values),
        Some(_) => Err(ShapeProblem::WrongType { expected: "array" }),
    }
}

/// Things worth logging about a valid list that never make it invalid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Observations {
    /// Entries whose token already appeared earlier in the list
    pub duplicate_tokens: usize,
    /// Indices of entries whose joined parts differ from the token
    pub unreconstructed: Vec<usize>,
}

impl Observations {
    pub fn is_clean(&self) -> bool {
        self.duplicate_tokens == 0 && self.unreconstructed.is_empty()
    }
}

pub fn observe(list: &VocabList, language: &dyn VocabLanguage) -> Observations {
    let mut seen = HashSet::new();
    let duplicate_tokens = list
        .iter()
        .filter(|item| !seen.insert(item.token.as_str()))
        .count();

    let unreconstructed = list
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            language.normalize(&item.joined_units()) != language.normalize(&item.token)
        })
        .map(|(index, _)| index)
        .collect();

    Observations {
        duplicate_tokens,
        unreconstructed,
    }
}
