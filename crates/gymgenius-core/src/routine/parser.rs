//! Routine text parser.
//!
//! Parses the text produced by the generation service into a [`RawRoutine`]:
//! day labels, in the order they appear, mapped to untyped exercise records.
//! The text must be a single JSON object. A syntax failure rejects the whole
//! payload; nothing is salvaged from partially valid text.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while parsing routine text.
#[derive(Debug, Error)]
pub enum RoutineParseError {
    #[error("routine is not valid JSON: {source}")]
    Malformed {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("routine JSON must be an object keyed by day")]
    NotAnObject { raw: String },
}

impl RoutineParseError {
    /// The original text, kept for diagnostics.
    pub fn raw(&self) -> &str {
        match self {
            Self::Malformed { raw, .. } | Self::NotAnObject { raw } => raw,
        }
    }
}

/// One day of the parsed routine: its label and untyped records.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDay {
    pub label: String,
    pub records: Vec<Value>,
}

/// Parsed but not yet normalized routine, in source key order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRoutine {
    pub days: Vec<RawDay>,
}

/// Parse routine text into day-ordered raw records.
pub fn parse_routine(text: &str) -> Result<RawRoutine, RoutineParseError> {
    let value: Value =
        serde_json::from_str(text).map_err(|source| RoutineParseError::Malformed {
            raw: text.to_string(),
            source,
        })?;

    let Value::Object(map) = value else {
        return Err(RoutineParseError::NotAnObject {
            raw: text.to_string(),
        });
    };

    Ok(from_object(map))
}

fn from_object(map: Map<String, Value>) -> RawRoutine {
    let days = map
        .into_iter()
        .map(|(label, value)| {
            let records = match value {
                Value::Array(records) => records,
                // A lone record is taken as a one-exercise day.
                record @ Value::Object(_) => vec![record],
                other => {
                    tracing::warn!(day = %label, value = %other, "day is not a list of exercises; treating as empty");
                    Vec::new()
                }
            };
            RawDay { label, records }
        })
        .collect();
    RawRoutine { days }
}
