//! Exercise record normalization.
//!
//! Maps one loosely typed record to a canonical [`Exercise`]. Each field is
//! resolved independently from an ordered alias list; the first alias holding
//! a usable value wins, otherwise the field's default applies. Normalization
//! never fails.

use serde_json::Value;

use super::model::{
    DEFAULT_EXERCISE_NAME, DEFAULT_REP_RANGE, DEFAULT_SETS, Exercise, ExerciseId, MAX_SETS,
};

/// Keys consulted for the exercise name, in priority order.
pub const NAME_KEYS: &[&str] = &["ejercicio", "exercise"];

/// Keys consulted for the set count, in priority order.
pub const SETS_KEYS: &[&str] = &["series", "sets"];

/// Keys consulted for the rep range, in priority order.
pub const REP_RANGE_KEYS: &[&str] = &["repeticiones", "rep_range"];

/// Normalize a raw record into an exercise carrying `id`.
pub fn normalize_exercise(record: &Value, id: ExerciseId) -> Exercise {
    let name = first_match(record, NAME_KEYS, as_text)
        .unwrap_or_else(|| DEFAULT_EXERCISE_NAME.to_string());
    let sets = first_match(record, SETS_KEYS, as_set_count).unwrap_or(DEFAULT_SETS);
    let rep_range = first_match(record, REP_RANGE_KEYS, as_text)
        .unwrap_or_else(|| DEFAULT_REP_RANGE.to_string());

    Exercise::new(id, name, sets, rep_range)
}

fn first_match<T>(record: &Value, keys: &[&str], coerce: fn(&Value) -> Option<T>) -> Option<T> {
    let fields = record.as_object()?;
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(coerce)
}

/// Non-empty text; numbers are accepted and rendered as text.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Set count in `1..=MAX_SETS` from a number or a numeric string.
fn as_set_count(value: &Value) -> Option<u32> {
    let count = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 1.0)
                .map(|f| f.trunc() as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    if count == 0 || count > u64::from(MAX_SETS) {
        return None;
    }
    u32::try_from(count).ok()
}
