//! Canonical workout types.
//!
//! A [`Plan`] is an ordered list of [`Day`]s, each holding an ordered list of
//! [`Exercise`]s. Exercises are identified by an [`ExerciseId`] that the
//! system assigns; identities never come from model output.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name used when a record carries no usable exercise name.
pub const DEFAULT_EXERCISE_NAME: &str = "unspecified exercise";

/// Set count used when a record carries no usable set count.
pub const DEFAULT_SETS: u32 = 3;

/// Largest set count an exercise may carry. Larger values from model output
/// are treated as unusable; larger edits are clamped.
pub const MAX_SETS: u32 = 100;

/// Rep range used when a record carries no usable rep range.
pub const DEFAULT_REP_RANGE: &str = "8-12";

/// Opaque, process-unique identity of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(Uuid);

impl ExerciseId {
    /// Mint a fresh identity.
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single movement entry in a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    id: ExerciseId,
    /// Display name of the movement.
    pub name: String,
    /// Number of sets; drives the length of the tracking flags.
    pub sets: u32,
    /// Free-text repetition range (e.g. `"8-12"`).
    pub rep_range: String,
}

impl Exercise {
    pub(crate) fn new(
        id: ExerciseId,
        name: impl Into<String>,
        sets: u32,
        rep_range: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sets,
            rep_range: rep_range.into(),
        }
    }

    /// A blank exercise as added by the user: empty name, default sets and reps.
    pub(crate) fn blank() -> Self {
        Self::new(ExerciseId::new(), "", DEFAULT_SETS, DEFAULT_REP_RANGE)
    }

    pub fn id(&self) -> ExerciseId {
        self.id
    }
}

/// One labeled bucket of exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    /// Natural-language day name; unique within a plan.
    pub label: String,
    pub exercises: Vec<Exercise>,
}

impl Day {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            exercises: Vec::new(),
        }
    }

    /// Look up an exercise in this day by identity.
    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|ex| ex.id == id)
    }

    pub(crate) fn exercise_mut(&mut self, id: ExerciseId) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|ex| ex.id == id)
    }
}

/// The full multi-day routine, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    days: Vec<Day>,
}

impl Plan {
    /// Build a plan from days, dropping any day whose label repeats an
    /// earlier one so labels stay unique.
    pub(crate) fn from_days(days: Vec<Day>) -> Self {
        let mut plan = Self::default();
        for day in days {
            if plan.day(&day.label).is_some() {
                tracing::warn!(day = %day.label, "dropping duplicate day label");
                continue;
            }
            plan.days.push(day);
        }
        plan
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Look up a day by label.
    pub fn day(&self, label: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.label == label)
    }

    pub(crate) fn day_mut(&mut self, label: &str) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.label == label)
    }

    /// Iterate over every exercise in day order.
    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.days.iter().flat_map(|d| d.exercises.iter())
    }

    /// Total number of exercises across all days.
    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }
}
