//! The editable workout: a [`Plan`] paired with its [`TrackingState`].
//!
//! Every edit goes through [`Workout`], which applies the plan change and the
//! matching tracking change within the same `&mut self` call. Invalid targets
//! (unknown day, unknown exercise, out-of-range set) are absorbed as no-ops.

use serde::{Deserialize, Serialize};

use crate::routine::{Exercise, ExerciseId, MAX_SETS, Plan};
use crate::tracking::TrackingState;

/// A single-field edit to an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum FieldEdit {
    Name(String),
    /// New set count, clamped to `0..=MAX_SETS`.
    Sets(i64),
    RepRange(String),
}

/// Completed versus total sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// Plan plus tracking, kept consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    plan: Plan,
    tracking: TrackingState,
}

impl Workout {
    /// Wrap `plan` with fresh all-false tracking.
    pub fn new(plan: Plan) -> Self {
        let tracking = TrackingState::for_plan(&plan);
        Self { plan, tracking }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    pub fn into_plan(self) -> Plan {
        self.plan
    }

    /// Replace one field of an exercise in `day`.
    ///
    /// Returns `false` when the day or exercise does not exist.
    pub fn edit_field(&mut self, day: &str, id: ExerciseId, edit: FieldEdit) -> bool {
        let Some(exercise) = self.plan.day_mut(day).and_then(|d| d.exercise_mut(id)) else {
            tracing::debug!(day, exercise_id = %id, "edit target not found");
            return false;
        };

        match edit {
            FieldEdit::Name(name) => exercise.name = name,
            FieldEdit::RepRange(rep_range) => exercise.rep_range = rep_range,
            FieldEdit::Sets(count) => {
                let clamped = count.clamp(0, i64::from(MAX_SETS));
                exercise.sets = u32::try_from(clamped).unwrap_or(MAX_SETS);
                self.tracking
                    .on_set_count_changed(id, i64::from(exercise.sets));
            }
        }
        true
    }

    /// Append a blank exercise to `day` and return its identity.
    pub fn add_exercise(&mut self, day: &str) -> Option<ExerciseId> {
        let Some(target) = self.plan.day_mut(day) else {
            tracing::debug!(day, "add target day not found");
            return None;
        };
        let exercise = Exercise::blank();
        let id = exercise.id();
        let sets = exercise.sets;
        target.exercises.push(exercise);
        self.tracking.on_exercise_added(id, sets);
        Some(id)
    }

    /// Remove an exercise from `day`, keeping the order of the rest.
    ///
    /// Returns `false` if it was not there.
    pub fn delete_exercise(&mut self, day: &str, id: ExerciseId) -> bool {
        let Some(target) = self.plan.day_mut(day) else {
            return false;
        };
        let before = target.exercises.len();
        target.exercises.retain(|ex| ex.id() != id);
        if target.exercises.len() == before {
            tracing::debug!(day, exercise_id = %id, "delete target not found");
            return false;
        }
        self.tracking.on_exercise_removed(id);
        true
    }

    /// Flip the completion flag of one set.
    pub fn toggle_set(&mut self, id: ExerciseId, set_index: usize) -> bool {
        self.tracking.on_set_toggled(id, set_index)
    }

    /// Clear all completion flags.
    pub fn clear_progress(&mut self) {
        self.tracking.reset_to(&self.plan);
    }

    /// Completed sets for one exercise.
    pub fn exercise_progress(&self, id: ExerciseId) -> Progress {
        Progress {
            completed: self.tracking.completed_count(id),
            total: self.tracking.flags(id).map_or(0, <[bool]>::len),
        }
    }

    /// Completed sets across a whole day.
    pub fn day_progress(&self, day: &str) -> Option<Progress> {
        let day = self.plan.day(day)?;
        Some(day.exercises.iter().fold(Progress::default(), |acc, ex| {
            let p = self.exercise_progress(ex.id());
            Progress {
                completed: acc.completed + p.completed,
                total: acc.total + p.total,
            }
        }))
    }
}
