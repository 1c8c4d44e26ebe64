//! Set-completion tracking.
//!
//! [`TrackingState`] is a side index of per-set completion flags keyed by
//! [`ExerciseId`]. It must mirror the plan it tracks:
//!
//! - every exercise in the plan has an entry whose length equals its `sets`;
//! - no entry exists for an exercise that is not in the plan.
//!
//! The mutating hooks are crate-private. Outside callers change tracking only
//! through [`crate::workout::Workout`], which updates the plan and the index
//! in the same call.

use std::collections::HashMap;

use thiserror::Error;

use crate::routine::{ExerciseId, Plan};

/// A violation of the plan/tracking correspondence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingMismatch {
    #[error("exercise {id} has no tracking entry")]
    Missing { id: ExerciseId },

    #[error("exercise {id} has {actual} tracked sets, expected {expected}")]
    LengthMismatch {
        id: ExerciseId,
        expected: usize,
        actual: usize,
    },

    #[error("tracking entry {id} does not belong to any exercise in the plan")]
    Stale { id: ExerciseId },
}

/// Completion flags for every exercise in a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingState {
    flags: HashMap<ExerciseId, Vec<bool>>,
}

impl TrackingState {
    /// Derive an all-false state matching `plan`.
    pub fn for_plan(plan: &Plan) -> Self {
        let flags = plan
            .exercises()
            .map(|ex| (ex.id(), vec![false; ex.sets as usize]))
            .collect();
        Self { flags }
    }

    /// Flags for one exercise, if tracked.
    pub fn flags(&self, id: ExerciseId) -> Option<&[bool]> {
        self.flags.get(&id).map(Vec::as_slice)
    }

    /// Number of completed sets for one exercise (0 if untracked).
    pub fn completed_count(&self, id: ExerciseId) -> usize {
        self.flags
            .get(&id)
            .map_or(0, |f| f.iter().filter(|done| **done).count())
    }

    /// Number of tracked exercises.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Verify that this state mirrors `plan` exactly.
    pub fn check_consistency(&self, plan: &Plan) -> Result<(), TrackingMismatch> {
        for ex in plan.exercises() {
            let Some(flags) = self.flags.get(&ex.id()) else {
                return Err(TrackingMismatch::Missing { id: ex.id() });
            };
            if flags.len() != ex.sets as usize {
                return Err(TrackingMismatch::LengthMismatch {
                    id: ex.id(),
                    expected: ex.sets as usize,
                    actual: flags.len(),
                });
            }
        }
        if self.flags.len() != plan.exercise_count() {
            let stale = self
                .flags
                .keys()
                .find(|id| !plan.exercises().any(|ex| ex.id() == **id));
            if let Some(id) = stale {
                return Err(TrackingMismatch::Stale { id: *id });
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Synchronization hooks
    // -------------------------------------------------------------------

    pub(crate) fn on_exercise_added(&mut self, id: ExerciseId, sets: u32) {
        self.flags.insert(id, vec![false; sets as usize]);
    }

    pub(crate) fn on_exercise_removed(&mut self, id: ExerciseId) {
        self.flags.remove(&id);
    }

    /// Resize to `new_count` (clamped at zero). Growing appends `false`,
    /// shrinking drops flags from the tail.
    pub(crate) fn on_set_count_changed(&mut self, id: ExerciseId, new_count: i64) {
        let Some(flags) = self.flags.get_mut(&id) else {
            tracing::debug!(exercise_id = %id, "ignoring resize of untracked exercise");
            return;
        };
        let new_len = usize::try_from(new_count.max(0)).unwrap_or(usize::MAX);
        flags.resize(new_len, false);
    }

    /// Flip one flag. Unknown ids and out-of-range indices are ignored.
    pub(crate) fn on_set_toggled(&mut self, id: ExerciseId, set_index: usize) -> bool {
        match self.flags.get_mut(&id).and_then(|f| f.get_mut(set_index)) {
            Some(flag) => {
                *flag = !*flag;
                true
            }
            None => {
                tracing::debug!(exercise_id = %id, set_index, "ignoring toggle outside tracked sets");
                false
            }
        }
    }

    pub(crate) fn reset_to(&mut self, plan: &Plan) {
        *self = Self::for_plan(plan);
    }
}
