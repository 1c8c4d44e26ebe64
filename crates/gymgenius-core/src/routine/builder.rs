//! Plan construction from parsed routine records.

use super::model::{Day, ExerciseId, Plan};
use super::normalize::normalize_exercise;
use super::parser::{RawRoutine, RoutineParseError, parse_routine};
use crate::workout::Workout;

/// Normalize every record of `routine` into a [`Workout`] with fresh
/// identities and all-false tracking.
///
/// Day order and per-day exercise order follow the source.
pub fn build_plan(routine: RawRoutine) -> Workout {
    let days = routine
        .days
        .into_iter()
        .map(|raw| {
            let mut day = Day::new(raw.label);
            day.exercises = raw
                .records
                .iter()
                .map(|record| normalize_exercise(record, ExerciseId::new()))
                .collect();
            day
        })
        .collect();

    let plan = Plan::from_days(days);
    tracing::debug!(
        days = plan.days().len(),
        exercises = plan.exercise_count(),
        "built plan from routine"
    );
    Workout::new(plan)
}

/// Parse routine text and build a [`Workout`] from it.
pub fn build_plan_from_text(text: &str) -> Result<Workout, RoutineParseError> {
    parse_routine(text).map(build_plan)
}
