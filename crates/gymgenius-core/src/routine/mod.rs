//! Routine ingestion: parsing model output, normalizing records, building plans.

pub mod builder;
pub mod model;
pub mod normalize;
pub mod parser;

pub use builder::{build_plan, build_plan_from_text};
pub use model::{
    DEFAULT_EXERCISE_NAME, DEFAULT_REP_RANGE, DEFAULT_SETS, Day, Exercise, ExerciseId, MAX_SETS,
    Plan,
};
pub use normalize::normalize_exercise;
pub use parser::{RawDay, RawRoutine, RoutineParseError, parse_routine};
