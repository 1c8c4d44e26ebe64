//! Core of GymGenius: turns model-generated routine text into a typed,
//! editable workout plan and keeps per-set completion tracking in sync with it.

pub mod export;
pub mod generate;
pub mod routine;
pub mod session;
pub mod tracking;
pub mod workout;

pub use session::{Completion, WorkoutSession};
pub use workout::{FieldEdit, Progress, Workout};
