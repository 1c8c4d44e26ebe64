//! Routine generation boundary.
//!
//! The generation service is external and untrusted. This module defines its
//! interface ([`RoutineGenerator`]), the request/response types, the error
//! taxonomy, the single-flight [`GenerationGate`], and the ingestion step
//! that turns returned text into a [`Workout`].
//!
//! ```text
//! GenerateRequest --RoutineGenerator::generate--> GeneratedRoutine
//!                                                      |
//!                                       ingest_routine (parse + build)
//!                                                      |
//!                               Result<Workout, GenerationError>
//!                                                      |
//!                                   GenerationResponse { data, error }
//! ```

pub mod error;
pub mod gate;
pub mod request;
pub mod trait_def;

pub use error::{GenerationError, TransportKind};
pub use gate::{GenerationGate, RequestTicket};
pub use request::{Equipment, FitnessGoal, GenerateRequest, GeneratedRoutine};
pub use trait_def::RoutineGenerator;

use crate::routine::build_plan_from_text;
use crate::workout::Workout;

/// Turn generator output into a workout.
pub fn ingest_routine(output: &GeneratedRoutine) -> Result<Workout, GenerationError> {
    if output.routine.trim().is_empty() {
        return Err(GenerationError::EmptyRoutine);
    }
    match build_plan_from_text(&output.routine) {
        Ok(workout) => Ok(workout),
        Err(err) => {
            tracing::error!(error = %err, raw = err.raw(), "generated routine failed to parse");
            Err(err.into())
        }
    }
}

/// Request a routine from `generator` and ingest it.
pub async fn generate_workout(
    generator: &dyn RoutineGenerator,
    request: &GenerateRequest,
) -> Result<Workout, GenerationError> {
    tracing::info!(
        generator = generator.name(),
        goal = %request.fitness_goal,
        "requesting routine"
    );
    let output = generator.generate(request).await.map_err(|err| {
        tracing::error!(generator = generator.name(), error = %err, "routine generation failed");
        GenerationError::from(err)
    })?;
    ingest_routine(&output)
}

/// The `{data, error}` shape handed to the UI. Exactly one side is set.
#[derive(Debug)]
pub struct GenerationResponse {
    pub data: Option<Workout>,
    pub error: Option<String>,
}

impl From<Result<Workout, GenerationError>> for GenerationResponse {
    fn from(result: Result<Workout, GenerationError>) -> Self {
        match result {
            Ok(workout) => Self {
                data: Some(workout),
                error: None,
            },
            Err(err) => Self {
                data: None,
                error: Some(err.user_message()),
            },
        }
    }
}
