//! Per-user interactive session.
//!
//! A [`WorkoutSession`] owns the current [`Workout`], the snapshot of the last
//! successful generation (for reset), and the [`GenerationGate`] that keeps
//! one request in flight and drops stale responses. A failed generation
//! leaves the current workout as it was.

use crate::export::{DaySheet, ExportError, export_plan};
use crate::generate::error::MSG_EMPTY;
use crate::generate::gate::InFlightGuard;
use crate::generate::{
    GenerateRequest, GenerationGate, GenerationResponse, RequestTicket, RoutineGenerator,
    generate_workout,
};
use crate::routine::{ExerciseId, Plan};
use crate::workout::{FieldEdit, Workout};

/// Shown after a reset.
pub const MSG_RESET: &str = "Tu rutina ha sido restaurada a la versión original generada.";

/// Shown when export is requested with nothing to export.
pub const MSG_NOTHING_TO_EXPORT: &str = "Primero genera una rutina antes de exportarla.";

/// What happened to a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The new workout replaced the current one.
    Applied,
    /// Generation failed; carries the user-facing message.
    Failed(String),
    /// The response belonged to an abandoned request and was dropped.
    Stale,
    /// Another request was already in flight.
    Busy,
}

#[derive(Debug, Default)]
pub struct WorkoutSession {
    current: Option<Workout>,
    snapshot: Option<Plan>,
    gate: GenerationGate,
    last_error: Option<String>,
}

impl WorkoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workout(&self) -> Option<&Workout> {
        self.current.as_ref()
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.current.as_ref().map(Workout::plan)
    }

    /// Message from the most recent failed generation, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.gate.is_busy()
    }

    /// Whether a generation snapshot exists to reset to.
    pub fn can_reset(&self) -> bool {
        self.snapshot.is_some()
    }

    // -------------------------------------------------------------------
    // Generation lifecycle
    // -------------------------------------------------------------------

    /// Start a generation request, or `None` while one is in flight.
    pub fn begin_generation(&mut self) -> Option<RequestTicket> {
        self.gate.begin()
    }

    /// Stop waiting for the in-flight request; its response will be dropped.
    pub fn abandon_generation(&mut self) {
        self.gate.abandon();
    }

    /// Apply the outcome of the request identified by `ticket`.
    ///
    /// Accepts either a `Result` or the `{data, error}` response shape.
    pub fn complete_generation(
        &mut self,
        ticket: RequestTicket,
        response: impl Into<GenerationResponse>,
    ) -> Completion {
        if !self.gate.finish(ticket) {
            return Completion::Stale;
        }
        let GenerationResponse { data, error } = response.into();
        match data {
            Some(workout) => {
                self.install(workout);
                Completion::Applied
            }
            None => {
                let message = error.unwrap_or_else(|| MSG_EMPTY.to_string());
                tracing::warn!(error = %message, "generation failed; keeping current workout");
                self.last_error = Some(message.clone());
                Completion::Failed(message)
            }
        }
    }

    /// Run one full generation round trip against `generator`.
    pub async fn generate(
        &mut self,
        generator: &dyn RoutineGenerator,
        request: &GenerateRequest,
    ) -> Completion {
        let Some(ticket) = self.begin_generation() else {
            return Completion::Busy;
        };
        let guard = InFlightGuard::new(&mut self.gate);
        let result = generate_workout(generator, request).await;
        guard.disarm();
        self.complete_generation(ticket, result)
    }

    /// Install a workout obtained outside the generator (e.g. a saved routine
    /// file), treating it as a fresh generation.
    pub fn load(&mut self, workout: Workout) {
        self.install(workout);
    }

    fn install(&mut self, workout: Workout) {
        self.snapshot = Some(workout.plan().clone());
        self.current = Some(workout);
        self.last_error = None;
    }

    // -------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------

    pub fn edit_field(&mut self, day: &str, id: ExerciseId, edit: FieldEdit) -> bool {
        self.current
            .as_mut()
            .is_some_and(|w| w.edit_field(day, id, edit))
    }

    pub fn add_exercise(&mut self, day: &str) -> Option<ExerciseId> {
        self.current.as_mut()?.add_exercise(day)
    }

    pub fn delete_exercise(&mut self, day: &str, id: ExerciseId) -> bool {
        self.current
            .as_mut()
            .is_some_and(|w| w.delete_exercise(day, id))
    }

    pub fn toggle_set(&mut self, id: ExerciseId, set_index: usize) -> bool {
        self.current
            .as_mut()
            .is_some_and(|w| w.toggle_set(id, set_index))
    }

    /// Restore the last generated plan with cleared progress.
    ///
    /// Returns `false` (and changes nothing) when nothing was generated yet.
    pub fn reset(&mut self) -> bool {
        let Some(snapshot) = &self.snapshot else {
            return false;
        };
        self.current = Some(Workout::new(snapshot.clone()));
        tracing::info!("workout reset to generated snapshot");
        true
    }

    /// Project the current plan for export.
    pub fn export(&self) -> Result<Vec<DaySheet>, ExportError> {
        match self.plan() {
            Some(plan) => export_plan(plan),
            None => Err(ExportError::EmptyPlan),
        }
    }
}
