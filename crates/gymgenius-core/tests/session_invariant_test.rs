//! Integration tests for the workout session: plan/tracking consistency across
//! edit sequences, reset behavior, and generation failure handling.

use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;

use gymgenius_core::generate::{
    Equipment, FitnessGoal, GenerateRequest, GeneratedRoutine, RoutineGenerator,
};
use gymgenius_core::routine::{ExerciseId, build_plan_from_text};
use gymgenius_core::{Completion, FieldEdit, WorkoutSession};

const ROUTINE: &str = r#"{
    "Lunes": [
        {"ejercicio": "Sentadilla", "series": 4, "repeticiones": "6-8"},
        {"exercise": "Leg press", "sets": 3, "rep_range": "10-12"}
    ],
    "Miércoles": [
        {"ejercicio": "Press banca", "series": "5", "repeticiones": "5"},
        {"ejercicio": "Remo con barra"}
    ],
    "Viernes": [
        {"ejercicio": "Peso muerto", "series": 3, "repeticiones": "3-5"}
    ]
}"#;

// -----------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------

/// Small deterministic xorshift generator so the edit sequence is reproducible.
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

fn loaded_session() -> WorkoutSession {
    let mut session = WorkoutSession::new();
    session.load(build_plan_from_text(ROUTINE).expect("fixture routine parses"));
    session
}

fn assert_consistent(session: &WorkoutSession) {
    let workout = session.workout().expect("session has a workout");
    let plan = workout.plan();
    let tracking = workout.tracking();

    for ex in plan.exercises() {
        let flags = tracking
            .flags(ex.id())
            .unwrap_or_else(|| panic!("no tracking for {}", ex.id()));
        assert_eq!(flags.len(), ex.sets as usize, "length mismatch for {}", ex.name);
    }
    assert_eq!(tracking.len(), plan.exercise_count(), "stale tracking entries");
    tracking
        .check_consistency(plan)
        .unwrap_or_else(|e| panic!("inconsistent: {e}"));
}

fn pick_exercise(session: &WorkoutSession, rng: &mut Xorshift) -> Option<(String, ExerciseId)> {
    let plan = session.plan()?;
    let day = &plan.days()[rng.below(plan.days().len())];
    if day.exercises.is_empty() {
        return None;
    }
    let ex = &day.exercises[rng.below(day.exercises.len())];
    Some((day.label.clone(), ex.id()))
}

// -----------------------------------------------------------------------
// Invariant preservation
// -----------------------------------------------------------------------

#[test]
fn invariant_holds_after_every_operation() {
    let mut session = loaded_session();
    let mut rng = Xorshift(0x5eed_1234_abcd_0001);
    let labels: Vec<String> = session
        .plan()
        .unwrap()
        .days()
        .iter()
        .map(|d| d.label.clone())
        .collect();

    assert_consistent(&session);
    for _ in 0..500 {
        match rng.below(6) {
            0 => {
                let day = &labels[rng.below(labels.len())];
                session.add_exercise(day);
            }
            1 => {
                if let Some((day, id)) = pick_exercise(&session, &mut rng) {
                    session.delete_exercise(&day, id);
                }
            }
            2 => {
                if let Some((day, id)) = pick_exercise(&session, &mut rng) {
                    let count = rng.below(10) as i64 - 2;
                    session.edit_field(&day, id, FieldEdit::Sets(count));
                }
            }
            3 => {
                if let Some((_, id)) = pick_exercise(&session, &mut rng) {
                    session.toggle_set(id, rng.below(8));
                }
            }
            4 => {
                if let Some((day, id)) = pick_exercise(&session, &mut rng) {
                    session.edit_field(&day, id, FieldEdit::Name("Cambio".into()));
                }
            }
            _ => {
                if rng.below(10) == 0 {
                    session.reset();
                }
            }
        }
        assert_consistent(&session);
    }
}

#[test]
fn deleting_twice_equals_deleting_once() {
    let mut session = loaded_session();
    let id = session.plan().unwrap().days()[0].exercises[0].id();

    assert!(session.delete_exercise("Lunes", id));
    let once = session.workout().cloned();
    assert!(!session.delete_exercise("Lunes", id));
    assert_eq!(session.workout().cloned(), once);
    assert_consistent(&session);
}

#[test]
fn resizing_preserves_prefix() {
    let mut session = loaded_session();
    let id = session.plan().unwrap().days()[0].exercises[0].id();
    session.toggle_set(id, 0);
    session.toggle_set(id, 2);

    session.edit_field("Lunes", id, FieldEdit::Sets(7));
    let flags = session.workout().unwrap().tracking().flags(id).unwrap().to_vec();
    assert_eq!(flags, vec![true, false, true, false, false, false, false]);

    session.edit_field("Lunes", id, FieldEdit::Sets(3));
    let flags = session.workout().unwrap().tracking().flags(id).unwrap().to_vec();
    assert_eq!(flags, vec![true, false, true]);
}

// -----------------------------------------------------------------------
// Reset
// -----------------------------------------------------------------------

#[test]
fn reset_restores_generated_snapshot() {
    let mut session = loaded_session();
    let original = session.plan().unwrap().clone();

    let lunes = original.days()[0].exercises[0].id();
    session.toggle_set(lunes, 1);
    session.edit_field("Lunes", lunes, FieldEdit::RepRange("12-15".into()));
    let added = session.add_exercise("Viernes").unwrap();
    let viernes = original.day("Viernes").unwrap().exercises[0].id();
    session.delete_exercise("Viernes", viernes);

    assert!(session.reset());
    let workout = session.workout().unwrap();
    assert_eq!(workout.plan(), &original);
    for ex in workout.plan().exercises() {
        let flags = workout.tracking().flags(ex.id()).unwrap();
        assert_eq!(flags.len(), ex.sets as usize);
        assert!(flags.iter().all(|f| !f));
    }
    assert!(workout.tracking().flags(added).is_none());
    assert_consistent(&session);
}

// -----------------------------------------------------------------------
// Generation
// -----------------------------------------------------------------------

struct ScriptedGenerator {
    output: Result<&'static str, &'static str>,
}

#[async_trait]
impl RoutineGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, _request: &GenerateRequest) -> Result<GeneratedRoutine> {
        match self.output {
            Ok(text) => Ok(GeneratedRoutine {
                routine: text.to_string(),
            }),
            Err(message) => bail!("{message}"),
        }
    }
}

fn request() -> GenerateRequest {
    GenerateRequest::new(FitnessGoal::Strength, &Equipment::Listed("barra, discos".into()))
}

#[tokio::test]
async fn malformed_generation_leaves_session_untouched() {
    let mut session = loaded_session();
    let before = session.workout().cloned();

    let generator = ScriptedGenerator {
        output: Ok("{not valid json"),
    };
    let completion = session.generate(&generator, &request()).await;

    assert!(matches!(completion, Completion::Failed(_)));
    assert_eq!(session.workout().cloned(), before);
    assert!(!session.is_generating());
}

#[tokio::test]
async fn first_failed_generation_leaves_session_empty() {
    let mut session = WorkoutSession::new();
    let generator = ScriptedGenerator {
        output: Err("billing account disabled"),
    };
    let completion = session.generate(&generator, &request()).await;

    assert_eq!(
        completion,
        Completion::Failed(
            gymgenius_core::generate::error::MSG_CREDENTIALS.to_string()
        )
    );
    assert!(session.workout().is_none());
    assert!(!session.can_reset());
}

#[tokio::test]
async fn successful_generation_builds_tracked_plan() {
    let mut session = WorkoutSession::new();
    let generator = ScriptedGenerator {
        output: Ok(r#"{"Lunes":[{"ejercicio":"Sentadilla","series":4,"repeticiones":"6-8"}]}"#),
    };
    assert_eq!(session.generate(&generator, &request()).await, Completion::Applied);

    let workout = session.workout().unwrap();
    let ex = &workout.plan().day("Lunes").unwrap().exercises[0];
    assert_eq!(ex.name, "Sentadilla");
    assert_eq!(ex.sets, 4);
    assert_eq!(ex.rep_range, "6-8");
    assert_eq!(
        workout.tracking().flags(ex.id()),
        Some(&[false, false, false, false][..])
    );
    assert!(session.can_reset());
}

#[tokio::test]
async fn generate_while_busy_is_refused() {
    let mut session = WorkoutSession::new();
    let _ticket = session.begin_generation().unwrap();
    let generator = ScriptedGenerator { output: Ok("{}") };
    assert_eq!(session.generate(&generator, &request()).await, Completion::Busy);
}

/// Never answers within the test's patience.
struct StalledGenerator;

#[async_trait]
impl RoutineGenerator for StalledGenerator {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn generate(&self, _request: &GenerateRequest) -> Result<GeneratedRoutine> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        bail!("stalled generator woke up")
    }
}

#[tokio::test]
async fn dropped_generation_frees_the_session() {
    let mut session = loaded_session();
    let before = session.workout().cloned();

    let timed_out = tokio::time::timeout(
        Duration::from_millis(50),
        session.generate(&StalledGenerator, &request()),
    )
    .await;
    assert!(timed_out.is_err(), "stalled generation should not finish");
    assert!(!session.is_generating());
    assert_eq!(session.workout().cloned(), before);

    let generator = ScriptedGenerator {
        output: Ok(r#"{"Martes":[{"ejercicio":"Remo"}]}"#),
    };
    assert_eq!(session.generate(&generator, &request()).await, Completion::Applied);
    assert_eq!(session.plan().unwrap().days()[0].label, "Martes");
}

// -----------------------------------------------------------------------
// Export
// -----------------------------------------------------------------------

#[test]
fn export_follows_edits() {
    let mut session = loaded_session();
    let id = session.plan().unwrap().days()[0].exercises[0].id();
    session.edit_field("Lunes", id, FieldEdit::Sets(6));

    let sheets = session.export().unwrap();
    let names: Vec<&str> = sheets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Lunes", "Mircoles", "Viernes"]);
    assert_eq!(sheets[0].rows[0].sets, 6);
    assert_eq!(sheets[1].rows[0].sets, 5);
}
