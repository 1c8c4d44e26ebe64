//! Command-line routine generator.
//!
//! Runs an external model CLI (by default `claude -p --output-format json`)
//! with the trainer prompt as its last argument and returns what it printed.
//! Stdout may be the routine text itself or a JSON result envelope
//! (`{"type": "result", "result": "...", "is_error": false}`).

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use gymgenius_core::generate::{GenerateRequest, GeneratedRoutine, RoutineGenerator};

use crate::config::GeneratorSection;

/// Generator adapter that shells out to a model CLI.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(section: &GeneratorSection) -> Self {
        Self {
            command: section.command.clone(),
            args: section.args.clone(),
        }
    }
}

#[async_trait]
impl RoutineGenerator for CommandGenerator {
    fn name(&self) -> &str {
        &self.command
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedRoutine> {
        let prompt = build_prompt(request);

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(&prompt)
            .stdin(std::process::Stdio::null())
            // Cancelling the request drops this future; take the child down with it.
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| {
                format!(
                    "failed to run generator '{}' -- is it installed and on PATH?",
                    self.command
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "generator '{}' exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(output.stdout).context("generator output is not UTF-8")?;
        debug!(bytes = stdout.len(), "generator finished");
        extract_routine(&stdout)
    }
}

// ---------------------------------------------------------------------------
// Output handling
// ---------------------------------------------------------------------------

/// Unwrap a JSON result envelope if present, otherwise return stdout as is.
fn extract_routine(stdout: &str) -> Result<GeneratedRoutine> {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(stdout) {
        if v.get("type").and_then(|t| t.as_str()) == Some("result") {
            let result = v.get("result").and_then(|r| r.as_str()).unwrap_or("");
            if v.get("is_error").and_then(|e| e.as_bool()).unwrap_or(false) {
                bail!("generator reported an error: {result}");
            }
            return Ok(GeneratedRoutine {
                routine: result.to_string(),
            });
        }
    }
    Ok(GeneratedRoutine {
        routine: stdout.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Build the trainer prompt for one request.
pub fn build_prompt(request: &GenerateRequest) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(
        "You are a personal trainer who designs workout routines. \
         Build a routine for the user's goal and equipment. \
         The user speaks Spanish, so write everything in Spanish.\n\n",
    );

    prompt.push_str(&format!("Fitness goal: {}\n", request.fitness_goal));
    prompt.push_str(&format!("Equipment: {}\n", request.available_equipment));
    if let Some(history) = &request.workout_history {
        prompt.push_str(&format!("Workout history: {history}\n"));
    }
    prompt.push('\n');

    prompt.push_str(
        "Reply with the routine only, as a single JSON object.\n\
         Keys are days of the week in Spanish (Lunes, Martes, Miércoles, ...).\n\
         Each value is an array of exercise objects with the fields \
         \"exercise\", \"sets\" and \"rep_range\", written in Spanish.\n\
         Vary the routine; do not give everyone the same plan.\n\
         Spread the exercises over 3 to 5 days, as suits the goal.\n",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use gymgenius_core::generate::{Equipment, FitnessGoal};

    #[test]
    fn prompt_includes_request_fields() {
        let request = GenerateRequest::new(
            FitnessGoal::Endurance,
            &Equipment::Listed("kettlebell".into()),
        )
        .with_history("corro 3 veces por semana");
        let prompt = build_prompt(&request);

        assert!(prompt.contains("Fitness goal: endurance"));
        assert!(prompt.contains("Equipment: kettlebell"));
        assert!(prompt.contains("Workout history: corro 3 veces por semana"));
        assert!(prompt.contains("\"exercise\", \"sets\" and \"rep_range\""));
    }

    #[test]
    fn prompt_omits_missing_history() {
        let request = GenerateRequest::new(FitnessGoal::Strength, &Equipment::FullGym);
        assert!(!build_prompt(&request).contains("Workout history"));
    }

    #[test]
    fn raw_stdout_passes_through() {
        let out = extract_routine(r#"{"Lunes": []}"#).unwrap();
        assert_eq!(out.routine, r#"{"Lunes": []}"#);
    }

    #[test]
    fn non_json_stdout_passes_through() {
        let out = extract_routine("lo siento, no puedo").unwrap();
        assert_eq!(out.routine, "lo siento, no puedo");
    }

    #[test]
    fn result_envelope_is_unwrapped() {
        let stdout = r#"{"type":"result","is_error":false,"result":"{\"Lunes\": []}"}"#;
        let out = extract_routine(stdout).unwrap();
        assert_eq!(out.routine, r#"{"Lunes": []}"#);
    }

    #[test]
    fn error_envelope_fails() {
        let stdout = r#"{"type":"result","is_error":true,"result":"Invalid API key"}"#;
        let err = extract_routine(stdout).unwrap_err();
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn runs_command_and_captures_stdout() {
        let generator = CommandGenerator::new(&GeneratorSection {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "printf '{\"Lunes\": []}'".to_string()],
        });
        let request = GenerateRequest::new(FitnessGoal::Strength, &Equipment::FullGym);
        let out = generator.generate(&request).await.unwrap();
        assert_eq!(out.routine, r#"{"Lunes": []}"#);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn nonzero_exit_is_an_error() {
        let generator = CommandGenerator::new(&GeneratorSection {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), "echo 'api key missing' >&2; exit 3".to_string()],
        });
        let request = GenerateRequest::new(FitnessGoal::Strength, &Equipment::FullGym);
        let err = generator.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("api key missing"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn abandoned_request_kills_the_child() {
        let tmp = tempfile::TempDir::new().unwrap();
        let marker = tmp.path().join("finished");
        let generator = CommandGenerator::new(&GeneratorSection {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                format!("sleep 1; touch '{}'", marker.display()),
            ],
        });
        let request = GenerateRequest::new(FitnessGoal::Strength, &Equipment::FullGym);

        let abandoned =
            tokio::time::timeout(Duration::from_millis(100), generator.generate(&request)).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!marker.exists(), "child kept running after the request was dropped");
    }

    #[tokio::test]
    async fn missing_binary_is_an_error() {
        let generator = CommandGenerator::new(&GeneratorSection {
            command: "gymgenius-no-such-binary".to_string(),
            args: vec![],
        });
        let request = GenerateRequest::new(FitnessGoal::Strength, &Equipment::FullGym);
        let err = generator.generate(&request).await.unwrap_err();
        assert!(err.to_string().contains("failed to run generator"));
    }
}
