//! Input and output types for the routine generation service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Description used when the user trains in a fully equipped gym.
pub const FULL_GYM_DESCRIPTION: &str = "Acceso a un gimnasio comercial completo con todo el equipo estándar (barras, mancuernas, máquinas, cables, etc.)";

/// Training goal selected by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    Strength,
    #[default]
    Hypertrophy,
    Endurance,
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Strength => "strength",
            Self::Hypertrophy => "hypertrophy",
            Self::Endurance => "endurance",
        };
        f.write_str(s)
    }
}

impl FromStr for FitnessGoal {
    type Err = FitnessGoalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strength" => Ok(Self::Strength),
            "hypertrophy" => Ok(Self::Hypertrophy),
            "endurance" => Ok(Self::Endurance),
            other => Err(FitnessGoalParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`FitnessGoal`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid fitness goal: {0:?} (expected strength, hypertrophy, or endurance)")]
pub struct FitnessGoalParseError(pub String);

/// What the user can train with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Equipment {
    /// A complete commercial gym.
    #[default]
    FullGym,
    /// A user-provided list of equipment.
    Listed(String),
}

impl Equipment {
    /// The text handed to the generation service.
    pub fn describe(&self) -> &str {
        match self {
            Self::FullGym => FULL_GYM_DESCRIPTION,
            Self::Listed(text) => text,
        }
    }
}

/// One request to the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub fitness_goal: FitnessGoal,
    /// Free-text description of available equipment.
    pub available_equipment: String,
    /// Optional summary of the user's training history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout_history: Option<String>,
}

impl GenerateRequest {
    pub fn new(fitness_goal: FitnessGoal, equipment: &Equipment) -> Self {
        Self {
            fitness_goal,
            available_equipment: equipment.describe().to_string(),
            workout_history: None,
        }
    }

    /// Attach a training history; blank text is ignored.
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        let history = history.into();
        self.workout_history = (!history.trim().is_empty()).then_some(history);
        self
    }
}

/// Raw output of the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedRoutine {
    /// Text expected to hold the day-keyed routine object.
    pub routine: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_roundtrips_through_strings() {
        for goal in [FitnessGoal::Strength, FitnessGoal::Hypertrophy, FitnessGoal::Endurance] {
            assert_eq!(goal.to_string().parse::<FitnessGoal>().unwrap(), goal);
        }
        assert!("cardio".parse::<FitnessGoal>().is_err());
    }

    #[test]
    fn full_gym_expands_to_description() {
        let req = GenerateRequest::new(FitnessGoal::Strength, &Equipment::FullGym);
        assert_eq!(req.available_equipment, FULL_GYM_DESCRIPTION);
    }

    #[test]
    fn listed_equipment_passes_through() {
        let req = GenerateRequest::new(
            FitnessGoal::Endurance,
            &Equipment::Listed("mancuernas, banda elástica".into()),
        );
        assert_eq!(req.available_equipment, "mancuernas, banda elástica");
    }

    #[test]
    fn blank_history_is_dropped() {
        let req = GenerateRequest::new(FitnessGoal::default(), &Equipment::default()).with_history("  ");
        assert_eq!(req.workout_history, None);
        let req = req.with_history("2 años entrenando");
        assert_eq!(req.workout_history.as_deref(), Some("2 años entrenando"));
    }
}
