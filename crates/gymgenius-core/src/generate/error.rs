//! Failures at the generation boundary and their user-facing messages.

use thiserror::Error;

use crate::routine::RoutineParseError;

/// Shown when generation output could not be parsed.
pub const MSG_MALFORMED: &str =
    "La IA devolvió un formato de respuesta no válido. Por favor, inténtalo de nuevo.";

/// Shown when generation produced no routine text.
pub const MSG_EMPTY: &str = "No se pudo generar la rutina. El resultado de la IA estaba vacío.";

/// Shown for credential or billing failures of the generation service.
pub const MSG_CREDENTIALS: &str = "Error de configuración del servicio de IA. Comprueba tu clave de API y el estado de facturación.";

/// Substrings (lowercase) that mark a transport failure as a credential problem.
const CREDENTIAL_MARKERS: &[&str] = &["billing", "api key"];

/// Broad category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Authentication or billing rejected by the service.
    Credentials,
    Other,
}

impl TransportKind {
    /// Classify a failure from its message text.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if CREDENTIAL_MARKERS.iter().any(|m| lower.contains(m)) {
            Self::Credentials
        } else {
            Self::Other
        }
    }
}

/// Errors from requesting and ingesting a generated routine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generated routine could not be parsed: {0}")]
    MalformedRoutine(#[from] RoutineParseError),

    #[error("generation returned an empty routine")]
    EmptyRoutine,

    #[error("generation service failed: {message}")]
    Transport {
        message: String,
        kind: TransportKind,
    },
}

impl GenerationError {
    /// Build a transport error, classifying it from `message`.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = TransportKind::classify(&message);
        Self::Transport { message, kind }
    }

    /// Localized text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::MalformedRoutine(_) => MSG_MALFORMED.to_string(),
            Self::EmptyRoutine => MSG_EMPTY.to_string(),
            Self::Transport {
                kind: TransportKind::Credentials,
                ..
            } => MSG_CREDENTIALS.to_string(),
            Self::Transport { message, .. } => {
                format!("Ocurrió un error al generar la rutina: {message}")
            }
        }
    }
}

impl From<anyhow::Error> for GenerationError {
    fn from(err: anyhow::Error) -> Self {
        Self::transport(format!("{err:#}"))
    }
}
