//! The `RoutineGenerator` trait: the adapter interface for generation services.
//!
//! The trait is object-safe so a session can hold a `Box<dyn RoutineGenerator>`
//! without knowing which backend produces the text.

use anyhow::Result;
use async_trait::async_trait;

use super::request::{GenerateRequest, GeneratedRoutine};

/// A service that turns a [`GenerateRequest`] into routine text.
///
/// Implementations return whatever text the service produced. They must not
/// parse or validate it; the output is untrusted and is handled by
/// [`super::ingest_routine`].
#[async_trait]
pub trait RoutineGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "claude-cli").
    fn name(&self) -> &str;

    /// Request one routine. Errors are transport failures.
    async fn generate(&self, request: &GenerateRequest) -> Result<GeneratedRoutine>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn RoutineGenerator) {}
};
