//! The service-level error taxonomy.

use thiserror::Error;

use crate::completion::CompletionError;

/// Failure kinds of the plan generation pipeline.
///
/// Every failure is scoped to the single request; none is fatal to the
/// process. The HTTP boundary maps `InvalidRequest` to 400 and the other two
/// to 500.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Client input failed validation. Neither the completion client nor the
    /// store was invoked.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The completion service was unreachable, errored, or returned no
    /// extractable text. Nothing was persisted.
    #[error("plan generation failed")]
    GenerationFailed(#[source] CompletionError),

    /// Generation succeeded but the write did not commit. The generated text
    /// exists only in memory at this point and is not durable.
    #[error("plan store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),
}
