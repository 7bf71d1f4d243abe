//! Completion client error types.

use thiserror::Error;

/// Errors from the external completion service.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure, including the client-side timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("completion API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The response parsed but every candidate text field was empty or
    /// absent. Treated as a failure, not a silent empty result.
    #[error("no plan text in completion response")]
    NoText,
}
