//! The completion client -- the adapter interface for external text
//! generation services.
//!
//! [`CompletionClient`] is the seam the service orchestrates through; the
//! production implementation is [`HttpCompletionClient`], which speaks the
//! chat-completions wire shape over HTTP. Tests substitute stub
//! implementations.

mod error;
mod http;
pub mod prompt;
mod types;

pub use error::CompletionError;
pub use http::{CompletionConfig, HttpCompletionClient};
pub use types::{ChatChoice, ChatCompletionResponse, ChatMessage, extract_plan_text};

use async_trait::async_trait;

/// Adapter interface for turning a `(business_name, industry)` pair into
/// natural-language plan text.
///
/// # Object Safety
///
/// This trait is object-safe so it can be stored as
/// `Arc<dyn CompletionClient>` inside [`crate::PlanService`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate plan text for the given pair.
    ///
    /// Both inputs are already trimmed and non-empty when called through the
    /// service. On success the returned string is non-empty; a response from
    /// which no text can be extracted is an error, never an empty success.
    async fn generate(
        &self,
        business_name: &str,
        industry: &str,
    ) -> Result<String, CompletionError>;
}

// Compile-time assertion: CompletionClient must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn CompletionClient) {}
};
