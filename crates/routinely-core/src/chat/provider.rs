//! ChatProvider trait definition.

use routinely_types::chat::{ChatCompletionResponse, ChatRequest};
use routinely_types::error::ChatError;

/// Trait for chat-completion backends.
///
/// Implementations return transport failures (connection errors, non-2xx
/// statuses) as [`ChatError::Remote`] and bodies that are not JSON as
/// [`ChatError::MalformedResponse`]. Shape validation of a parsed body is
/// left to the session.
///
/// The HTTP implementation lives in routinely-infra.
pub trait ChatProvider: Send + Sync {
    /// Human-readable provider name for logs.
    fn name(&self) -> &str;

    /// Send the full transcript and return the parsed response body.
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl std::future::Future<Output = Result<ChatCompletionResponse, ChatError>> + Send;
}
