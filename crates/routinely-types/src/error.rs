use thiserror::Error;

/// Errors from loading the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Errors from durable key-value storage (used by trait definitions in routinely-core).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from a chat session operation.
///
/// `Remote` and `MalformedResponse` together form the remote-failure
/// category: the transcript is left intact and the user retries by
/// re-invoking the same action.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("no products selected")]
    EmptySelection,

    #[error("message is empty")]
    EmptyInput,

    #[error("remote error: {0}")]
    Remote(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request timed out after {timeout_ms}ms")]
    RequestTimeout { timeout_ms: u64 },
}

impl ChatError {
    /// Status text shown in the chat window in place of an assistant reply.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::EmptySelection => "Please select at least one product.",
            ChatError::EmptyInput => "Please type a question first.",
            ChatError::Remote(_) => "Error connecting to AI service.",
            ChatError::MalformedResponse(_) => "Sorry, no response from AI.",
            ChatError::RequestTimeout { .. } => "The AI service took too long to respond. Please try again.",
        }
    }

    /// Whether the failure happened before any network call was attempted.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, ChatError::EmptySelection | ChatError::EmptyInput)
    }
}
