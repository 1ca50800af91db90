//! Chat window rendering.

use routinely_types::chat::{ChatState, Message, MessageRole};
use serde::{Deserialize, Serialize};

/// Status line shown while a request is outstanding.
pub const AWAITING_MESSAGE: &str = "Generating your personalized routine...";

/// One visible message in the chat window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBubble {
    pub role: MessageRole,
    pub content: String,
}

/// Visible part of the transcript.
///
/// The system instruction and the seed prompt listing the selected products
/// are not shown; the window starts at the first assistant reply.
pub fn render_transcript(transcript: &[Message]) -> Vec<ChatBubble> {
    let skip = match transcript {
        [first, second, ..]
            if first.role == MessageRole::System && second.role == MessageRole::User =>
        {
            2
        }
        [first, ..] if first.role == MessageRole::System => 1,
        _ => 0,
    };

    transcript
        .iter()
        .skip(skip)
        .map(|m| ChatBubble {
            role: m.role,
            content: m.content.clone(),
        })
        .collect()
}

/// Status text for the chat window, if any.
pub fn render_chat_status(state: ChatState, last_error: Option<&str>) -> Option<String> {
    match state {
        ChatState::Idle => None,
        ChatState::AwaitingResponse => Some(AWAITING_MESSAGE.to_string()),
        ChatState::Error => last_error.map(str::to_string),
    }
}
