//! Chat HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/routine  - Start a routine from the current selection
//! - POST /api/v1/chat     - Ask a follow-up question
//! - GET  /api/v1/chat     - Current transcript and status
//!
//! The session is single-flight: while a request is outstanding, another
//! POST fails with `409 REQUEST_IN_FLIGHT` instead of waiting.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use routinely_core::view::{render_chat_status, render_transcript, ChatBubble, AWAITING_MESSAGE};
use routinely_types::chat::ChatState;

use crate::http::error::AppError;
use crate::http::extract::AppJson;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::{AppState, ConcreteChatSession};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub message: String,
}

/// The chat window as rendered for the client.
#[derive(Debug, Serialize)]
pub struct ChatView {
    pub state: ChatState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub transcript: Vec<ChatBubble>,
}

impl ChatView {
    fn from_session(session: &ConcreteChatSession) -> Self {
        Self {
            state: session.state(),
            status: render_chat_status(session.state(), session.last_error()),
            transcript: render_transcript(session.transcript()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReplyPayload {
    pub reply: String,
    pub chat: ChatView,
}

/// POST /api/v1/routine
pub async fn start_routine(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReplyPayload>>, AppError> {
    let clock = RequestClock::start();
    let mut session = state.chat.try_lock().map_err(|_| AppError::RequestInFlight)?;
    let products = state.selection.lock().await.selection().items().to_vec();

    let outcome = session.start_routine(&products).await;
    *state.chat_transcript.write().await = session.transcript().to_vec();
    let reply = outcome?;
    let payload = ReplyPayload {
        reply,
        chat: ChatView::from_session(&session),
    };

    Ok(Json(ApiResponse::success(payload, &clock).with_link("chat", "/api/v1/chat")))
}

/// POST /api/v1/chat
pub async fn ask(
    State(state): State<AppState>,
    AppJson(body): AppJson<AskRequest>,
) -> Result<Json<ApiResponse<ReplyPayload>>, AppError> {
    let clock = RequestClock::start();
    let mut session = state.chat.try_lock().map_err(|_| AppError::RequestInFlight)?;

    let outcome = session.ask(&body.message).await;
    *state.chat_transcript.write().await = session.transcript().to_vec();
    let reply = outcome?;
    let payload = ReplyPayload {
        reply,
        chat: ChatView::from_session(&session),
    };

    Ok(Json(ApiResponse::success(payload, &clock)))
}

/// GET /api/v1/chat
///
/// While a request is outstanding the view reports `awaiting_response` and
/// shows the transcript as of the last settled request.
pub async fn get_chat(State(state): State<AppState>) -> Json<ApiResponse<ChatView>> {
    let clock = RequestClock::start();
    let view = match state.chat.try_lock() {
        Ok(session) => ChatView::from_session(&session),
        Err(_) => ChatView {
            state: ChatState::AwaitingResponse,
            status: Some(AWAITING_MESSAGE.to_string()),
            transcript: render_transcript(&state.chat_transcript.read().await),
        },
    };

    Json(ApiResponse::success(view, &clock))
}
