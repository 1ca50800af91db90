//! Chat session state machine.
//!
//! `Idle -> AwaitingResponse -> Idle` on success, `-> Error` on failure.
//! `Error` is not sticky: the next `start_routine`/`ask` proceeds normally.
//!
//! Requests are single-flight: both entry points take `&mut self`, so a
//! session can never have two requests outstanding. Failed requests leave
//! the transcript exactly as it was before the call, so retrying resends
//! the same history without duplicates.

use std::time::Duration;

use routinely_types::chat::{ChatCompletionResponse, ChatRequest, ChatState, Message};
use routinely_types::error::ChatError;
use routinely_types::product::Product;
use tracing::{debug, info, warn};

use super::prompt::seed_transcript;
use super::provider::ChatProvider;

/// Default upper bound on a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default transcript length after which each request logs a warning.
pub const DEFAULT_HISTORY_WARN_THRESHOLD: usize = 40;

/// Sets the state to `AwaitingResponse` for the duration of a request.
///
/// If the request future is dropped before [`settle`](Self::settle) runs,
/// the state falls back to `Idle`.
struct InFlight<'a> {
    state: &'a mut ChatState,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn begin(state: &'a mut ChatState) -> Self {
        *state = ChatState::AwaitingResponse;
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: ChatState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = ChatState::Idle;
        }
    }
}

/// A conversation with the remote assistant.
pub struct ChatSession<P> {
    provider: P,
    model: String,
    request_timeout: Duration,
    history_warn_threshold: usize,
    transcript: Vec<Message>,
    state: ChatState,
    last_error: Option<String>,
}

impl<P: ChatProvider> ChatSession<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            history_warn_threshold: DEFAULT_HISTORY_WARN_THRESHOLD,
            transcript: Vec::new(),
            state: ChatState::Idle,
            last_error: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_history_warn_threshold(mut self, threshold: usize) -> Self {
        self.history_warn_threshold = threshold;
        self
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// User-facing message of the last failed request, cleared on success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Drop the transcript and return to `Idle`.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.state = ChatState::Idle;
        self.last_error = None;
    }

    /// Start a new routine conversation for `products`.
    ///
    /// Replaces the transcript with a fresh system + user seed pair and
    /// sends it. Fails with [`ChatError::EmptySelection`] before any network
    /// call if `products` is empty. On success the assistant reply is
    /// appended and its content returned.
    pub async fn start_routine(&mut self, products: &[Product]) -> Result<String, ChatError> {
        if products.is_empty() {
            return Err(ChatError::EmptySelection);
        }

        self.transcript = seed_transcript(products);
        info!(products = products.len(), model = %self.model, "requesting routine");

        let reply = self.send(self.transcript.clone()).await?;
        let content = reply.content.clone();
        self.transcript.push(reply);
        Ok(content)
    }

    /// Ask a follow-up question with the full prior history.
    ///
    /// Fails with [`ChatError::EmptyInput`] if `text` is blank. The user
    /// message is only committed to the transcript together with the reply.
    pub async fn ask(&mut self, text: &str) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyInput);
        }

        let question = Message::user(text);
        let mut outgoing = self.transcript.clone();
        outgoing.push(question.clone());
        debug!(messages = outgoing.len(), "sending follow-up");

        let reply = self.send(outgoing).await?;
        let content = reply.content.clone();
        self.transcript.push(question);
        self.transcript.push(reply);
        Ok(content)
    }

    async fn send(&mut self, messages: Vec<Message>) -> Result<Message, ChatError> {
        if messages.len() > self.history_warn_threshold {
            warn!(
                messages = messages.len(),
                threshold = self.history_warn_threshold,
                "transcript is growing large; full history is still sent"
            );
        }

        let request = ChatRequest {
            messages,
            model: self.model.clone(),
        };

        let guard = InFlight::begin(&mut self.state);
        let outcome = match tokio::time::timeout(
            self.request_timeout,
            self.provider.complete(&request),
        )
        .await
        {
            Ok(Ok(response)) => extract_reply(response),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(ChatError::RequestTimeout {
                timeout_ms: self.request_timeout.as_millis() as u64,
            }),
        };

        match outcome {
            Ok(reply) => {
                guard.settle(ChatState::Idle);
                self.last_error = None;
                Ok(reply)
            }
            Err(err) => {
                guard.settle(ChatState::Error);
                warn!(provider = %self.provider.name(), "chat request failed: {err}");
                self.last_error = Some(err.user_message().to_string());
                Err(err)
            }
        }
    }
}

/// Pull the assistant message out of choice 0, rejecting incomplete bodies.
fn extract_reply(response: ChatCompletionResponse) -> Result<Message, ChatError> {
    let choice = response
        .choices
        .ok_or_else(|| ChatError::MalformedResponse("response has no choices".to_string()))?
        .into_iter()
        .next()
        .ok_or_else(|| ChatError::MalformedResponse("choices is empty".to_string()))?;

    let message = choice
        .message
        .ok_or_else(|| ChatError::MalformedResponse("choice 0 has no message".to_string()))?;

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(Message::assistant(content)),
        _ => Err(ChatError::MalformedResponse(
            "choice 0 has no content".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routinely_types::chat::MessageRole;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Provider that replays canned JSON bodies and records every request.
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<serde_json::Value, ChatError>>>,
        requests: Mutex<Vec<ChatRequest>>,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<serde_json::Value, ChatError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
                delay: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            let mut provider = Self::new(vec![Ok(reply("late"))]);
            provider.delay = Some(delay);
            provider
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ChatProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletionResponse, ChatError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let next = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ChatError::Remote("no scripted reply".to_string())));
            next.map(|body| serde_json::from_value(body).unwrap())
        }
    }

    fn reply(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
    }

    fn product(name: &str) -> Product {
        Product {
            name: name.to_string(),
            brand: "Brand".to_string(),
            category: "cleanser".to_string(),
            description: "desc".to_string(),
            image: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_call() {
        let mut session = ChatSession::new(ScriptedProvider::new(vec![]), "gpt-4o");
        let err = session.start_routine(&[]).await.unwrap_err();
        assert!(matches!(err, ChatError::EmptySelection));
        assert!(session.provider().requests().is_empty());
        assert_eq!(session.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn test_routine_success_appends_reply() {
        let provider = ScriptedProvider::new(vec![Ok(reply("Step 1..."))]);
        let mut session = ChatSession::new(provider, "gpt-4o");

        let content = session.start_routine(&[product("A")]).await.unwrap();
        assert_eq!(content, "Step 1...");

        let requests = session.provider().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 2);
        assert_eq!(requests[0].model, "gpt-4o");

        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[2], Message::assistant("Step 1..."));
        assert_eq!(session.state(), ChatState::Idle);
        assert!(session.last_error().is_none());
    }

    #[tokio::test]
    async fn test_malformed_reply_leaves_seed_transcript() {
        let provider = ScriptedProvider::new(vec![Ok(serde_json::json!({}))]);
        let mut session = ChatSession::new(provider, "gpt-4o");

        let err = session.start_routine(&[product("A")]).await.unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse(_)));
        assert_eq!(session.state(), ChatState::Error);
        assert_eq!(session.transcript().len(), 2);
        assert!(session
            .transcript()
            .iter()
            .all(|m| m.role != MessageRole::Assistant));
        assert_eq!(session.last_error(), Some("Sorry, no response from AI."));
    }

    #[tokio::test]
    async fn test_incomplete_choices_are_malformed() {
        let bodies = vec![
            serde_json::json!({ "choices": [] }),
            serde_json::json!({ "choices": [{}] }),
            serde_json::json!({ "choices": [{ "message": { "role": "assistant" } }] }),
            serde_json::json!({ "choices": [{ "message": { "role": "assistant", "content": "  " } }] }),
        ];
        for body in bodies {
            let mut session = ChatSession::new(ScriptedProvider::new(vec![Ok(body.clone())]), "m");
            let err = session.start_routine(&[product("A")]).await.unwrap_err();
            assert!(matches!(err, ChatError::MalformedResponse(_)), "{body}");
        }
    }

    #[tokio::test]
    async fn test_ask_sends_full_history() {
        let provider = ScriptedProvider::new(vec![Ok(reply("Step 1...")), Ok(reply("Use SPF."))]);
        let mut session = ChatSession::new(provider, "gpt-4o");

        session.start_routine(&[product("A")]).await.unwrap();
        let answer = session.ask("  What about mornings?  ").await.unwrap();
        assert_eq!(answer, "Use SPF.");

        let requests = session.provider().requests();
        assert_eq!(requests[1].messages.len(), 4);
        assert_eq!(requests[1].messages[3], Message::user("What about mornings?"));
        assert_eq!(session.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_history_over_warn_threshold_is_sent_in_full() {
        let provider = ScriptedProvider::new(vec![
            Ok(reply("Step 1...")),
            Ok(reply("Yes.")),
            Ok(reply("Twice a week.")),
        ]);
        let mut session = ChatSession::new(provider, "gpt-4o").with_history_warn_threshold(1);

        session.start_routine(&[product("A")]).await.unwrap();
        session.ask("Is it gentle?").await.unwrap();
        session.ask("How often?").await.unwrap();

        let sizes: Vec<usize> = session
            .provider()
            .requests()
            .iter()
            .map(|r| r.messages.len())
            .collect();
        assert_eq!(sizes, vec![2, 4, 6]);
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.transcript().len(), 7);
    }

    #[tokio::test]
    async fn test_blank_ask_makes_no_call() {
        let mut session = ChatSession::new(ScriptedProvider::new(vec![]), "gpt-4o");
        let err = session.ask(" \n\t ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyInput));
        assert!(session.provider().requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_ask_then_retry_does_not_duplicate() {
        let provider = ScriptedProvider::new(vec![
            Ok(reply("Step 1...")),
            Err(ChatError::Remote("connection reset".to_string())),
            Ok(reply("Sure.")),
        ]);
        let mut session = ChatSession::new(provider, "gpt-4o");
        session.start_routine(&[product("A")]).await.unwrap();

        let err = session.ask("Can I add retinol?").await.unwrap_err();
        assert!(matches!(err, ChatError::Remote(_)));
        assert_eq!(session.state(), ChatState::Error);
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.last_error(), Some("Error connecting to AI service."));

        session.ask("Can I add retinol?").await.unwrap();
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(session.transcript().len(), 5);

        let requests = session.provider().requests();
        assert_eq!(requests[1].messages, requests[2].messages);
    }

    #[tokio::test]
    async fn test_new_routine_resets_transcript() {
        let provider = ScriptedProvider::new(vec![
            Ok(reply("first")),
            Ok(reply("answer")),
            Ok(reply("second")),
        ]);
        let mut session = ChatSession::new(provider, "gpt-4o");
        session.start_routine(&[product("A")]).await.unwrap();
        session.ask("question").await.unwrap();
        session.start_routine(&[product("B")]).await.unwrap();

        assert_eq!(session.transcript().len(), 3);
        assert!(session.transcript()[1].content.contains("- B (Brand)"));
    }

    #[tokio::test]
    async fn test_timeout_fails_and_enters_error() {
        let provider = ScriptedProvider::slow(Duration::from_secs(5));
        let mut session =
            ChatSession::new(provider, "gpt-4o").with_request_timeout(Duration::from_millis(20));

        let err = session.start_routine(&[product("A")]).await.unwrap_err();
        assert!(matches!(err, ChatError::RequestTimeout { timeout_ms: 20 }));
        assert_eq!(session.state(), ChatState::Error);
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_request_returns_to_idle() {
        let provider = ScriptedProvider::slow(Duration::from_secs(5));
        let mut session = ChatSession::new(provider, "gpt-4o");

        let _ = tokio::time::timeout(Duration::from_millis(20), session.ask("hello")).await;
        assert_eq!(session.state(), ChatState::Idle);
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_reset() {
        let mut session =
            ChatSession::new(ScriptedProvider::new(vec![Ok(reply("ok"))]), "gpt-4o");
        session.start_routine(&[product("A")]).await.unwrap();
        session.reset();
        assert!(session.transcript().is_empty());
        assert_eq!(session.state(), ChatState::Idle);
    }
}
