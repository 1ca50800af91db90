//! HttpChatProvider -- concrete [`ChatProvider`] for a chat-completion endpoint.
//!
//! POSTs `{ messages, model }` as JSON to a single URL (an OpenAI-compatible
//! proxy such as a serverless worker) and parses `{ choices: [...] }`.
//!
//! An optional API key is wrapped in [`secrecy::SecretString`] and only
//! exposed when building the `Authorization` header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use routinely_core::chat::provider::ChatProvider;
use routinely_types::chat::{ChatCompletionResponse, ChatRequest};
use routinely_types::error::ChatError;

/// Connection settings for [`HttpChatProvider`].
pub struct HttpChatConfig {
    pub endpoint: String,
    pub api_key: Option<SecretString>,
    /// Transport-level ceiling; the session applies its own, usually shorter, timeout.
    pub timeout: Duration,
}

/// Chat provider speaking JSON over HTTP.
///
/// Does NOT derive Debug so the API key can never end up in logs.
pub struct HttpChatProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl HttpChatProvider {
    pub fn new(config: HttpChatConfig) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("routinely/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatError::Remote(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }
}

impl ChatProvider for HttpChatProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletionResponse, ChatError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        debug!(endpoint = %self.endpoint, messages = request.messages.len(), "POST chat request");

        let response = builder
            .send()
            .await
            .map_err(|e| ChatError::Remote(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Remote(format!("HTTP {status}: {body}")));
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ChatError::MalformedResponse(format!("failed to parse response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use routinely_types::chat::Message;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn provider(endpoint: String, api_key: Option<&str>) -> HttpChatProvider {
        HttpChatProvider::new(HttpChatConfig {
            endpoint,
            api_key: api_key.map(|k| SecretString::from(k.to_string())),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![Message::system("s"), Message::user("u")],
            model: "gpt-4o".to_string(),
        }
    }

    #[tokio::test]
    async fn test_posts_transcript_and_parses_reply() {
        let base = serve(Router::new().route(
            "/chat",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(serde_json::json!({
                    "choices": [{
                        "message": {
                            "role": "assistant",
                            "content": format!(
                                "{} messages for {} ({auth})",
                                body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
                                body["model"].as_str().unwrap_or("")
                            )
                        }
                    }]
                }))
            }),
        ))
        .await;

        let resp = provider(format!("{base}/chat"), Some("sk-test"))
            .complete(&request())
            .await
            .unwrap();
        let content = resp.choices.unwrap()[0]
            .message
            .clone()
            .unwrap()
            .content
            .unwrap();
        assert_eq!(content, "2 messages for gpt-4o (Bearer sk-test)");
    }

    #[tokio::test]
    async fn test_error_status_is_remote_error() {
        let base = serve(Router::new().route(
            "/chat",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream failed") }),
        ))
        .await;

        let err = provider(format!("{base}/chat"), None)
            .complete(&request())
            .await
            .unwrap_err();
        match err {
            ChatError::Remote(msg) => assert!(msg.contains("500")),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let base = serve(Router::new().route("/chat", post(|| async { "<html>oops</html>" }))).await;

        let err = provider(format!("{base}/chat"), None)
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_empty_object_parses() {
        let base = serve(Router::new().route(
            "/chat",
            post(|| async { Json(serde_json::json!({})) }),
        ))
        .await;

        let resp = provider(format!("{base}/chat"), None)
            .complete(&request())
            .await
            .unwrap();
        assert!(resp.choices.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_is_remote_error() {
        let err = provider("http://127.0.0.1:9/chat".to_string(), None)
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Remote(_)));
    }
}
