//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use routinely_types::error::{CatalogError, ChatError, StorageError};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
    Catalog(CatalogError),
    Storage(StorageError),
    /// A chat request is already outstanding for the session.
    RequestInFlight,
    /// No product with this name in the catalog or selection.
    ProductNotFound(String),
    /// The request body was missing, not JSON, or the wrong shape.
    InvalidBody { status: StatusCode, message: String },
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::Catalog(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl AppError {
    /// Status, error code, user-facing message and optional internal detail.
    fn parts(&self) -> (StatusCode, &'static str, String, Option<String>) {
        match self {
            AppError::Chat(e) => {
                let (status, code) = match e {
                    ChatError::EmptySelection => (StatusCode::BAD_REQUEST, "EMPTY_SELECTION"),
                    ChatError::EmptyInput => (StatusCode::BAD_REQUEST, "EMPTY_INPUT"),
                    ChatError::Remote(_) => (StatusCode::BAD_GATEWAY, "REMOTE_ERROR"),
                    ChatError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE"),
                    ChatError::RequestTimeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "REQUEST_TIMEOUT"),
                };
                let detail = (!e.is_user_correctable()).then(|| e.to_string());
                (status, code, e.user_message().to_string(), detail)
            }
            AppError::Catalog(e) => (
                StatusCode::BAD_GATEWAY,
                "CATALOG_UNAVAILABLE",
                "The product catalog could not be loaded.".to_string(),
                Some(e.to_string()),
            ),
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Your selection could not be saved.".to_string(),
                Some(e.to_string()),
            ),
            AppError::RequestInFlight => (
                StatusCode::CONFLICT,
                "REQUEST_IN_FLIGHT",
                "A request is already in progress. Please wait for it to finish.".to_string(),
                None,
            ),
            AppError::ProductNotFound(name) => (
                StatusCode::NOT_FOUND,
                "PRODUCT_NOT_FOUND",
                format!("Product '{name}' not found"),
                None,
            ),
            AppError::InvalidBody { status, message } => {
                (*status, "INVALID_BODY", message.clone(), None)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, detail = detail.as_deref().unwrap_or(""), "{message}");
        }

        let details = detail.map(|d| serde_json::json!({ "cause": d }));
        (status, Json(ApiResponse::error(code, &message, details))).into_response()
    }
}
