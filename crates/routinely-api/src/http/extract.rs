//! Request extractors whose rejections use the error envelope.

use axum::extract::FromRequest;

use super::error::AppError;

/// `Json` body extractor that rejects with [`AppError::InvalidBody`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
