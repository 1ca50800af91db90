//! Selection HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/selection         - Selected products and the rendered list
//! - POST   /api/v1/selection/toggle  - Toggle a product by name
//! - DELETE /api/v1/selection/{name}  - Remove one product
//! - DELETE /api/v1/selection         - Clear the selection

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use routinely_core::view::{render_selection, SelectionView};
use routinely_types::product::Product;

use crate::http::error::AppError;
use crate::http::extract::AppJson;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::{AppState, ConcreteSelectionStore};

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SelectionPayload {
    pub products: Vec<Product>,
    pub view: SelectionView,
}

impl SelectionPayload {
    fn from_store(store: &ConcreteSelectionStore) -> Self {
        Self {
            products: store.selection().items().to_vec(),
            view: render_selection(store.selection()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ToggleResult {
    pub name: String,
    pub selected: bool,
    pub selection: SelectionPayload,
}

#[derive(Debug, Serialize)]
pub struct RemoveResult {
    pub name: String,
    pub removed: bool,
    pub selection: SelectionPayload,
}

/// GET /api/v1/selection
pub async fn get_selection(State(state): State<AppState>) -> Json<ApiResponse<SelectionPayload>> {
    let clock = RequestClock::start();
    let selection = state.selection.lock().await;

    Json(
        ApiResponse::success(SelectionPayload::from_store(&selection), &clock)
            .with_link("routine", "/api/v1/routine"),
    )
}

/// POST /api/v1/selection/toggle
///
/// Looks the product up in the catalog, falling back to the selection so a
/// product no longer in the catalog can still be deselected.
pub async fn toggle(
    State(state): State<AppState>,
    AppJson(body): AppJson<ToggleRequest>,
) -> Result<Json<ApiResponse<ToggleResult>>, AppError> {
    let clock = RequestClock::start();
    let catalog = state.catalog.read().await;
    let mut selection = state.selection.lock().await;

    let product = catalog
        .find(&body.name)
        .or_else(|| selection.selection().items().iter().find(|p| p.name == body.name))
        .cloned()
        .ok_or_else(|| AppError::ProductNotFound(body.name.clone()))?;
    drop(catalog);

    let selected = selection.toggle(&product).await?;
    let result = ToggleResult {
        name: product.name,
        selected,
        selection: SelectionPayload::from_store(&selection),
    };

    Ok(Json(ApiResponse::success(result, &clock)))
}

/// DELETE /api/v1/selection/{name}
pub async fn remove(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<RemoveResult>>, AppError> {
    let clock = RequestClock::start();
    let mut selection = state.selection.lock().await;
    let removed = selection.remove(&name).await?;

    let result = RemoveResult {
        name,
        removed,
        selection: SelectionPayload::from_store(&selection),
    };
    Ok(Json(ApiResponse::success(result, &clock)))
}

/// DELETE /api/v1/selection
pub async fn clear(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SelectionPayload>>, AppError> {
    let clock = RequestClock::start();
    let mut selection = state.selection.lock().await;
    selection.clear().await?;

    Ok(Json(ApiResponse::success(SelectionPayload::from_store(&selection), &clock)))
}
