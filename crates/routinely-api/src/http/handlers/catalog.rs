//! Catalog HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/v1/categories        - Distinct categories in catalog order
//! - GET  /api/v1/products          - Filtered product grid (`category`, `search`, `expand`)
//! - POST /api/v1/products/reload   - Re-fetch the catalog from its source

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use routinely_core::catalog::source::CatalogSource;
use routinely_core::filter;
use routinely_core::view::{
    render_products_with_panels, render_unavailable, DescriptionPanels, ProductGrid,
};
use routinely_types::filter::FilterState;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestClock};
use crate::state::AppState;

/// Query parameters for the product grid.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    /// Comma-separated product names whose description panel is open.
    #[serde(default)]
    pub expand: Option<String>,
}

impl ProductQuery {
    fn filter_state(&self) -> FilterState {
        let mut filter_state = FilterState::default();
        filter_state.set_category(self.category.clone());
        filter_state.set_search_term(self.search.clone().unwrap_or_default());
        filter_state
    }

    fn panels(&self) -> DescriptionPanels {
        let mut panels = DescriptionPanels::new();
        for name in self.expand.iter().flat_map(|s| s.split(',')) {
            let name = name.trim();
            if !name.is_empty() {
                panels.expand(name);
            }
        }
        panels
    }
}

#[derive(Debug, Serialize)]
pub struct ReloadResult {
    pub count: usize,
    pub location: String,
}

/// GET /api/v1/categories
pub async fn list_categories(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    let clock = RequestClock::start();
    let categories = state
        .catalog
        .read()
        .await
        .categories()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(ApiResponse::success(categories, &clock).with_link("products", "/api/v1/products"))
}

/// GET /api/v1/products
///
/// Until a catalog load has succeeded, a failed load renders as the
/// `unavailable` grid rather than an empty filter result.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<ApiResponse<ProductGrid>> {
    let clock = RequestClock::start();
    let catalog = state.catalog.read().await;

    let grid = if let Some(cause) = catalog.unavailable() {
        tracing::debug!(cause, "rendering unavailable catalog");
        render_unavailable()
    } else {
        let filter_state = query.filter_state();
        let panels = query.panels();
        let selection = state.selection.lock().await;
        let filtered = filter::apply_state(catalog.all(), &filter_state);
        render_products_with_panels(&filtered, selection.selection(), &panels)
    };

    Json(ApiResponse::success(grid, &clock).with_link("selection", "/api/v1/selection"))
}

/// POST /api/v1/products/reload
pub async fn reload_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReloadResult>>, AppError> {
    let clock = RequestClock::start();
    let mut catalog = state.catalog.write().await;
    let count = catalog.load().await?;
    let location = catalog.source().location().to_string();

    Ok(Json(ApiResponse::success(ReloadResult { count, location }, &clock)))
}
