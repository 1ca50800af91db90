//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Catalog
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/reload", post(handlers::catalog::reload_products))
        // Selection
        .route(
            "/selection",
            get(handlers::selection::get_selection).delete(handlers::selection::clear),
        )
        .route("/selection/toggle", post(handlers::selection::toggle))
        .route("/selection/{name}", delete(handlers::selection::remove))
        // Chat
        .route("/routine", post(handlers::chat::start_routine))
        .route(
            "/chat",
            get(handlers::chat::get_chat).post(handlers::chat::ask),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use routinely_types::config::GlobalConfig;
    use serde_json::{json, Value};

    const CATALOG: &str = r#"{"products":[
        {"name":"Foaming Cleanser","brand":"CeraVe","category":"cleanser","description":"Gentle foaming wash","image":"https://example.com/a.png"},
        {"name":"Witch Hazel Toner","brand":"Thayers","category":"toner","description":"Alcohol-free toner","image":"https://example.com/b.png"}
    ]}"#;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    /// Mock chat endpoint: replies with the number of messages it received,
    /// after `delay`. Counts calls.
    async fn mock_chat(delay: Duration, calls: Arc<AtomicUsize>) -> String {
        let router = Router::new().route(
            "/",
            post(move |axum::Json(body): axum::Json<Value>| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(delay).await;
                    let count = body["messages"].as_array().map(|m| m.len()).unwrap_or(0);
                    axum::Json(json!({
                        "choices": [{"message": {"role": "assistant", "content": format!("Step 1 ({count} messages)")}}]
                    }))
                }
            }),
        );
        format!("{}/", serve(router).await)
    }

    struct TestApp {
        base: String,
        client: reqwest::Client,
        calls: Arc<AtomicUsize>,
        _dir: tempfile::TempDir,
    }

    async fn spawn_app(chat_delay: Duration) -> TestApp {
        spawn_app_with_catalog(chat_delay, Some(CATALOG)).await
    }

    /// With `catalog: None` the catalog file is never written, so the
    /// startup load fails the way `serve` tolerates.
    async fn spawn_app_with_catalog(chat_delay: Duration, catalog: Option<&str>) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("products.json");
        if let Some(contents) = catalog {
            tokio::fs::write(&catalog_path, contents).await.unwrap();
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let config = GlobalConfig {
            catalog: catalog_path.display().to_string(),
            chat_endpoint: mock_chat(chat_delay, calls.clone()).await,
            ..Default::default()
        };
        let state = AppState::with_config(dir.path(), config).await.unwrap();
        let loaded = state.load_catalog().await;
        assert_eq!(loaded.is_ok(), catalog.is_some());

        TestApp {
            base: serve(build_router(state)).await,
            client: reqwest::Client::new(),
            calls,
            _dir: dir,
        }
    }

    impl TestApp {
        async fn get(&self, path: &str) -> (u16, Value) {
            let resp = self.client.get(format!("{}{path}", self.base)).send().await.unwrap();
            (resp.status().as_u16(), resp.json().await.unwrap())
        }

        async fn post(&self, path: &str, body: Value) -> (u16, Value) {
            let resp = self
                .client
                .post(format!("{}{path}", self.base))
                .json(&body)
                .send()
                .await
                .unwrap();
            (resp.status().as_u16(), resp.json().await.unwrap())
        }

        async fn delete(&self, path: &str) -> (u16, Value) {
            let resp = self.client.delete(format!("{}{path}", self.base)).send().await.unwrap();
            (resp.status().as_u16(), resp.json().await.unwrap())
        }
    }

    #[tokio::test]
    async fn test_categories_and_filtered_products() {
        let app = spawn_app(Duration::ZERO).await;

        let (status, body) = app.get("/api/v1/categories").await;
        assert_eq!(status, 200);
        assert_eq!(body["data"], json!(["cleanser", "toner"]));

        let (_, body) = app.get("/api/v1/products?category=cleanser").await;
        assert_eq!(body["data"]["kind"], "cards");
        assert_eq!(body["data"]["cards"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["cards"][0]["name"], "Foaming Cleanser");

        let (_, body) = app.get("/api/v1/products?search=%20ALCOHOL%20").await;
        assert_eq!(body["data"]["cards"][0]["name"], "Witch Hazel Toner");

        let (_, body) = app.get("/api/v1/products?category=toner&search=foaming").await;
        assert_eq!(body["data"]["kind"], "empty");
        assert_eq!(body["data"]["message"], "No products match your filters.");
    }

    #[tokio::test]
    async fn test_toggle_remove_and_clear_selection() {
        let app = spawn_app(Duration::ZERO).await;

        let (status, body) = app
            .post("/api/v1/selection/toggle", json!({"name": "Foaming Cleanser"}))
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["selected"], true);
        assert_eq!(body["data"]["selection"]["view"]["items"][0]["label"], "Foaming Cleanser (CeraVe)");

        let (_, body) = app.get("/api/v1/products?expand=Foaming%20Cleanser").await;
        assert_eq!(body["data"]["cards"][0]["selected"], true);
        assert_eq!(body["data"]["cards"][0]["description_expanded"], true);
        assert_eq!(body["data"]["cards"][1]["selected"], false);

        let (status, body) = app.delete("/api/v1/selection/Foaming%20Cleanser").await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["removed"], true);
        assert_eq!(body["data"]["selection"]["view"]["kind"], "placeholder");

        let (_, body) = app.delete("/api/v1/selection/Foaming%20Cleanser").await;
        assert_eq!(body["data"]["removed"], false);

        app.post("/api/v1/selection/toggle", json!({"name": "Witch Hazel Toner"})).await;
        let (_, body) = app.delete("/api/v1/selection").await;
        assert_eq!(body["data"]["products"], json!([]));
        assert_eq!(body["data"]["view"]["message"], "No products selected.");
    }

    #[tokio::test]
    async fn test_toggle_unknown_product_is_not_found() {
        let app = spawn_app(Duration::ZERO).await;
        let (status, body) = app.post("/api/v1/selection/toggle", json!({"name": "Nope"})).await;
        assert_eq!(status, 404);
        assert_eq!(body["errors"][0]["code"], "PRODUCT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_routine_requires_selection() {
        let app = spawn_app(Duration::ZERO).await;
        let (status, body) = app.post("/api/v1/routine", json!({})).await;
        assert_eq!(status, 400);
        assert_eq!(body["errors"][0]["code"], "EMPTY_SELECTION");
        assert_eq!(body["errors"][0]["message"], "Please select at least one product.");
        assert_eq!(app.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_routine_then_follow_up() {
        let app = spawn_app(Duration::ZERO).await;
        app.post("/api/v1/selection/toggle", json!({"name": "Foaming Cleanser"})).await;

        let (status, body) = app.post("/api/v1/routine", json!({})).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["reply"], "Step 1 (2 messages)");
        assert_eq!(body["data"]["chat"]["state"], "idle");
        assert_eq!(body["data"]["chat"]["transcript"].as_array().unwrap().len(), 1);

        let (status, body) = app.post("/api/v1/chat", json!({"message": "Morning or night?"})).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["reply"], "Step 1 (4 messages)");

        let (_, body) = app.get("/api/v1/chat").await;
        let transcript = body["data"]["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1]["role"], "user");
        assert_eq!(transcript[1]["content"], "Morning or night?");
    }

    #[tokio::test]
    async fn test_blank_follow_up_is_rejected_without_call() {
        let app = spawn_app(Duration::ZERO).await;
        let (status, body) = app.post("/api/v1/chat", json!({"message": "   "})).await;
        assert_eq!(status, 400);
        assert_eq!(body["errors"][0]["code"], "EMPTY_INPUT");
        assert_eq!(app.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_chat_request_is_rejected() {
        let app = spawn_app(Duration::from_millis(500)).await;
        app.post("/api/v1/selection/toggle", json!({"name": "Foaming Cleanser"})).await;

        let first = {
            let client = app.client.clone();
            let url = format!("{}/api/v1/routine", app.base);
            tokio::spawn(async move { client.post(url).json(&json!({})).send().await.unwrap().status() })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (status, body) = app.post("/api/v1/chat", json!({"message": "And toner?"})).await;
        assert_eq!(status, 409);
        assert_eq!(body["errors"][0]["code"], "REQUEST_IN_FLIGHT");

        let (_, body) = app.get("/api/v1/chat").await;
        assert_eq!(body["data"]["state"], "awaiting_response");

        assert_eq!(first.await.unwrap().as_u16(), 200);
        assert_eq!(app.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_in_flight_chat_view_keeps_prior_transcript() {
        let app = spawn_app(Duration::from_millis(300)).await;
        app.post("/api/v1/selection/toggle", json!({"name": "Foaming Cleanser"})).await;
        app.post("/api/v1/routine", json!({})).await;

        let follow_up = {
            let client = app.client.clone();
            let url = format!("{}/api/v1/chat", app.base);
            tokio::spawn(async move {
                client
                    .post(url)
                    .json(&json!({"message": "Morning or night?"}))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (_, body) = app.get("/api/v1/chat").await;
        assert_eq!(body["data"]["state"], "awaiting_response");
        let transcript = body["data"]["transcript"].as_array().unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0]["content"], "Step 1 (2 messages)");

        assert_eq!(follow_up.await.unwrap().as_u16(), 200);
        let (_, body) = app.get("/api/v1/chat").await;
        assert_eq!(body["data"]["transcript"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_catalog_renders_unavailable_grid() {
        let app = spawn_app_with_catalog(Duration::ZERO, None).await;

        let (status, body) = app.get("/api/v1/products").await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["kind"], "unavailable");
        assert_eq!(
            body["data"]["message"],
            "Could not load products. Please try again later."
        );

        let (status, body) = app.post("/api/v1/products/reload", json!({})).await;
        assert_eq!(status, 502);
        assert_eq!(body["errors"][0]["code"], "CATALOG_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_envelope() {
        let app = spawn_app(Duration::ZERO).await;

        let (status, body) = app.post("/api/v1/chat", json!({"text": "hi"})).await;
        assert_eq!(status, 422);
        assert_eq!(body["data"], Value::Null);
        assert!(body["meta"].is_object());
        assert_eq!(body["errors"][0]["code"], "INVALID_BODY");

        let resp = app
            .client
            .post(format!("{}/api/v1/selection/toggle", app.base))
            .body("not json")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 415);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["errors"][0]["code"], "INVALID_BODY");
        assert_eq!(app.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reload_reports_count() {
        let app = spawn_app(Duration::ZERO).await;
        let (status, body) = app.post("/api/v1/products/reload", json!({})).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["count"], 2);
    }
}
