use axum::{middleware, routing::get, Json, Router};
use serde_json::json;

use crate::{
    app_state::AppState,
    middleware::{culture_middleware, observability_middleware},
    modules::i18n::routes::i18n_routes,
    modules::pages::routes::page_routes,
};

pub fn create_router(state: AppState) -> Router {
    let static_dir = state.env.app.static_dir.to_string();

    Router::new()
        .merge(page_routes())
        .route("/health", get(health_check))
        .nest("/api/i18n", i18n_routes())
        .nest_service(
            "/static",
            tower_http::services::ServeDir::new(static_dir),
        )
        .layer(middleware::from_fn_with_state(state.clone(), culture_middleware))
        .layer(middleware::from_fn(observability_middleware))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
