use axum::{routing::get, Router};

use super::handlers::{get_current_culture, get_supported_cultures, get_translations};
use crate::app_state::AppState;

/// Create i18n routes
pub fn i18n_routes() -> Router<AppState> {
    Router::new()
        .route("/cultures", get(get_supported_cultures))
        .route("/current", get(get_current_culture))
        .route("/translations", get(get_translations))
}
