use axum::{routing::get, Router};

use super::handlers::home;
use crate::app_state::AppState;

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(home))
}
