use askama::Template;
use axum::{
    extract::Query,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::fmt::Display;
use tracing::error;

use crate::error::AppResult;
use crate::i18n::I18n;

#[derive(Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate {
    title: String,
    greeting: String,
    welcome: String,
    culture: String,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!("Failed to render template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub name: Option<String>,
}

/// Localized home page: every visible string goes through the request's
/// `I18n` capability.
pub async fn home(i18n: I18n, Query(query): Query<HomeQuery>) -> AppResult<impl IntoResponse> {
    let name = query.name.unwrap_or_else(|| "visitor".to_string());

    let template = HomeTemplate {
        title: i18n.text("app-name")?,
        greeting: i18n.text("greeting")?,
        welcome: i18n.text_fmt("welcome", &[&name as &dyn Display])?,
        culture: i18n.culture().name().to_string(),
    };

    Ok(HtmlTemplate(template))
}
