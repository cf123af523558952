use axum::{
    extract::{Request, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;
use crate::i18n::Culture;

/// Culture resolution middleware: negotiates the request's culture from the
/// Accept-Language header and stores it in request extensions for the
/// `I18n` extractor.
///
/// Unrecognized or malformed preferences leave no extension behind, which
/// downstream reads as the configured default culture. Resolution never
/// fails a request.
pub async fn culture_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(culture) = resolve_from_headers(&state, request.headers()) {
        request.extensions_mut().insert(culture);
    }

    next.run(request).await
}

fn resolve_from_headers(state: &AppState, headers: &HeaderMap) -> Option<Culture> {
    let header = headers.get(ACCEPT_LANGUAGE)?.to_str().ok()?;
    state.cultures.resolve(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::config::{AppConfig, Config, Environment, LocalizationConfig, ServerConfig};
    use crate::i18n::{self, I18n, MemoryCache, StringCache};
    use axum::{body::Body, http::Request as HttpRequest, middleware::from_fn_with_state, routing::get, Router};
    use http_body_util::BodyExt;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(dir: &TempDir) -> AppState {
        fs::write(
            dir.path().join("strings.en-US.json"),
            r#"{"greeting": "Hello"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("strings.de-DE.json"),
            r#"{"greeting": "Hallo"}"#,
        )
        .unwrap();

        let env = Config {
            server: ServerConfig {
                host: "127.0.0.1".parse().unwrap(),
                port: 0,
            },
            app: AppConfig {
                name: "test".to_string(),
                environment: Environment::Development,
                static_dir: "static".to_string(),
            },
            localization: LocalizationConfig {
                default_culture: "en-US".to_string(),
                supported_cultures: vec!["en-US".to_string(), "de-DE".to_string()],
                resources_dir: dir.path().to_string_lossy().into_owned(),
                resource_basename: "strings".to_string(),
            },
        };
        let cache: Arc<dyn StringCache> = Arc::new(MemoryCache::default());
        let (cultures, localizer) = i18n::init_i18n(&env.localization, cache).unwrap();
        AppState::new(env, cultures, localizer)
    }

    async fn greeting_for(header: Option<&str>) -> String {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let app = Router::new()
            .route(
                "/",
                get(|i18n: I18n| async move { i18n.text("greeting").unwrap_or_default() }),
            )
            .layer(from_fn_with_state(state.clone(), culture_middleware))
            .with_state(state);

        let mut request = HttpRequest::builder().uri("/");
        if let Some(value) = header {
            request = request.header("Accept-Language", value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn resolves_supported_culture_from_header() {
        assert_eq!(greeting_for(Some("de-DE,en-US;q=0.8")).await, "Hallo");
    }

    #[tokio::test]
    async fn expanded_bare_code_resolves() {
        assert_eq!(greeting_for(Some("de,en;q=0.5")).await, "Hallo");
    }

    #[tokio::test]
    async fn unknown_culture_falls_back_to_default() {
        assert_eq!(greeting_for(Some("xx-XX")).await, "Hello");
    }

    #[tokio::test]
    async fn missing_header_uses_default() {
        assert_eq!(greeting_for(None).await, "Hello");
    }

    #[tokio::test]
    async fn concurrent_requests_keep_their_own_culture() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let app = Router::new()
            .route(
                "/",
                get(|i18n: I18n| async move { i18n.text("greeting").unwrap_or_default() }),
            )
            .layer(from_fn_with_state(state.clone(), culture_middleware))
            .with_state(state);

        let request_with = |lang: &str| {
            HttpRequest::builder()
                .uri("/")
                .header("Accept-Language", lang)
                .body(Body::empty())
                .unwrap()
        };

        let (german, english) = tokio::join!(
            app.clone().oneshot(request_with("de-DE")),
            app.clone().oneshot(request_with("en-US"))
        );

        let german = german.unwrap().into_body().collect().await.unwrap().to_bytes();
        let english = english.unwrap().into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&german[..], b"Hallo");
        assert_eq!(&english[..], b"Hello");
    }
}
