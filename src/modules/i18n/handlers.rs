use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::i18n::I18n;

#[derive(Debug, Serialize)]
pub struct CultureInfo {
    pub code: String,
    pub is_default: bool,
}

#[derive(Debug, Serialize)]
pub struct SupportedCulturesResponse {
    pub cultures: Vec<CultureInfo>,
    pub default_culture: String,
}

#[derive(Debug, Serialize)]
pub struct TranslationEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct TranslationsResponse {
    pub culture: String,
    pub entries: Vec<TranslationEntry>,
}

/// All cultures the resolver accepts
pub async fn get_supported_cultures(
    State(state): State<AppState>,
) -> Json<SupportedCulturesResponse> {
    let default = state.cultures.default_culture();
    let cultures = state
        .cultures
        .supported()
        .iter()
        .map(|culture| CultureInfo {
            code: culture.name().to_string(),
            is_default: culture == default,
        })
        .collect();

    Json(SupportedCulturesResponse {
        cultures,
        default_culture: default.name().to_string(),
    })
}

/// The culture resolved for this request
pub async fn get_current_culture(
    State(state): State<AppState>,
    i18n: I18n,
) -> Json<CultureInfo> {
    let culture = i18n.culture();

    Json(CultureInfo {
        is_default: &culture == state.cultures.default_culture(),
        code: culture.name().to_string(),
    })
}

/// Full dump of the active culture's resource document, in document order.
/// Missing resource file surfaces as 404, a corrupt one as 500.
pub async fn get_translations(i18n: I18n) -> AppResult<Json<TranslationsResponse>> {
    let entries = i18n
        .all()?
        .into_iter()
        .map(|(key, value)| TranslationEntry { key, value })
        .collect();

    Ok(Json(TranslationsResponse {
        culture: i18n.culture().name().to_string(),
        entries,
    }))
}
