use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app_state::AppState;
use crate::i18n::culture::Culture;
use crate::i18n::localizer::{JsonLocalizer, LocalizeError};

/// Request-scoped localization capability handed to handlers and templates.
///
/// Holds the culture the resolver middleware established for this request.
/// When a lookup falls back to the default culture, the switch sticks for
/// the remainder of the request; it never leaks into other requests.
pub struct I18n {
    localizer: Arc<JsonLocalizer>,
    culture: Mutex<Culture>,
}

impl I18n {
    pub fn new(localizer: Arc<JsonLocalizer>, culture: Culture) -> Self {
        Self {
            localizer,
            culture: Mutex::new(culture),
        }
    }

    /// The culture currently in effect for this request.
    pub fn culture(&self) -> Culture {
        self.lock_culture().clone()
    }

    /// Exact lookup: `Ok(None)` when the key is absent from both the active
    /// and the default culture's resources.
    pub fn lookup(&self, key: &str) -> Result<Option<String>, LocalizeError> {
        let mut culture = self.lock_culture();
        self.localizer.get_string(&mut culture, key)
    }

    /// Lookup with the key itself as the not-found sentinel.
    pub fn text(&self, key: &str) -> Result<String, LocalizeError> {
        Ok(self.lookup(key)?.unwrap_or_else(|| key.to_string()))
    }

    /// Formatted lookup: positional substitution of `args` into the resolved
    /// template, the key itself when unresolved.
    pub fn text_fmt(&self, key: &str, args: &[&dyn Display]) -> Result<String, LocalizeError> {
        let mut culture = self.lock_culture();
        self.localizer.get_formatted(&mut culture, key, args)
    }

    /// Every entry of the active culture's resource document, in document
    /// order. Errors when that culture has no resource file.
    pub fn all(&self) -> Result<Vec<(String, String)>, LocalizeError> {
        let culture = self.lock_culture().clone();
        self.localizer.get_all_strings(&culture)
    }

    fn lock_culture(&self) -> MutexGuard<'_, Culture> {
        self.culture.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FromRequestParts<AppState> for I18n {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The resolver middleware leaves no extension behind for requests it
        // could not resolve; the configured default applies then.
        let culture = parts
            .extensions
            .get::<Culture>()
            .cloned()
            .unwrap_or_else(|| state.cultures.default_culture().clone());

        Ok(I18n::new(state.localizer.clone(), culture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::cache::MemoryCache;
    use std::fs;
    use tempfile::TempDir;

    fn i18n_with(dir: &TempDir, active: &str) -> I18n {
        fs::write(
            dir.path().join("strings.en-US.json"),
            r#"{"greeting": "Hello", "welcome": "Hello, {0}!"}"#,
        )
        .unwrap();
        let localizer = JsonLocalizer::new(
            dir.path(),
            "strings",
            "en-US".parse().unwrap(),
            Arc::new(MemoryCache::default()),
        );
        I18n::new(Arc::new(localizer), active.parse().unwrap())
    }

    #[test]
    fn text_returns_value_or_key_sentinel() {
        let dir = TempDir::new().unwrap();
        let i18n = i18n_with(&dir, "en-US");

        assert_eq!(i18n.text("greeting").unwrap(), "Hello");
        assert_eq!(i18n.text("nope").unwrap(), "nope");
    }

    #[test]
    fn text_fmt_substitutes_arguments() {
        let dir = TempDir::new().unwrap();
        let i18n = i18n_with(&dir, "en-US");

        assert_eq!(i18n.text_fmt("welcome", &[&"Ann"]).unwrap(), "Hello, Ann!");
    }

    #[test]
    fn fallback_culture_sticks_for_the_request() {
        let dir = TempDir::new().unwrap();
        // de-DE has no resource file; the first lookup falls back.
        let i18n = i18n_with(&dir, "de-DE");
        assert_eq!(i18n.culture().name(), "de-DE");

        assert_eq!(i18n.text("greeting").unwrap(), "Hello");
        assert_eq!(i18n.culture().name(), "en-US");
    }

    #[test]
    fn all_reads_the_active_culture_document() {
        let dir = TempDir::new().unwrap();
        let i18n = i18n_with(&dir, "en-US");

        let entries = i18n.all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "greeting");
    }
}
