pub mod cache;
pub mod culture;
pub mod helpers;
pub mod localizer;

pub use cache::{CacheError, MemoryCache, StringCache};
pub use culture::{Culture, CultureSet};
pub use helpers::I18n;
pub use localizer::{JsonLocalizer, LocalizeError};

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::LocalizationConfig;

/// Build the culture universe and the localizer from configuration.
pub fn init_i18n(
    cfg: &LocalizationConfig,
    cache: Arc<dyn StringCache>,
) -> Result<(Arc<CultureSet>, Arc<JsonLocalizer>)> {
    let default: Culture = cfg
        .default_culture
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))
        .context("DEFAULT_CULTURE is not a valid culture tag")?;

    let mut supported = Vec::with_capacity(cfg.supported_cultures.len());
    for tag in &cfg.supported_cultures {
        let culture = tag
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .with_context(|| format!("SUPPORTED_CULTURES entry {:?} is not a valid culture tag", tag))?;
        supported.push(culture);
    }

    let cultures = Arc::new(CultureSet::new(default.clone(), supported));

    let localizer = Arc::new(JsonLocalizer::new(
        &cfg.resources_dir,
        &cfg.resource_basename,
        default.clone(),
        cache,
    ));

    // The default culture is assumed to always have a resource file; without
    // one, every fallback lookup comes back empty.
    let default_path = localizer.resource_path(&default);
    if !default_path.exists() {
        tracing::warn!(path = %default_path.display(), "default culture has no resource file");
    }

    tracing::info!(
        default = %default,
        supported = ?cultures.supported().iter().map(Culture::name).collect::<Vec<_>>(),
        "i18n initialized"
    );

    Ok((cultures, localizer))
}
