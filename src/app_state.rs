use std::sync::Arc;

use crate::config;
use crate::i18n::{CultureSet, JsonLocalizer};

#[derive(Clone)]
pub struct AppState {
    pub env: config::Config,
    pub cultures: Arc<CultureSet>,
    pub localizer: Arc<JsonLocalizer>,
}

impl AppState {
    pub fn new(
        env: config::Config,
        cultures: Arc<CultureSet>,
        localizer: Arc<JsonLocalizer>,
    ) -> Self {
        Self {
            env,
            cultures,
            localizer,
        }
    }
}
