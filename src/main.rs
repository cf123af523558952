use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod app_state;
mod config;
mod error;
mod i18n;
mod middleware;
mod modules;

use crate::app::create_router;
use crate::app_state::AppState;
use crate::i18n::{MemoryCache, StringCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let env = config::init().context("Failed to load configuration")?.clone();

    let cache: Arc<dyn StringCache> = Arc::new(MemoryCache::default());
    let (cultures, localizer) =
        i18n::init_i18n(&env.localization, cache).context("Failed to initialize i18n")?;

    let state = AppState::new(env.clone(), cultures, localizer);
    let app = create_router(state);

    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
