use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use quotedesk_market_data::{JustEtfProvider, MetadataCache, ResolutionEngine, YahooClient};

use crate::config::Config;

pub struct AppState {
    pub engine: Arc<ResolutionEngine>,
}

pub fn init_tracing() {
    let log_format = std::env::var("QD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    // The cache and the discovery provider (with its circuit breaker) are
    // process-wide singletons shared by every request.
    let cache = Arc::new(MetadataCache::connect(&config.redis_url, config.cache_ttl).await);
    let primary = Arc::new(YahooClient::new()?);
    let discovery = Arc::new(JustEtfProvider::new(cache)?);
    let engine = Arc::new(ResolutionEngine::new(primary, discovery));

    Ok(Arc::new(AppState { engine }))
}
