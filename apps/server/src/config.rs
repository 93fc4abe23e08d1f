//! Environment-driven configuration.

use std::time::Duration;

/// Server settings, read once at startup. Every value has a default so a
/// bare `quotedesk-server` starts without any environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bind host
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Cache backend address
    pub redis_url: String,
    /// TTL for cached ticker metadata
    pub cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let host = env_or("QD_HOST", "0.0.0.0");
        let port = env_or("QD_PORT", "8000").parse().unwrap_or(8000);
        let redis_url = env_or("QD_REDIS_URL", "redis://127.0.0.1:6379/0");
        let ttl_secs: u64 = env_or("QD_CACHE_TTL_SECS", "2592000")
            .parse()
            .unwrap_or(2_592_000);

        Self {
            host,
            port,
            redis_url,
            cache_ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
