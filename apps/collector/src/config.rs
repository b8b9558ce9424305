use anyhow::{Context, Result};

/// Runtime tunables loaded from environment variables.
/// Every knob has a default, so a bare environment is valid.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
    /// Per-request timeout for vendor API calls, in seconds.
    pub probe_timeout_secs: u64,
    /// Upper bound on in-flight probes during reconciliation/validation.
    pub probe_concurrency: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            probe_timeout_secs: env_or("PROBE_TIMEOUT_SECS", 15)?,
            probe_concurrency: env_or("PROBE_CONCURRENCY", 8)?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        Err(_) => Ok(default),
    }
}
