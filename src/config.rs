//! Runtime settings, read once from `DIARI_*` environment variables.

use std::{env, fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq)]
#[error("Invalid {key} value: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
    /// Enables `dev:` bearer tokens.
    pub debug: bool,
    pub credentials_path: String,
    /// JSON token table for the bearer-token verifier.
    pub token_file: Option<String>,
    pub chef_cache_ttl: Duration,
    pub delivery_fee: f64,
    /// Accounts granted admin access at startup.
    pub admin_uids: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            secret_key: "dev-secret-key".to_string(),
            debug: false,
            credentials_path: "serviceAccountKey.json".to_string(),
            token_file: None,
            chef_cache_ttl: Duration::from_secs(300),
            delivery_fee: 3.0,
            admin_uids: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            host: try_load(&lookup, "DIARI_HOST", "0.0.0.0")?,
            port: try_load(&lookup, "DIARI_PORT", "5000")?,
            secret_key: try_load(&lookup, "DIARI_SECRET_KEY", "dev-secret-key")?,
            debug: try_load(&lookup, "DIARI_DEBUG", "false")?,
            credentials_path: try_load(&lookup, "DIARI_CREDENTIALS_PATH", "serviceAccountKey.json")?,
            token_file: lookup("DIARI_TOKEN_FILE").map(|raw| raw.trim().to_string()).filter(|path| !path.is_empty()),
            chef_cache_ttl: Duration::from_secs(try_load(&lookup, "DIARI_CHEF_CACHE_TTL_SECS", "300")?),
            delivery_fee: try_load(&lookup, "DIARI_DELIVERY_FEE", "3.0")?,
            admin_uids: lookup("DIARI_ADMIN_UIDS").map(|raw| id_list(&raw)).unwrap_or_default(),
        };
        if !config.delivery_fee.is_finite() || config.delivery_fee < 0.0 {
            return Err(ConfigError {
                key: "DIARI_DELIVERY_FEE",
                reason: "must be a non-negative number".into(),
            });
        }
        if config.secret_key == "dev-secret-key" {
            warn!("DIARI_SECRET_KEY is the development default");
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn id_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

fn try_load<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError { key, reason: e.to_string() }
    })
}
