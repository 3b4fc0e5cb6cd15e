use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use locator::{client::DEFAULT_STORE_TIMEOUT, SearchPolicy};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings read from the environment once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
    /// CSV or JSON dataset; without one the server uses postgres.
    pub dataset: Option<PathBuf>,
    pub store_timeout: Duration,
    pub policy: SearchPolicy,
    pub static_dir: Option<PathBuf>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            dataset: None,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            policy: SearchPolicy::default(),
            static_dir: None,
        }
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|why: T::Err| ConfigError::Invalid {
        key,
        reason: why.to_string(),
        value,
    })
}

fn parse_flag(key: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false".to_owned(),
        }),
    }
}

fn positive(key: &'static str, value: u64) -> Result<u64, ConfigError> {
    if value == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be greater than 0".to_owned(),
        });
    }
    Ok(value)
}

impl WebConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads every setting through `lookup`; unset or blank keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = lookup("LOCATOR_BIND_ADDRESS") {
            config.bind_address = parse("LOCATOR_BIND_ADDRESS", value)?;
        }
        config.dataset = lookup("LOCATOR_DATASET").map(PathBuf::from);
        if let Some(value) = lookup("LOCATOR_STORE_TIMEOUT_MS") {
            let millis = parse("LOCATOR_STORE_TIMEOUT_MS", value)?;
            config.store_timeout =
                Duration::from_millis(positive("LOCATOR_STORE_TIMEOUT_MS", millis)?);
        }
        if let Some(value) = lookup("LOCATOR_STRICT_LIMIT") {
            config.policy.strict_limit = parse_flag("LOCATOR_STRICT_LIMIT", value)?;
        }
        if let Some(value) = lookup("LOCATOR_MAX_LIMIT") {
            let max_limit = positive("LOCATOR_MAX_LIMIT", parse("LOCATOR_MAX_LIMIT", value)?)?;
            config.policy.max_limit = usize::try_from(max_limit).unwrap_or(usize::MAX);
        }
        config.static_dir = lookup("LOCATOR_STATIC_DIR").map(PathBuf::from);

        Ok(config)
    }
}
