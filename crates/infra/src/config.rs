//! Environment-driven configuration for the store and SKU allocation.

use std::time::Duration;

use thiserror::Error;

pub const DATABASE_URL_VAR: &str = "STOCKLEDGER_DATABASE_URL";
pub const STORE_TIMEOUT_VAR: &str = "STOCKLEDGER_STORE_TIMEOUT_MS";
pub const SKU_PREFIX_VAR: &str = "STOCKLEDGER_SKU_PREFIX";
pub const SKU_WIDTH_VAR: &str = "STOCKLEDGER_SKU_WIDTH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be {expected} (got '{value}')")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where inventory state lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// `None` selects the seeded in-memory store.
    pub database_url: Option<String>,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            timeout: Duration::from_millis(5_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkuConfig {
    pub prefix: String,
    pub width: usize,
}

impl Default for SkuConfig {
    fn default() -> Self {
        Self {
            prefix: "UQ".to_string(),
            width: 3,
        }
    }
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let database_url = non_blank(lookup(DATABASE_URL_VAR));
        let timeout = match non_blank(lookup(STORE_TIMEOUT_VAR)) {
            Some(raw) => Duration::from_millis(parse_positive(STORE_TIMEOUT_VAR, &raw)?),
            None => defaults.timeout,
        };
        Ok(Self {
            database_url,
            timeout,
        })
    }
}

impl SkuConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let prefix = non_blank(lookup(SKU_PREFIX_VAR)).unwrap_or(defaults.prefix);
        let width = match non_blank(lookup(SKU_WIDTH_VAR)) {
            Some(raw) => usize::try_from(parse_positive(SKU_WIDTH_VAR, &raw)?).map_err(|_| {
                ConfigError::Invalid {
                    var: SKU_WIDTH_VAR,
                    expected: "a positive integer",
                    value: raw.clone(),
                }
            })?,
            None => defaults.width,
        };
        Ok(Self { prefix, width })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a positive integer",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(StoreConfig::from_lookup(lookup(&[])).unwrap(), StoreConfig::default());
        assert_eq!(SkuConfig::from_lookup(lookup(&[])).unwrap(), SkuConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let store = StoreConfig::from_lookup(lookup(&[
            (DATABASE_URL_VAR, "sqlite://inventory.db"),
            (STORE_TIMEOUT_VAR, "250"),
        ]))
        .unwrap();
        assert_eq!(store.database_url.as_deref(), Some("sqlite://inventory.db"));
        assert_eq!(store.timeout, Duration::from_millis(250));

        let sku = SkuConfig::from_lookup(lookup(&[(SKU_PREFIX_VAR, "INV"), (SKU_WIDTH_VAR, "5")])).unwrap();
        assert_eq!(sku, SkuConfig { prefix: "INV".to_string(), width: 5 });
    }

    #[test]
    fn blank_database_url_means_in_memory() {
        let store = StoreConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "  ")])).unwrap();
        assert_eq!(store.database_url, None);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(StoreConfig::from_lookup(lookup(&[(STORE_TIMEOUT_VAR, "0")])).is_err());
        assert!(SkuConfig::from_lookup(lookup(&[(SKU_WIDTH_VAR, "wide")])).is_err());
    }
}
