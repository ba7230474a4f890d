//! Process configuration, read once at startup.

use std::net::SocketAddr;

use anyhow::Context;

use stockledger_infra::{SkuConfig, StoreConfig};

pub const BIND_ADDR_VAR: &str = "STOCKLEDGER_BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub sku: SkuConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let raw_addr = std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .with_context(|| format!("{BIND_ADDR_VAR} is not a socket address: '{raw_addr}'"))?;

        Ok(Self {
            bind_addr,
            store: StoreConfig::from_env().context("invalid store configuration")?,
            sku: SkuConfig::from_env().context("invalid SKU configuration")?,
        })
    }
}
