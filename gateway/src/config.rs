use std::env;

use anyhow::Context;

/// the port the gateway listens on when `GATEWAY_PORT` is not set.
pub const DEFAULT_PORT: u16 = 4577;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// skip tls verification for upstream calls, panels usually run with self-signed certs.
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            accept_invalid_certs: true,
        }
    }
}

impl Config {
    /// reads the config from the environment, falling back to the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(port) = var("GATEWAY_PORT") {
            config.port = port
                .parse()
                .with_context(|| format!("GATEWAY_PORT `{port}` is not a valid port"))?;
        }

        if let Some(accept) = var("PANEL_ACCEPT_INVALID_CERTS") {
            config.accept_invalid_certs = accept.parse().with_context(|| {
                format!("PANEL_ACCEPT_INVALID_CERTS `{accept}` is not true or false")
            })?;
        }

        Ok(config)
    }
}
