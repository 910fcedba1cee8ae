use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use giftdraw_types::DrawPolicy;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub policy: DrawPolicy,
    pub admin_token: Option<String>,
    /// Fixed seed for reproducible draws; OS randomness when unset.
    pub seed: Option<u64>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = match var("GIFTDRAW_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("GIFTDRAW_PORT '{raw}' is not a port"))?,
            None => 3000,
        };
        let policy = match var("GIFTDRAW_DRAW_POLICY") {
            Some(raw) => raw.parse::<DrawPolicy>()?,
            None => DrawPolicy::default(),
        };
        let seed = var("GIFTDRAW_SEED")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("GIFTDRAW_SEED '{raw}' is not a u64"))
            })
            .transpose()?;

        Ok(Self {
            host: var("GIFTDRAW_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("GIFTDRAW_DB_PATH").unwrap_or_else(|| "giftdraw.db".into()).into(),
            policy,
            admin_token: var("GIFTDRAW_ADMIN_TOKEN").filter(|t| !t.is_empty()),
            seed,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
