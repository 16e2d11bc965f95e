use std::net::SocketAddr;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = env_string("PERSONNEL_BIND_ADDR", "127.0.0.1:5237")
            .parse::<SocketAddr>()
            .context("PERSONNEL_BIND_ADDR must be a valid host:port")?;

        Ok(Self { bind_addr })
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
