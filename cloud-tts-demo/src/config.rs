use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;
use crate::synth::DEFAULT_ENDPOINT;

/// Server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub endpoint: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Config(format!("PORT must be a number, got '{}'", raw)))?,
            None => 3000,
        };
        let static_dir = lookup("STATIC_DIR").unwrap_or_else(|| "./static".to_string());
        let endpoint = lookup("TTS_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Self {
            host,
            port,
            static_dir: static_dir.into(),
            endpoint,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid address {}:{}", self.host, self.port)))
    }
}
