use anyhow::{anyhow, Result};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://api.pinecone.io";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted vector service. Constructed once and
/// passed by value into each client; nothing else in this crate reads the
/// environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_base: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: Url::parse(DEFAULT_API_BASE).expect("valid default base url"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `PINECONE_API_KEY` (required) and `PINECONE_API_BASE` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key =
            std::env::var("PINECONE_API_KEY").map_err(|_| anyhow!("PINECONE_API_KEY is not set"))?;
        let mut cfg = Self::new(api_key);
        if let Ok(base) = std::env::var("PINECONE_API_BASE") {
            cfg.api_base = Url::parse(&base)?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ClientConfig::new("key");
        assert_eq!(cfg.api_base.as_str(), "https://api.pinecone.io/");
        assert_eq!(cfg.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn builder_overrides() {
        let cfg = ClientConfig::new("key")
            .with_api_base(Url::parse("http://localhost:9999").unwrap())
            .with_timeout(Duration::from_secs(2));
        assert_eq!(cfg.api_base.host_str(), Some("localhost"));
        assert_eq!(cfg.timeout, Duration::from_secs(2));
    }
}
