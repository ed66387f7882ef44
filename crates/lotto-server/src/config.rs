use lotto_core::{OriginConfig, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Contents of `lotto.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LottoConfig {
    pub server: ServerConfig,
    pub origin: OriginConfig,
    pub cache: CacheConfig,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP listen address
    pub http_addr: SocketAddr,
    /// Allow cross-origin GETs from browsers
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 9091)),
            cors: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a fetched draw stays fresh
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: lotto_core::cache::DEFAULT_TTL_SECS as u64,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| chrono::Duration::days(365 * 100))
    }
}

impl LottoConfig {
    /// Parse a config file. Fails if the file is missing or malformed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let config = toml::from_str(&text)?;
        Ok(config)
    }

    /// Parse a config file, falling back to defaults when it is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Semantic checks that the parser cannot express. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let endpoint = self.origin.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!(
                "origin.endpoint must be an http(s) URL, got {:?}",
                self.origin.endpoint
            ));
        }
        if self.cache.ttl_secs == 0 {
            errors.push("cache.ttl_secs must be greater than 0".into());
        }
        if self.resolver.max_span == 0 {
            errors.push("resolver.max_span must be greater than 0".into());
        }
        if self.resolver.concurrency == 0 {
            errors.push("resolver.concurrency must be at least 1".into());
        }

        errors
    }

    /// Apply command-line / environment overrides on top of the file values.
    pub fn with_overrides(mut self, http_addr: Option<SocketAddr>, origin: Option<String>) -> Self {
        if let Some(addr) = http_addr {
            self.server.http_addr = addr;
        }
        if let Some(endpoint) = origin {
            self.origin.endpoint = endpoint;
        }
        self
    }
}
