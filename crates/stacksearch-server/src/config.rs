//! Server configuration

use std::net::SocketAddr;

use stacksearch_core::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// In-flight requests allowed before new ones wait
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 64;

/// Where and how the HTTP service listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub concurrency_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Create a validated configuration
    pub fn new(host: impl Into<String>, port: u16, concurrency_limit: usize) -> Result<Self, ConfigError> {
        if concurrency_limit == 0 {
            return Err(ConfigError::Invalid {
                name: "concurrency_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        let config = Self {
            host: host.into(),
            port,
            concurrency_limit,
        };
        config.socket_addr()?;
        Ok(config)
    }

    /// Address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "host",
                reason: format!("'{}' is not a valid listen address: {}", self.host, e),
            })
    }
}
