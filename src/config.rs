//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `STOREFRONT_PORT` - Listen port (default: 8000)
//! - `STOREFRONT_CHAT_REPLY_DELAY_MS` - Delay before the chat bot answers (default: 1000)
//! - `STOREFRONT_CHAT_SUPPRESS_ON_CLOSE` - Cancel pending bot replies when the
//!   chat widget closes (default: false)
//! - `STOREFRONT_SESSION_IDLE_SECS` - Forget sessions idle this long (default: 1800)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

use crate::chat::{ChatSettings, ReplyPolicy};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Chat widget tunables
    pub chat: ChatSettings,
    /// Inactivity after which a session is dropped
    pub session_idle_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = parse_var("STOREFRONT_HOST", &get("STOREFRONT_HOST", "0.0.0.0"))?;
        let port = parse_var("STOREFRONT_PORT", &get("STOREFRONT_PORT", "8000"))?;
        let delay_ms: u64 = parse_var(
            "STOREFRONT_CHAT_REPLY_DELAY_MS",
            &get("STOREFRONT_CHAT_REPLY_DELAY_MS", "1000"),
        )?;
        let suppress: bool = parse_var(
            "STOREFRONT_CHAT_SUPPRESS_ON_CLOSE",
            &get("STOREFRONT_CHAT_SUPPRESS_ON_CLOSE", "false"),
        )?;
        let idle_secs: u64 = parse_var(
            "STOREFRONT_SESSION_IDLE_SECS",
            &get("STOREFRONT_SESSION_IDLE_SECS", "1800"),
        )?;

        Ok(Self {
            host,
            port,
            session_idle_timeout: Duration::from_secs(idle_secs),
            chat: ChatSettings {
                reply_delay: Duration::from_millis(delay_ms),
                reply_policy: if suppress {
                    ReplyPolicy::SuppressOnClose
                } else {
                    ReplyPolicy::Deliver
                },
            },
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.chat, ChatSettings::default());
        assert_eq!(config.session_idle_timeout, Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("STOREFRONT_HOST", "127.0.0.1"),
            ("STOREFRONT_PORT", "3000"),
            ("STOREFRONT_CHAT_REPLY_DELAY_MS", "250"),
            ("STOREFRONT_CHAT_SUPPRESS_ON_CLOSE", "true"),
            ("STOREFRONT_SESSION_IDLE_SECS", "90"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.chat.reply_delay, Duration::from_millis(250));
        assert_eq!(config.chat.reply_policy, ReplyPolicy::SuppressOnClose);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let err = config_from(&[("STOREFRONT_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }
}
