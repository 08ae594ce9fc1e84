//! Configuration types.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Files larger than this are refused by `load` (4 MiB).
pub const MAX_LOAD_SIZE: u64 = 4 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Directory served as the storage root.
    pub root: PathBuf,
    /// Address to listen on.
    pub bind: IpAddr,
    /// Port to listen on.
    pub port: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./data/files"),
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
        }
    }
}

impl EditorConfig {
    /// Load from `TEXT_EDITOR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup, falling back to defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let root = lookup("TEXT_EDITOR_ROOT")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.root);

        let bind = match lookup("TEXT_EDITOR_BIND") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TEXT_EDITOR_BIND".to_string(),
                message: format!("'{}' is not an IP address", raw),
            })?,
            None => defaults.bind,
        };

        let port = match lookup("TEXT_EDITOR_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TEXT_EDITOR_PORT".to_string(),
                message: format!("'{}' is not a valid port", raw),
            })?,
            None => defaults.port,
        };

        Ok(Self { root, bind, port })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
