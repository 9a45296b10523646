//! Server configuration.
//!
//! Defaults are merged with these environment variables, each optional:
//!
//! | Variable         | Default   |
//! |------------------|-----------|
//! | `HOST`           | `0.0.0.0` |
//! | `PORT`           | `8000`    |
//! | `MAX_BODY_BYTES` | `65536`   |
//! | `LOG_FORMAT`     | `text`    |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variables read by [`ServerConfig::from_env`].
pub const ENV_KEYS: [&str; 4] = ["HOST", "PORT", "MAX_BODY_BYTES", "LOG_FORMAT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Request bodies larger than this are rejected with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with the process environment.
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(ServerConfig::default()))
            .merge(Env::raw().only(&ENV_KEYS))
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::figment().extract()?)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
