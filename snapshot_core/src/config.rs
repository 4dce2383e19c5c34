//! Service configuration.
//!
//! Loaded from `service_config.json`, overridable with `SNAPSHOT_CONFIG_PATH`.

use std::{
    env, fs, io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use snapshot_proto::DEFAULT_PORT;
use thiserror::Error;

use crate::builder::DEFAULT_MAX_CONCURRENT_READS;

pub const BUILTIN_SERVICE_CONFIG: &str = include_str!("data/service_config.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Must be a loopback address; the channel is unauthenticated.
    pub bind: SocketAddr,
    pub read_timeout_ms: u64,
    /// Reads allowed in flight at once, counting reads that already timed out.
    pub max_concurrent_reads: usize,
    pub max_request_bytes: usize,
    /// JSON capture written by the external memory reader.
    pub capture_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            read_timeout_ms: 250,
            max_concurrent_reads: DEFAULT_MAX_CONCURRENT_READS,
            max_request_bytes: 64 * 1024,
            capture_path: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bind address {0} is not a loopback address")]
    NonLoopbackBind(SocketAddr),
    #[error("read_timeout_ms must be greater than zero")]
    ZeroReadTimeout,
    #[error("max_concurrent_reads must be greater than zero")]
    ZeroConcurrentReads,
}

impl ServiceConfig {
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_SERVICE_CONFIG).unwrap_or_default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bind.ip().is_loopback() {
            return Err(ConfigError::NonLoopbackBind(self.bind));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::ZeroReadTimeout);
        }
        if self.max_concurrent_reads == 0 {
            return Err(ConfigError::ZeroConcurrentReads);
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Load the service configuration from `SNAPSHOT_CONFIG_PATH`, falling back to
/// the builtin defaults when the variable is unset or the file is unusable.
pub fn load_service_config_from_env() -> (ServiceConfig, Option<PathBuf>) {
    let Some(path) = env::var("SNAPSHOT_CONFIG_PATH").ok().map(PathBuf::from) else {
        tracing::info!(
            target: "snapshot_service::config",
            "service_config.loaded=builtin"
        );
        return (ServiceConfig::builtin(), None);
    };

    match ServiceConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "snapshot_service::config",
                path = %path.display(),
                "service_config.loaded=file"
            );
            (config, Some(path))
        }
        Err(err) => {
            tracing::warn!(
                target: "snapshot_service::config",
                path = %path.display(),
                error = %err,
                "service_config.load_failed"
            );
            (ServiceConfig::builtin(), None)
        }
    }
}
