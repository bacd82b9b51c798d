use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "PORTER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("document root {0} is not a directory")]
    DocumentRoot(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub document_root: PathBuf,
    /// Per-read receive timeout; an idle keep-alive connection is dropped
    /// after this long.
    pub recv_timeout_secs: u64,
    /// Capacity of the per-connection request buffer.
    pub max_request_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            document_root: PathBuf::from("."),
            recv_timeout_secs: 5,
            max_request_bytes: 8192,
        }
    }
}

impl Config {
    /// Defaults, then the file named by `PORTER_CONFIG`, then `LISTEN`,
    /// `DOC_ROOT` and `RECV_TIMEOUT` from the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `LISTEN`, `DOC_ROOT` and `RECV_TIMEOUT` as returned by
    /// `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(root) = lookup("DOC_ROOT") {
            self.document_root = PathBuf::from(root);
        }
        if let Some(secs) = lookup("RECV_TIMEOUT") {
            self.recv_timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RECV_TIMEOUT",
                value: secs,
            })?;
        }
        Ok(())
    }

    /// Binds every interface on `port`, the way the positional CLI port
    /// argument does.
    pub fn set_port(&mut self, port: u16) {
        self.listen_addr = format!("0.0.0.0:{}", port);
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_secs(self.recv_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.document_root.is_dir() {
            return Err(ConfigError::DocumentRoot(self.document_root.clone()));
        }
        if self.recv_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "recv_timeout_secs",
                value: "0".to_string(),
            });
        }
        if self.max_request_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_request_bytes",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
