use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a squad manager configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{key}` = {value}: must be positive")]
    Invalid { key: &'static str, value: i32 },

    #[error("config value `{key}` = {value} exceeds the maximum of {max} cells")]
    TooLarge { key: &'static str, value: i32, max: i32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
