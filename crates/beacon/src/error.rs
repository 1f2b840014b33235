use thiserror::Error;

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

pub type Result<T> = std::result::Result<T, BeaconError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing config value: {0}")]
    Missing(&'static str),

    #[error("invalid beacon identity: {0}")]
    Beacon(#[from] BeaconError),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
