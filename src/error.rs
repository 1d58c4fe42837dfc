use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read '{path}': {reason}")]
    Read { path: String, reason: String },
    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),
}
