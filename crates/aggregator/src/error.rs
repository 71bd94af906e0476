use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregatorError>;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid data directory: {0}")]
    InvalidDataDir(String),

    #[error("Invalid record in {file}: {reason}")]
    InvalidRecord { file: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AggregatorError {
    pub fn invalid_record(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            file: file.into(),
            reason: reason.into(),
        }
    }
}
