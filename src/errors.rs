use std::path::PathBuf;
use thiserror::Error;

/// Failures of the remote strategy. These never leave the engine: every one
/// of them downgrades the call to the local strategy.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("http error: {0}")]
    Http(String),
    #[error("authentication rejected: {0}")]
    Auth(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Error reading file: {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory not found: {}", .0.display())]
    InvalidDirectory(PathBuf),
    #[error("invalid pattern {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },
}

impl InputError {
    /// Process exit code the CLI reports for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            InputError::InvalidDirectory(_) | InputError::Pattern { .. } => 3,
            InputError::NotFound(_) | InputError::Read { .. } => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown config key: {0}")]
    UnknownKey(String),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
