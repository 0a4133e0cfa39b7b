use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("failed to parse {key}: {source}")]
    Deserialize {
        key: &'static str,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown {var}: {value} (expected one of {expected})")]
    UnknownValue {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid boolean for {var}: {value}")]
    InvalidBool { var: &'static str, value: String },
}
