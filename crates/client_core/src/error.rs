use shared::error::SchemaError;
use thiserror::Error;

/// Why a section's one-shot load did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("server responded with status {status}")]
    Status { status: u16 },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

impl From<SchemaError> for FetchError {
    fn from(value: SchemaError) -> Self {
        Self::Malformed(value.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

/// Every chat failure is recoverable; the session turns it into a scripted reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("chat transport error: {0}")]
    Transport(String),
    #[error("chat endpoint responded with status {status}")]
    Status { status: u16 },
    #[error("malformed chat response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid url for `{key}`: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: url::ParseError,
    },
}
