use thiserror::Error;

/// A response body that parsed as JSON but does not describe a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("field `{field}` out of range: {value} (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        expected: &'static str,
    },
}

impl SchemaError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::OutOfRange { field, .. } => field,
        }
    }
}
