use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeLoanError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BridgeLoanError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BridgeLoanError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BridgeLoanError {
    fn from(e: serde_json::Error) -> Self {
        BridgeLoanError::SerializationError(e.to_string())
    }
}
