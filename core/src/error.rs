use thiserror::Error;
use uuid::Uuid;

/// Errors from the activity and log stores.
///
/// `Validation` carries the offending field so callers can report precisely;
/// the not-found variants signal a write aimed at a row that no longer exists,
/// which the engine treats as a store inconsistency and never retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("activity {0} not found")]
    ActivityNotFound(Uuid),
    #[error("log entry {0} not found")]
    LogNotFound(Uuid),
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl StoreError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors from the language capability transport. Implementations own retries
/// and decoding; by the time one of these surfaces, the call is spent.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("capability returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Errors a diary session surfaces to its caller. Conversational hiccups
/// (unknown activity names, transient capability failures) are recovered
/// inside the session and never show up here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no activities configured for this user")]
    NoActivities,
    #[error(transparent)]
    Store(#[from] StoreError),
}
