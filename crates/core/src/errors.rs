use std::fmt;

use thiserror::Error;

/// Which bubble/text pair a contrast check refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContrastPair {
    UserBubble,
    BotBubble,
}

impl fmt::Display for ContrastPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UserBubble => f.write_str("user bubble/text"),
            Self::BotBubble => f.write_str("bot bubble/text"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("`{field}` must be a finite number")]
    NotFinite { field: &'static str },
    #[error("`{field}` value {value} cannot be stored")]
    OutOfStorageRange { field: &'static str, value: i64 },
    #[error("unsupported {field} value `{value}`")]
    UnknownVariant { field: &'static str, value: String },
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("invalid colour `{value}` (expected #RRGGBB)")]
    InvalidColorFormat { value: String },
    #[error("cannot publish: {pair} contrast {ratio:.2}:1 is below 4.5:1")]
    AccessibilityGateFailed { pair: ContrastPair, ratio: f64 },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("snippet id `{0}` already exists")]
    DuplicateSnippetId(String),
    #[error("snippet `{0}` does not exist")]
    UnknownSnippet(String),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The change could not be saved. Check the highlighted settings and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            // Domain failures are fixed by editing, so the reason is shown to the editor.
            ApplicationError::Domain(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Persistence(message) | ApplicationError::Integration(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
