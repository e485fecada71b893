use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-checkable classification of a [`QuoteVaultError`].
///
/// Presenters branch on the kind (for instance to show a friendlier alert
/// when a quote is already in a collection) and display the message as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Decode,
    Validation,
    AlreadyExists,
    NotFound,
    Unauthorized,
    Storage,
    Config,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Validation => "validation",
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Storage => "storage",
            Self::Config => "config",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    CollectionName,
    AccentColor,
    Code,
    Url,
}

#[derive(Error, Debug)]
pub enum QuoteVaultError {
    /// Connectivity failure or a non-success status from the remote service.
    #[error("Network error: {0}")]
    Network(String),

    /// The remote service answered with a payload we could not decode.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("{message}")]
    Validation { field: Field, message: String },

    /// A state precondition failed because the record is already present.
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QuoteVaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    pub fn validation(field: Field, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// The field to re-focus, for validation failures.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for QuoteVaultError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuoteVaultError>;
