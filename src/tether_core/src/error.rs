use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable, machine-readable classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unknown,
    Validation,
    Network,
    Unauthorized,
    NotFound,
    Conflict,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::Network => "NETWORK",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the transport gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The request did not settle within the configured timeout.
    Timeout,
    /// The connection could not be established or was dropped.
    Connection,
}

/// Application error surfaced to every caller above the repository boundary.
///
/// Raw provider and transport errors are mapped into one of these variants
/// before they reach the session store.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("{message}")]
    Network {
        message: String,
        failure: NetworkFailure,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Unauthorized {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unknown { .. } => ErrorCode::Unknown,
            AppError::Validation { .. } => ErrorCode::Validation,
            AppError::Network { .. } => ErrorCode::Network,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Conflict { .. } => ErrorCode::Conflict,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Unknown { message, .. }
            | AppError::Validation { message, .. }
            | AppError::Network { message, .. }
            | AppError::Unauthorized { message, .. }
            | AppError::NotFound { message }
            | AppError::Conflict { message } => message,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        AppError::Unknown {
            message: message.into(),
            source: None,
        }
    }

    /// Generic fallback for errors that have no more specific mapping.
    pub fn unknown_from<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AppError::Unknown {
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        AppError::Network {
            message: message.into(),
            failure: NetworkFailure::Timeout,
            source: None,
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        AppError::Network {
            message: message.into(),
            failure: NetworkFailure::Connection,
            source: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
            source: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict {
            message: message.into(),
        }
    }

    /// Attach the original error that caused this one.
    ///
    /// Variants without a cause slot are returned unchanged.
    pub fn with_source<E>(mut self, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match &mut self {
            AppError::Unknown { source, .. }
            | AppError::Network { source, .. }
            | AppError::Unauthorized { source, .. } => *source = Some(Box::new(error)),
            AppError::Validation { .. } | AppError::NotFound { .. } | AppError::Conflict { .. } => {}
        }
        self
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            AppError::Network {
                failure: NetworkFailure::Timeout,
                ..
            }
        )
    }
}
