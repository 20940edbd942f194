//! Error types for license activation.

use std::fmt;

use thiserror::Error;

use crate::entitlement::Entitlement;

/// Message used when the backend rejects a key without saying why.
pub(crate) const DEFAULT_REJECTION_MESSAGE: &str = "License validation failed";

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// The backend answered but denied the key (invalid, expired, out of calls).
    #[error("license rejected (HTTP {status}): {message}")]
    Rejected {
        /// Transport-level status of the response.
        status: u16,
        /// Backend-supplied reason.
        message: String,
    },

    /// The backend could not be reached or did not answer in time.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a body that is not a validation response.
    #[error("Invalid response from server: {0}")]
    MalformedResponse(String),

    /// The client could not be constructed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LicenseError {
    /// Returns the code reported to the caller alongside the message.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected { status, .. } => ErrorCode::Status(*status),
            Self::Network(_) => ErrorCode::NetworkError,
            Self::MalformedResponse(_) => ErrorCode::InvalidResponse,
            Self::Config(_) => ErrorCode::InvalidConfig,
        }
    }

    /// Returns true if the backend explicitly refused the key.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns true for transport failures, timeouts included.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns true if the backend reply could not be parsed.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

impl From<reqwest::Error> for LicenseError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Machine-readable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// HTTP status of a rejecting response.
    Status(u16),
    /// Transport failure.
    NetworkError,
    /// Unparsable response body.
    InvalidResponse,
    /// Client construction failure.
    InvalidConfig,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::NetworkError => f.write_str("NETWORK_ERROR"),
            Self::InvalidResponse => f.write_str("INVALID_RESPONSE"),
            Self::InvalidConfig => f.write_str("INVALID_CONFIG"),
        }
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Outcome of one validation exchange: the granted entitlement, or why it was refused.
pub type ValidationOutcome = LicenseResult<Entitlement>;
