//! Error types for the AppOps Client Core Library
//!
//! This module contains all error types used throughout the library, organized
//! into logical categories for better maintainability and clarity.

use thiserror::Error;

pub mod job;
pub mod remote;
pub mod resolution;
pub mod validation;

pub use self::job::JobError;
pub use self::remote::RemoteError;
pub use self::resolution::ResolutionError;
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the AppOps Client Core Library
///
/// Errors are categorized into four main types:
/// - Remote errors: transport failures and rejected control-plane calls
/// - Resolution errors: identifiers that did not resolve to a record
/// - Job errors: submission, polling and result parsing of asynchronous jobs
/// - Validation errors: caller preconditions and configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Control-plane communication errors
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Lookup and resolution errors
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Asynchronous job errors
    #[error(transparent)]
    Job(#[from] JobError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// True when the error was raised before any remote call because the
    /// caller supplied an invalid combination of inputs
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Validation(ValidationError::Precondition { .. }))
    }

    /// True when an identifier failed to resolve to a remote record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

// Conversions from external error types

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Remote(RemoteError::rejected(status.as_u16(), &err.to_string())),
            None => Self::Remote(RemoteError::transport(&err.to_string())),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Remote(RemoteError::decode("JSON payload", &err.to_string()))
    }
}
