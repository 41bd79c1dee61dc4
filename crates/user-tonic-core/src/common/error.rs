//! Error types for the user service.
//!
//! This module defines the central `Error` enum, which captures every failure
//! the RPC layer can report. It implements `From<Error>` for `tonic::Status`
//! so handlers can return `Result<_, Error>` internally and convert at the
//! transport boundary.
//!
//! ## Error Cases
//! - `InvalidArgument`: A request field failed validation. Raised before any
//!   persistence call is made.
//! - `NotFound`: The requested id does not resolve to a stored user. Only
//!   get and update report this.
//! - `Internal`: Anything unexpected, including every persistence failure.

use super::types::UserId;
use tonic::{Code, Status};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the user service.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// The client request was malformed or out of range.
    #[error("{reason}")]
    InvalidArgument { reason: String },

    /// No user exists with the given id.
    #[error("User not found with id: {id}")]
    NotFound { id: UserId },

    /// An unexpected failure, usually from the persistence gateway.
    #[error("Error: {message}")]
    Internal { message: String },
}

impl Error {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// The gRPC status code this error is reported with.
    pub fn code(&self) -> Code {
        match self {
            Error::InvalidArgument { .. } => Code::InvalidArgument,
            Error::NotFound { .. } => Code::NotFound,
            Error::Internal { .. } => Code::Internal,
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        Status::new(err.code(), err.to_string())
    }
}
