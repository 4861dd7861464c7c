// ABOUTME: Lifecycle error types with SNAFU pattern.
// ABOUTME: Backend failures are logged and translated here, never leaked as native types.

use snafu::Snafu;
use std::fmt;
use std::future::Future;

use super::operation::{BackendKind, Operation};

/// Error surfaced by every lifecycle operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LifecycleError {
    #[snafu(display(
        "{backend} internal error during {operation} of {}: {message}",
        id.as_deref().unwrap_or("<unnamed>")
    ))]
    Internal {
        backend: BackendKind,
        operation: Operation,
        id: Option<String>,
        message: String,
    },

    #[snafu(display("invalid argument for {operation}: {message}"))]
    InvalidArgument {
        operation: Operation,
        message: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleErrorKind {
    /// Unexpected backend or connection failure.
    Internal,
    /// Caller input rejected before any backend call.
    InvalidArgument,
}

impl LifecycleError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> LifecycleErrorKind {
        match self {
            LifecycleError::Internal { .. } => LifecycleErrorKind::Internal,
            LifecycleError::InvalidArgument { .. } => LifecycleErrorKind::InvalidArgument,
        }
    }

    /// The operation that failed.
    pub fn operation(&self) -> Operation {
        match self {
            LifecycleError::Internal { operation, .. }
            | LifecycleError::InvalidArgument { operation, .. } => *operation,
        }
    }

    /// The logical identifier the failed call was made with, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            LifecycleError::Internal { id, .. } => id.as_deref(),
            LifecycleError::InvalidArgument { .. } => None,
        }
    }

    /// The underlying message, without the backend and identifier prefix.
    pub fn message(&self) -> &str {
        match self {
            LifecycleError::Internal { message, .. }
            | LifecycleError::InvalidArgument { message, .. } => message,
        }
    }
}

pub type Result<T, E = LifecycleError> = std::result::Result<T, E>;

/// Run one backend interaction, translating any failure into
/// [`LifecycleError::Internal`] after logging it with the identifier.
pub(crate) async fn guard<T, E, F>(
    backend: BackendKind,
    operation: Operation,
    id: Option<&str>,
    call: F,
) -> Result<T>
where
    E: fmt::Display,
    F: Future<Output = std::result::Result<T, E>>,
{
    call.await.map_err(|e| {
        tracing::error!(
            %backend,
            %operation,
            id = id.unwrap_or("-"),
            error = %e,
            "error while talking to backend"
        );
        InternalSnafu {
            backend,
            operation,
            id: id.map(str::to_string),
            message: e.to_string(),
        }
        .build()
    })
}

pub(crate) fn invalid_argument(operation: Operation, message: impl fmt::Display) -> LifecycleError {
    InvalidArgumentSnafu {
        operation,
        message: message.to_string(),
    }
    .build()
}
