//! Error types for engine supervision.

use std::{io, path::PathBuf, result};

use readify_core::{ConfigurationError, LocatorError};

/// Errors returned synchronously by [`crate::Supervisor`] calls.
///
/// How a job ended is not an error here; it is reported through
/// [`crate::SupervisorEvent::Completed`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("a generation job is already running")]
    ProcessBusy,

    #[error("no generation job is running")]
    NotActive,

    #[error("engine executable not found or not runnable: {}", .0.display())]
    ExecutableNotFound(PathBuf),

    #[error("failed to start engine: {0}")]
    SpawnError(#[source] io::Error),
}

pub type Result<T> = result::Result<T, ProcessError>;

/// Reasons a generation request was refused.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("configuration incomplete: {0}")]
    ConfigIncomplete(#[from] ConfigurationError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl From<readify_core::Error> for SessionError {
    fn from(err: readify_core::Error) -> Self {
        match err {
            readify_core::Error::ConfigIncomplete(e) => SessionError::ConfigIncomplete(e),
            readify_core::Error::Locator(e) => SessionError::Locator(e),
        }
    }
}
