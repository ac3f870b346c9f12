//! Error types for job configuration and engine lookup.

use std::{path::PathBuf, result};

/// Reasons a job configuration cannot be turned into an engine command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("font family name is empty")]
    EmptyName,

    #[error("font family name is not usable as a file name: {0:?}")]
    InvalidName(String),

    #[error("no font file is assigned to a style")]
    NoFilesAssigned,

    #[error("no style selected for {}", .0.display())]
    UnassignedFile(PathBuf),

    #[error("no output directory selected")]
    NoOutputDir,
}

/// Errors raised while locating the engine executable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocatorError {
    #[error("{0} was not found on PATH")]
    NotFound(String),
}

/// Errors that can occur in readify-core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("configuration incomplete: {0}")]
    ConfigIncomplete(#[from] ConfigurationError),

    #[error(transparent)]
    Locator(#[from] LocatorError),
}

pub type Result<T> = result::Result<T, Error>;
