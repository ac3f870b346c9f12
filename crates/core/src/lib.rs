//! Readify Font core - job configuration and engine command generation.
//!
//! Everything here is synchronous. Apart from [`ExecutableLocator`], which
//! searches the executable path, nothing touches the filesystem.

pub mod command;
pub mod config;
pub mod error;
pub mod job;
pub mod locator;
pub mod naming;
pub mod styles;

pub use command::build_command;
pub use error::{ConfigurationError, Error, LocatorError, Result};
pub use job::{DarkenAmount, FontFileEntry, HintMode, JobConfiguration};
pub use locator::{ExecutableHandle, ExecutableLocator};
pub use naming::{check_family_name, is_valid_family_name};
pub use styles::{ParseStyleError, StyleSlot, classify, detect_style};
