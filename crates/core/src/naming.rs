//! Family name validation.

use crate::{config::RESERVED_NAME_CHARS, error::ConfigurationError};

/// Check a proposed family name, returning the reason it is unusable.
pub fn check_family_name(name: &str) -> Result<(), ConfigurationError> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::EmptyName);
    }
    if name.chars().any(|c| RESERVED_NAME_CHARS.contains(&c) || c.is_control()) {
        return Err(ConfigurationError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Whether `name` can be used as a font family name (and therefore in file names).
pub fn is_valid_family_name(name: &str) -> bool {
    check_family_name(name).is_ok()
}
