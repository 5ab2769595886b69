/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 *
 * Resolution never fails: missing groups, worlds, and users degrade to empty
 * values. Only persistence, configuration, and admin edits produce errors.
 */

use miette::Diagnostic;
use thiserror::Error;

// Re-export DataError from the data module
pub use crate::data::errors::DataError;

// Re-export ConfigError from the config module
pub use crate::config::ConfigError;

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum MultipassError {
    #[error("Data source error: {0}")]
    #[diagnostic(transparent)]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Group '{0}' does not exist")]
    #[diagnostic(
        code(multipass::group_not_found),
        help("Create the group first or check the spelling; group names are case-insensitive.")
    )]
    GroupNotFound(String),

    #[error("Group '{0}' already exists")]
    #[diagnostic(
        code(multipass::group_exists),
        help("Group names are case-insensitive. Edit the existing group instead.")
    )]
    GroupExists(String),

    #[error("Invalid name: {0:?}")]
    #[diagnostic(
        code(multipass::invalid_name),
        help("Names must be non-empty, must not start with '.', and must not contain path separators.")
    )]
    InvalidName(String),
}

/// Result type for admin and lifecycle operations
pub type Result<T> = std::result::Result<T, MultipassError>;

/// Check that a user, group, or world name is usable as a storage key
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    let valid = !trimmed.is_empty()
        && !trimmed.starts_with('.')
        && !name
            .chars()
            .any(|c| c.is_control() || c == '/' || c == '\\');
    if valid {
        Ok(())
    } else {
        Err(MultipassError::InvalidName(name.to_string()))
    }
}
