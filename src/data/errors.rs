/*!
 * Data Source Errors
 * Faults surfaced by persistence backends; missing data is never an error
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Data source operation result
pub type DataResult<T> = Result<T, DataError>;

/// Persistence errors
#[derive(Error, Debug, Diagnostic)]
pub enum DataError {
    #[error("I/O error on {}: {source}", .path.display())]
    #[diagnostic(
        code(data::io_error),
        help("Check that the data directory exists and is writable.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed data in {}: {source}", .path.display())]
    #[diagnostic(
        code(data::parse_error),
        help("Fix the YAML by hand or restore it from a backup; the file was left untouched.")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to encode {what}: {reason}")]
    #[diagnostic(code(data::serialize_error))]
    Serialize { what: String, reason: String },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
