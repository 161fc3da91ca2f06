//! Error types for the color temperature filter.

use std::path::PathBuf;

/// Errors reported by a [`GammaBackend`](crate::GammaBackend).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The display utility exited unsuccessfully.
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// The exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The requested display is not connected or not known.
    #[error("Display not found: {0}")]
    DisplayNotFound(String),

    /// The display was found but reported no gamma values.
    #[error("No gamma reported for display {0}")]
    GammaNotReported(String),

    /// The display reported gamma values that could not be parsed.
    #[error("Invalid gamma reported: {0}")]
    InvalidGamma(String),

    /// Spawning the display utility failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot currently be reached.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur when driving the filter.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// An intensity value was outside the valid range.
    #[error("Invalid intensity {value} (expected {min}-{max})")]
    InvalidArgument {
        /// The invalid value provided.
        value: i32,
        /// Minimum allowed value.
        min: i32,
        /// Maximum allowed value.
        max: i32,
    },

    /// A filter mode name was not recognised.
    #[error("Invalid filter mode '{0}' (expected neutral, warm or cool)")]
    InvalidMode(String),

    /// Querying or setting the display gamma failed.
    #[error("Gamma backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),

    /// A restore was requested but the original gamma was never captured.
    #[error("Original gamma was never captured")]
    OriginalUnavailable,

    /// Stored configuration could not be read or parsed.
    #[error("Configuration corrupt: {0}")]
    ConfigCorrupt(String),

    /// Reading the configuration file for an update, or writing it, failed.
    #[error("Failed to update {}: {source}", path.display())]
    Storage {
        /// The configuration file being updated.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
