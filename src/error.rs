use thiserror::Error;

use crate::LogLevel;

/// Result type used by the provider.
pub type Result<T> = std::result::Result<T, Error>;

/// Error reported by the LaunchDarkly client collaborator.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that prevent the provider from being constructed.
///
/// Evaluation itself never fails with an `Error`: per-call problems are reported through
/// [`ResolutionDetails`](crate::ResolutionDetails).
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The custom logger is missing a handler for one of the four levels.
    #[error("Provided logger instance must support logger.{level}(...) method")]
    InvalidLogger {
        /// First level found without a handler.
        level: LogLevel,
    },
}
