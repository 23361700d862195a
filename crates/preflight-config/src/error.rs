//! Error types for configuration operations.

use thiserror::Error;

/// Structured errors emitted while decomposing or validating configuration
/// inputs. Malformed numeric values are repaired in place and never surface
/// here; only unrepairable connection-string grammar failures do.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Connection string lacked a required grammar segment.
    #[error("connection string is missing its {segment} segment")]
    MissingUrlSegment {
        /// Name of the absent segment (`scheme`, `host`, ...).
        segment: &'static str,
    },
    /// Connection string segment was present but unusable.
    #[error("connection string has an invalid {segment} segment '{value}': {reason}")]
    InvalidUrlSegment {
        /// Name of the offending segment.
        segment: &'static str,
        /// Raw value provided by the caller.
        value: String,
        /// Machine-readable reason for the rejection.
        reason: &'static str,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
