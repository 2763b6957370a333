//! Error types for Recomendar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Recomendar operations.
///
/// Provides detailed context about failures including unmapped event types,
/// invalid hyperparameters, and missing metadata sources.
///
/// # Examples
///
/// ```
/// use recomendar::error::RecomendarError;
///
/// let err = RecomendarError::UnknownEventType {
///     event_type: "SHRUG".to_string(),
/// };
/// assert!(err.to_string().contains("SHRUG"));
/// ```
#[derive(Debug)]
pub enum RecomendarError {
    /// Interaction carries an event type not present in the weighting table.
    UnknownEventType {
        /// The unmapped event type
        event_type: String,
    },

    /// Metadata-enriched output requested but no item catalog is configured.
    MetadataRequired {
        /// Name of the model that was asked for detailed output
        model: String,
    },

    /// Invalid hyperparameter value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Invalid or corrupt model format.
    FormatError {
        /// Error description
        message: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for RecomendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecomendarError::UnknownEventType { event_type } => {
                write!(f, "Unknown event type: {event_type} has no mapped strength")
            }
            RecomendarError::MetadataRequired { model } => {
                write!(
                    f,
                    "Item catalog is required for detailed output from model '{model}'"
                )
            }
            RecomendarError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            RecomendarError::Io(e) => write!(f, "I/O error: {e}"),
            RecomendarError::FormatError { message } => {
                write!(f, "Invalid model format: {message}")
            }
            RecomendarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RecomendarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecomendarError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for RecomendarError {
    fn from(err: std::io::Error) -> Self {
        RecomendarError::Io(err)
    }
}

impl From<&str> for RecomendarError {
    fn from(msg: &str) -> Self {
        RecomendarError::Other(msg.to_string())
    }
}

impl From<String> for RecomendarError {
    fn from(msg: String) -> Self {
        RecomendarError::Other(msg)
    }
}

impl RecomendarError {
    /// Create an unknown event type error.
    #[must_use]
    pub fn unknown_event_type(event_type: &str) -> Self {
        Self::UnknownEventType {
            event_type: event_type.to_string(),
        }
    }

    /// Create an invalid hyperparameter error with descriptive context.
    #[must_use]
    pub fn invalid_hyperparameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<&str> for RecomendarError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

#[allow(clippy::cmp_owned)]
impl PartialEq<RecomendarError> for &str {
    fn eq(&self, other: &RecomendarError) -> bool {
        *self == other.to_string()
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RecomendarError>;
