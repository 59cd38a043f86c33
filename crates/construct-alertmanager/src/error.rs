//! Error types for the construct-alertmanager crate.

use construct_core::ConstructError;
use thiserror::Error;

/// Errors that can occur while building or rendering an Alertmanager
/// configuration.
#[derive(Debug, Error)]
pub enum AlertManagerError {
    /// A compound matcher was built from zero matchers.
    #[error("a compound matcher requires at least one matcher")]
    EmptyCompoundMatcher,

    /// A destination attribute was set twice with different values.
    #[error(
        "attribute '{key}' is already set to '{existing}' and cannot be changed to '{value}'"
    )]
    ConflictingAttribute {
        /// The attribute key.
        key: String,
        /// The value already stored.
        existing: String,
        /// The rejected value.
        value: String,
    },

    /// A time interval was attached directly to the root route.
    #[error(
        "{kind} time intervals cannot be added to the root route; add them to a child route instead"
    )]
    RootRouteTimeInterval {
        /// `active` or `mute`.
        kind: &'static str,
    },

    /// A time-of-day literal was not a valid `HH:MM` value.
    #[error("invalid time of day '{value}': expected HH:MM between 00:00 and 24:00")]
    InvalidTimeOfDay {
        /// The rejected literal.
        value: String,
    },

    /// A duration cannot be expressed in whole seconds.
    #[error("invalid duration for {field}: {reason}")]
    InvalidDuration {
        /// The route setting the duration belongs to.
        field: &'static str,
        /// The reason the duration is invalid.
        reason: String,
    },

    /// A handle does not belong to this configuration.
    #[error("unknown {kind} reference #{index}: it was not created by this configuration")]
    UnknownReference {
        /// `receiver` or `time interval`.
        kind: &'static str,
        /// The index carried by the handle.
        index: usize,
    },

    /// Structured builder methods were used on an imported configuration.
    #[error(
        "configuration '{path}' was imported from raw contents and cannot be modified through the structured API"
    )]
    ImportedConfiguration {
        /// Path of the configuration construct.
        path: String,
    },

    /// Construct identity, resolution or validation failed.
    #[error(transparent)]
    Construct(#[from] ConstructError),

    /// Reading an imported file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl AlertManagerError {
    /// Returns true if this error came from synthesis-time validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Construct(ConstructError::Validation(_)))
    }

    /// Returns true if a validation failure message contains `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        match self {
            Self::Construct(ConstructError::Validation(errors)) => errors.mentions(needle),
            other => other.to_string().contains(needle),
        }
    }
}

impl From<serde_json::Error> for AlertManagerError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for AlertManagerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Result type for Alertmanager construct operations.
pub type Result<T> = std::result::Result<T, AlertManagerError>;
