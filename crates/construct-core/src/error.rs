//! Error types for construct identity, scopes and validation.

use std::fmt;

use thiserror::Error;

/// Errors raised by the construct framework layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    /// A construct id was empty or contained a path separator.
    #[error("invalid construct id '{id}': {reason}")]
    InvalidId {
        /// The rejected id.
        id: String,
        /// Why the id was rejected.
        reason: String,
    },

    /// A sibling with the same id already exists under the parent.
    #[error("there is already a construct with id '{id}' under '{parent}'")]
    DuplicateId {
        /// The duplicated id.
        id: String,
        /// Path of the parent construct.
        parent: String,
    },

    /// An ARN string could not be parsed.
    #[error("invalid ARN '{arn}': {reason}")]
    InvalidArn {
        /// The rejected ARN.
        arn: String,
        /// Why parsing failed.
        reason: String,
    },

    /// An imported resource reference carried none of its identity attributes.
    #[error("cannot import {resource}: at least one of {attributes} must be provided")]
    MissingIdentity {
        /// Human-readable resource kind.
        resource: String,
        /// The attributes of which at least one is required.
        attributes: String,
    },

    /// One or more constructs failed their synthesis-time validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl ConstructError {
    /// Create an "invalid id" error.
    #[must_use]
    pub fn invalid_id(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidId {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an "invalid ARN" error.
    #[must_use]
    pub fn invalid_arn(arn: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArn {
            arn: arn.into(),
            reason: reason.into(),
        }
    }

    /// Create a "missing identity" error.
    #[must_use]
    pub fn missing_identity(resource: impl Into<String>, attributes: &[&str]) -> Self {
        Self::MissingIdentity {
            resource: resource.into(),
            attributes: attributes.join(", "),
        }
    }

    /// Returns the collected validation failures, if this is a validation error.
    #[must_use]
    pub fn validation_failures(&self) -> Option<&[ValidationFailure]> {
        match self {
            Self::Validation(errors) => Some(errors.failures()),
            _ => None,
        }
    }
}

/// A single failed validation, tied to the construct that reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Path of the construct that failed.
    pub path: String,
    /// Description of the violated constraint.
    pub message: String,
}

impl ValidationFailure {
    /// Create a new validation failure.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.path, self.message)
    }
}

/// A non-empty collection of validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    failures: Vec<ValidationFailure>,
}

impl ValidationErrors {
    /// Wrap a list of failures. Returns `None` if the list is empty.
    #[must_use]
    pub fn from_failures(failures: Vec<ValidationFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    /// The failures in the order they were reported.
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Returns true if any failure message contains `needle`.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.failures.iter().any(|f| f.message.contains(needle))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed with {} error(s):", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Result type for construct operations.
pub type Result<T> = std::result::Result<T, ConstructError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_id() {
        let err = ConstructError::invalid_id("a/b", "ids cannot contain '/'");
        assert_eq!(
            err.to_string(),
            "invalid construct id 'a/b': ids cannot contain '/'"
        );
    }

    #[test]
    fn error_display_duplicate_id() {
        let err = ConstructError::DuplicateId {
            id: "Critical".to_string(),
            parent: "Stack/Config".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "there is already a construct with id 'Critical' under 'Stack/Config'"
        );
    }

    #[test]
    fn error_display_missing_identity() {
        let err = ConstructError::missing_identity("SNS topic", &["arn", "name"]);
        assert_eq!(
            err.to_string(),
            "cannot import SNS topic: at least one of arn, name must be provided"
        );
    }

    #[test]
    fn empty_failures_are_not_an_error() {
        assert!(ValidationErrors::from_failures(Vec::new()).is_none());
    }

    #[test]
    fn validation_errors_list_every_failure() {
        let errors = ValidationErrors::from_failures(vec![
            ValidationFailure::new("Stack/Rule", "at least one source matcher is required"),
            ValidationFailure::new("Stack/Rule", "at least one target matcher is required"),
        ])
        .unwrap();

        let text = errors.to_string();
        assert!(text.starts_with("validation failed with 2 error(s):"));
        assert!(text.contains("[Stack/Rule] at least one source matcher is required"));
        assert!(errors.mentions("target matcher"));
        assert!(!errors.mentions("receiver"));
    }

    #[test]
    fn validation_failures_accessor() {
        let errors =
            ValidationErrors::from_failures(vec![ValidationFailure::new("A", "broken")]).unwrap();
        let err = ConstructError::from(errors);
        assert_eq!(err.validation_failures().map(<[_]>::len), Some(1));
        assert!(ConstructError::invalid_id("", "empty").validation_failures().is_none());
    }
}
