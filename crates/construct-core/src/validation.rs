//! Synthesis-time validation.
//!
//! Constructs that can only be checked once the whole tree is built
//! implement [`Validate`]. The owner runs a [`Validator`] over them right
//! before rendering, so every failure in the tree is reported at once.

use crate::error::{ValidationErrors, ValidationFailure};
use crate::node::NodePath;

/// A construct with constraints checked at synthesis time.
pub trait Validate {
    /// Returns the violated constraints, or an empty list if valid.
    fn validate(&self) -> Vec<ValidationFailure>;
}

/// Collects validation failures across many constructs.
///
/// # Example
///
/// ```
/// use construct_core::{NodePath, Validator};
///
/// let node = NodePath::root("Rule")?;
/// let result = Validator::new()
///     .require(&node, true, "always holds")
///     .require(&node, !Vec::<u8>::new().is_empty(), "at least one item is required")
///     .finish();
///
/// let errors = result.unwrap_err();
/// assert!(errors.mentions("at least one item"));
/// # Ok::<(), construct_core::ConstructError>(())
/// ```
#[derive(Debug, Default)]
pub struct Validator {
    failures: Vec<ValidationFailure>,
}

impl Validator {
    /// Create a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Record `message` against `node` unless `condition` holds.
    #[must_use]
    pub fn require(mut self, node: &NodePath, condition: bool, message: impl Into<String>) -> Self {
        if !condition {
            self.failures
                .push(ValidationFailure::new(node.path(), message));
        }
        self
    }

    /// Run a construct's own validation and keep its failures.
    #[must_use]
    pub fn validate<V: Validate + ?Sized>(mut self, construct: &V) -> Self {
        self.failures.extend(construct.validate());
        self
    }

    /// Run validation for every construct in `constructs`.
    #[must_use]
    pub fn validate_all<'a, V, I>(mut self, constructs: I) -> Self
    where
        V: Validate + 'a,
        I: IntoIterator<Item = &'a V>,
    {
        for construct in constructs {
            self.failures.extend(construct.validate());
        }
        self
    }

    /// Check if any failures have been collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of failures collected.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    /// Finish validation.
    ///
    /// Returns `Ok(())` if nothing failed, or every collected failure.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        match ValidationErrors::from_failures(self.failures) {
            None => Ok(()),
            Some(errors) => Err(errors),
        }
    }
}
