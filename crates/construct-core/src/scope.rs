//! Synthesis scope: where in the construct tree something renders, and for
//! which account and region.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::node::NodePath;

/// Partition used when none is given.
pub const DEFAULT_PARTITION: &str = "aws";

/// The deployment environment of a stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment {
    /// Account id.
    pub account: String,
    /// Region, e.g. `us-east-1`.
    pub region: String,
    /// Partition, e.g. `aws`.
    pub partition: String,
}

impl Environment {
    /// Create an environment in the default partition.
    #[must_use]
    pub fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            region: region.into(),
            partition: DEFAULT_PARTITION.to_string(),
        }
    }

    /// Set the partition.
    #[must_use]
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }
}

/// A position in the construct tree together with its environment.
///
/// Scopes are passed explicitly to constructors and to `bind`; nothing is
/// looked up from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    node: NodePath,
    env: Environment,
}

impl Scope {
    /// Create a stack-level scope.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::InvalidId` if `stack_id` is not a valid id.
    pub fn stack(stack_id: impl Into<String>, env: Environment) -> Result<Self> {
        Ok(Self {
            node: NodePath::root(stack_id)?,
            env,
        })
    }

    /// Create a nested scope sharing this scope's environment.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::InvalidId` if `id` is not a valid id.
    pub fn child(&self, id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            node: self.node.child(id)?,
            env: self.env.clone(),
        })
    }

    /// The node path of this scope.
    #[must_use]
    pub const fn node(&self) -> &NodePath {
        &self.node
    }

    /// The environment of this scope.
    #[must_use]
    pub const fn env(&self) -> &Environment {
        &self.env
    }

    /// Shorthand for the environment's region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.env.region
    }

    /// Shorthand for the environment's account.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.env.account
    }

    /// Shorthand for the environment's partition.
    #[must_use]
    pub fn partition(&self) -> &str {
        &self.env.partition
    }
}
