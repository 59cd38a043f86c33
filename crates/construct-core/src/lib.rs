//! Construct framework primitives for Skyforge.
//!
//! `construct-core` is the small seam between typed construct libraries and
//! the template synthesizer that consumes them:
//!
//! - [`NodePath`]: where a construct lives in the tree, with stable derived
//!   identifiers ([`NodePath::unique_id`], [`NodePath::addr`])
//! - [`Scope`]: an explicit synthesis context (node path plus account,
//!   region and partition)
//! - [`Bindable`]: the contract for rendering a construct to plain JSON
//! - [`Validate`] / [`Validator`]: constraints checked at synthesis time,
//!   collected across the whole tree
//! - [`Arn`]: ARN parsing and formatting for imported resources
//!
//! # Example
//!
//! ```
//! use construct_core::{ChildIds, Environment, Scope};
//!
//! let stack = Scope::stack("Monitoring", Environment::new("123456789012", "us-east-1"))?;
//!
//! let mut children = ChildIds::new();
//! let receiver = children.claim(stack.node(), "Critical")?;
//! assert_eq!(receiver.path(), "Monitoring/Critical");
//!
//! // Sibling ids must be unique.
//! assert!(children.claim(stack.node(), "Critical").is_err());
//! # Ok::<(), construct_core::ConstructError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod arn;
mod bind;
mod error;
pub mod node;
mod scope;
mod validation;

pub use arn::Arn;
pub use bind::Bindable;
pub use error::{ConstructError, Result, ValidationErrors, ValidationFailure};
pub use node::{ChildIds, NodePath};
pub use scope::{Environment, Scope, DEFAULT_PARTITION};
pub use validation::{Validate, Validator};
