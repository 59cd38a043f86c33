//! Receivers: named bundles of notification destinations.

use construct_core::{Bindable, NodePath, Scope};
use tracing::debug;

use crate::destination::Destination;
use crate::error::Result;
use crate::schema::ReceiverConfig;

/// Name of the receiver every configuration starts with.
pub const DEFAULT_RECEIVER_NAME: &str = "default";

/// Options for a new receiver.
#[derive(Debug, Default)]
pub struct ReceiverOptions {
    /// Explicit receiver name. Derived from the construct path when absent.
    pub name: Option<String>,
    /// Initial destinations.
    pub destinations: Vec<Box<dyn Destination>>,
}

impl ReceiverOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the receiver name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add a destination.
    #[must_use]
    pub fn destination(mut self, destination: impl Destination + 'static) -> Self {
        self.destinations.push(Box::new(destination));
        self
    }
}

/// A reference to a receiver owned by a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverHandle {
    pub(crate) owner: u64,
    pub(crate) index: usize,
}

/// A named set of destinations.
#[derive(Debug)]
pub struct Receiver {
    node: NodePath,
    name: Option<String>,
    destinations: Vec<Box<dyn Destination>>,
}

impl Receiver {
    pub(crate) fn new(node: NodePath, options: ReceiverOptions) -> Self {
        Self {
            node,
            name: options.name,
            destinations: options.destinations,
        }
    }

    /// Append a destination.
    pub fn add_destination(&mut self, destination: impl Destination + 'static) -> &mut Self {
        self.destinations.push(Box::new(destination));
        self
    }

    /// The destinations in insertion order.
    #[must_use]
    pub fn destinations(&self) -> &[Box<dyn Destination>] {
        &self.destinations
    }

    /// The construct path of this receiver.
    #[must_use]
    pub const fn node(&self) -> &NodePath {
        &self.node
    }

    /// The resolved name: the explicit name, or the path's unique id.
    #[must_use]
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.node.unique_id())
    }

    /// Render the receiver, grouping destination configs by category.
    pub(crate) fn render(&self, scope: &Scope) -> Result<ReceiverConfig> {
        let mut config = ReceiverConfig::new(self.name());
        for destination in &self.destinations {
            let category = destination.category();
            config.push(category.config_key, destination.bind(scope)?);
        }
        debug!(
            receiver = %config.name,
            destinations = self.destinations.len(),
            categories = config.categories.len(),
            "rendered receiver"
        );
        Ok(config)
    }
}
