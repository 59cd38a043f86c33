//! Notification destinations attached to receivers.

use std::fmt;

use construct_core::Bindable;

use crate::error::AlertManagerError;

/// The kind of a destination, and the receiver key its configs render under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DestinationCategory {
    /// Short category name, e.g. `sns`.
    pub name: &'static str,
    /// Receiver field holding configs of this category, e.g. `sns_configs`.
    pub config_key: &'static str,
}

impl DestinationCategory {
    /// Amazon SNS topics.
    pub const SNS: Self = Self {
        name: "sns",
        config_key: "sns_configs",
    };
}

impl fmt::Display for DestinationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A notification target a receiver delivers to.
///
/// Implement this trait to add destination kinds beyond the built-in ones.
/// `bind` renders the category-specific config object; the receiver places
/// it under [`DestinationCategory::config_key`].
pub trait Destination: Bindable<Error = AlertManagerError> + fmt::Debug {
    /// The category this destination belongs to.
    fn category(&self) -> DestinationCategory;
}
