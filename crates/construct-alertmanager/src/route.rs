//! The alert routing tree.
//!
//! Every configuration owns one root [`Route`]. Child routes are appended
//! with [`Route::add_child`] and keep their insertion order. The root route
//! always has a receiver (the default receiver unless overridden) and cannot
//! carry active or mute time intervals.

use std::time::Duration;

use construct_core::{ChildIds, NodePath};
use tracing::info;

use crate::error::{AlertManagerError, Result};
use crate::matcher::Matcher;
use crate::receiver::ReceiverHandle;
use crate::time_interval::TimeIntervalHandle;

/// Special `group_by` label that groups by every label.
pub const GROUP_BY_ALL: &str = "...";

/// Options for a route.
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Receiver for matching alerts. Child routes inherit their parent's when unset.
    pub receiver: Option<ReceiverHandle>,
    /// Matchers an alert must satisfy.
    pub matchers: Vec<Matcher>,
    /// Whether evaluation continues to later siblings after a match.
    pub continue_matching: Option<bool>,
    /// Labels to group alerts by.
    pub group_by: Vec<String>,
    /// How long to wait before the first notification of a group.
    pub group_wait: Option<Duration>,
    /// How long to wait before notifying about new alerts in a group.
    pub group_interval: Option<Duration>,
    /// How long to wait before repeating a notification.
    pub repeat_interval: Option<Duration>,
    /// Groups during which the route is active.
    pub active_time_intervals: Vec<TimeIntervalHandle>,
    /// Groups during which the route is muted.
    pub mute_time_intervals: Vec<TimeIntervalHandle>,
}

impl RouteOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the receiver.
    #[must_use]
    pub const fn receiver(mut self, receiver: ReceiverHandle) -> Self {
        self.receiver = Some(receiver);
        self
    }

    /// Add a matcher.
    #[must_use]
    pub fn matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Add several matchers.
    #[must_use]
    pub fn matchers(mut self, matchers: impl IntoIterator<Item = Matcher>) -> Self {
        self.matchers.extend(matchers);
        self
    }

    /// Set whether evaluation continues after a match.
    #[must_use]
    pub const fn continue_matching(mut self, continue_matching: bool) -> Self {
        self.continue_matching = Some(continue_matching);
        self
    }

    /// Group alerts by the given labels.
    #[must_use]
    pub fn group_by<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Group alerts by every label.
    #[must_use]
    pub fn group_by_all(mut self) -> Self {
        self.group_by = vec![GROUP_BY_ALL.to_string()];
        self
    }

    /// Set the group wait.
    #[must_use]
    pub const fn group_wait(mut self, duration: Duration) -> Self {
        self.group_wait = Some(duration);
        self
    }

    /// Set the group interval.
    #[must_use]
    pub const fn group_interval(mut self, duration: Duration) -> Self {
        self.group_interval = Some(duration);
        self
    }

    /// Set the repeat interval.
    #[must_use]
    pub const fn repeat_interval(mut self, duration: Duration) -> Self {
        self.repeat_interval = Some(duration);
        self
    }

    /// Add an active time interval.
    #[must_use]
    pub fn active_time_interval(mut self, interval: TimeIntervalHandle) -> Self {
        self.active_time_intervals.push(interval);
        self
    }

    /// Add a mute time interval.
    #[must_use]
    pub fn mute_time_interval(mut self, interval: TimeIntervalHandle) -> Self {
        self.mute_time_intervals.push(interval);
        self
    }
}

/// A node in the routing tree.
#[derive(Debug, Clone)]
pub struct Route {
    node: NodePath,
    is_root: bool,
    pub(crate) receiver: Option<ReceiverHandle>,
    pub(crate) matchers: Vec<Matcher>,
    pub(crate) continue_matching: Option<bool>,
    pub(crate) group_by: Vec<String>,
    pub(crate) group_wait: Option<Duration>,
    pub(crate) group_interval: Option<Duration>,
    pub(crate) repeat_interval: Option<Duration>,
    pub(crate) active_time_intervals: Vec<TimeIntervalHandle>,
    pub(crate) mute_time_intervals: Vec<TimeIntervalHandle>,
    children: Vec<Route>,
    child_ids: ChildIds,
}

impl Route {
    /// Create the root route. It targets `default_receiver` unless the
    /// options name another one.
    pub(crate) fn root(
        node: NodePath,
        default_receiver: ReceiverHandle,
        options: RouteOptions,
    ) -> Result<Self> {
        if !options.active_time_intervals.is_empty() {
            return Err(AlertManagerError::RootRouteTimeInterval { kind: "active" });
        }
        if !options.mute_time_intervals.is_empty() {
            return Err(AlertManagerError::RootRouteTimeInterval { kind: "mute" });
        }
        let mut route = Self::build(node, true, options)?;
        route.receiver.get_or_insert(default_receiver);
        Ok(route)
    }

    fn build(node: NodePath, is_root: bool, options: RouteOptions) -> Result<Self> {
        check_duration("group_wait", options.group_wait)?;
        check_duration("group_interval", options.group_interval)?;
        check_duration("repeat_interval", options.repeat_interval)?;

        Ok(Self {
            node,
            is_root,
            receiver: options.receiver,
            matchers: options.matchers,
            continue_matching: options.continue_matching,
            group_by: options.group_by,
            group_wait: options.group_wait,
            group_interval: options.group_interval,
            repeat_interval: options.repeat_interval,
            active_time_intervals: options.active_time_intervals,
            mute_time_intervals: options.mute_time_intervals,
            children: Vec::new(),
            child_ids: ChildIds::new(),
        })
    }

    /// Append a child route and return it for further configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid or already used by a sibling, or
    /// if a duration has sub-second precision.
    pub fn add_child(&mut self, id: impl Into<String>, options: RouteOptions) -> Result<&mut Self> {
        let id = id.into();
        let child = Self::build(self.node.child(id.clone())?, false, options)?;
        self.child_ids.claim(&self.node, id)?;

        info!(
            route = %child.node,
            matchers = child.matchers.len(),
            "added child route"
        );

        let index = self.children.len();
        self.children.push(child);
        Ok(&mut self.children[index])
    }

    /// Set the receiver.
    pub fn set_receiver(&mut self, receiver: ReceiverHandle) -> &mut Self {
        self.receiver = Some(receiver);
        self
    }

    /// Append a matcher.
    pub fn add_matcher(&mut self, matcher: Matcher) -> &mut Self {
        self.matchers.push(matcher);
        self
    }

    /// Set whether evaluation continues after a match.
    pub fn set_continue_matching(&mut self, continue_matching: bool) -> &mut Self {
        self.continue_matching = Some(continue_matching);
        self
    }

    /// Append a `group_by` label.
    pub fn add_group_by(&mut self, label: impl Into<String>) -> &mut Self {
        self.group_by.push(label.into());
        self
    }

    /// Set the group wait.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::InvalidDuration` for sub-second durations.
    pub fn set_group_wait(&mut self, duration: Duration) -> Result<&mut Self> {
        check_duration("group_wait", Some(duration))?;
        self.group_wait = Some(duration);
        Ok(self)
    }

    /// Set the group interval.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::InvalidDuration` for sub-second durations.
    pub fn set_group_interval(&mut self, duration: Duration) -> Result<&mut Self> {
        check_duration("group_interval", Some(duration))?;
        self.group_interval = Some(duration);
        Ok(self)
    }

    /// Set the repeat interval.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::InvalidDuration` for sub-second durations.
    pub fn set_repeat_interval(&mut self, duration: Duration) -> Result<&mut Self> {
        check_duration("repeat_interval", Some(duration))?;
        self.repeat_interval = Some(duration);
        Ok(self)
    }

    /// Append an active time interval.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::RootRouteTimeInterval` on the root route.
    pub fn add_active_time_interval(&mut self, interval: TimeIntervalHandle) -> Result<&mut Self> {
        if self.is_root {
            return Err(AlertManagerError::RootRouteTimeInterval { kind: "active" });
        }
        self.active_time_intervals.push(interval);
        Ok(self)
    }

    /// Append a mute time interval.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::RootRouteTimeInterval` on the root route.
    pub fn add_mute_time_interval(&mut self, interval: TimeIntervalHandle) -> Result<&mut Self> {
        if self.is_root {
            return Err(AlertManagerError::RootRouteTimeInterval { kind: "mute" });
        }
        self.mute_time_intervals.push(interval);
        Ok(self)
    }

    /// Returns true for the configuration's root route.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }

    /// The construct path of this route.
    #[must_use]
    pub const fn node(&self) -> &NodePath {
        &self.node
    }

    /// The receiver, if set.
    #[must_use]
    pub const fn receiver(&self) -> Option<ReceiverHandle> {
        self.receiver
    }

    /// The matchers in insertion order.
    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// The child routes in insertion order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Find a direct child by id.
    #[must_use]
    pub fn child(&self, id: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.node.id() == id)
    }

    /// Find a direct child by id for further configuration.
    pub fn child_mut(&mut self, id: &str) -> Option<&mut Self> {
        self.children.iter_mut().find(|c| c.node.id() == id)
    }
}

fn check_duration(field: &'static str, duration: Option<Duration>) -> Result<()> {
    match duration {
        Some(d) if d.subsec_nanos() != 0 => Err(AlertManagerError::InvalidDuration {
            field,
            reason: format!("{d:?} has sub-second precision; only whole seconds are supported"),
        }),
        _ => Ok(()),
    }
}

/// Render a duration as Alertmanager's `<seconds>s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    format!("{}s", duration.as_secs())
}
