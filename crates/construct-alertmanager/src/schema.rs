//! Serialized form of the Alertmanager configuration schema.
//!
//! These types mirror the field names Alertmanager expects. Optional and
//! empty fields are skipped so the rendered document only carries what was
//! configured.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// The top-level Alertmanager configuration document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertManagerConfigDocument {
    /// Every receiver, default receiver first.
    pub receivers: Vec<ReceiverConfig>,
    /// The root route.
    pub route: RouteConfig,
    /// Inhibit rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inhibit_rules: Vec<InhibitRuleConfig>,
    /// Named time interval groups.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub time_intervals: Vec<TimeIntervalConfig>,
    /// Template file keys.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub templates: Vec<String>,
}

/// A routing tree node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteConfig {
    /// Receiver name. Child routes without one inherit their parent's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Labels alerts are grouped by.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,
    /// Whether evaluation continues to sibling routes after a match.
    #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_matching: Option<bool>,
    /// Matcher expressions.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<String>,
    /// Initial wait before notifying for a new group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,
    /// Wait before notifying about new alerts in an existing group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,
    /// Wait before re-sending a notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,
    /// Time interval groups during which the route is muted.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,
    /// Time interval groups during which the route is active.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub active_time_intervals: Vec<String>,
    /// Child routes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteConfig>,
}

/// A receiver with destination configs grouped by category.
///
/// Serializes as `{"name": ..., "<category_key>": [...], ...}` with the
/// categories in the order they were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverConfig {
    /// Receiver name.
    pub name: String,
    /// `(category_key, configs)` pairs in first-seen order.
    pub categories: Vec<(String, Vec<serde_json::Value>)>,
}

impl ReceiverConfig {
    /// Create a receiver with no destinations.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: Vec::new(),
        }
    }

    /// Append a destination config under `category_key`.
    pub fn push(&mut self, category_key: &str, config: serde_json::Value) {
        match self.categories.iter_mut().find(|(key, _)| key == category_key) {
            Some((_, configs)) => configs.push(config),
            None => self
                .categories
                .push((category_key.to_string(), vec![config])),
        }
    }

    /// The configs rendered under `category_key`, if any.
    #[must_use]
    pub fn configs(&self, category_key: &str) -> Option<&[serde_json::Value]> {
        self.categories
            .iter()
            .find(|(key, _)| key == category_key)
            .map(|(_, configs)| configs.as_slice())
    }
}

impl Serialize for ReceiverConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for (key, configs) in &self.categories {
            map.serialize_entry(key, configs)?;
        }
        map.end()
    }
}

/// An inhibit rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InhibitRuleConfig {
    /// Matchers selecting the alerts to mute.
    pub target_matchers: Vec<String>,
    /// Matchers selecting the alerts that cause muting.
    pub source_matchers: Vec<String>,
    /// Labels that must be equal on source and target.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub equal: Vec<String>,
}

/// A named time interval group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeIntervalConfig {
    /// Group name referenced by routes.
    pub name: String,
    /// The group's entries.
    pub time_intervals: Vec<TimeIntervalEntryConfig>,
}

/// One recurring time window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeIntervalEntryConfig {
    /// Time-of-day ranges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub times: Vec<TimeRangeConfig>,
    /// Weekday ranges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<String>,
    /// Day-of-month ranges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub days_of_month: Vec<String>,
    /// Month ranges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub months: Vec<String>,
    /// Year ranges.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<String>,
    /// IANA time zone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// A time-of-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeConfig {
    /// Window start, `HH:MM`.
    pub start_time: String,
    /// Window end, `HH:MM`.
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn receiver_groups_configs_by_category_in_first_seen_order() {
        let mut receiver = ReceiverConfig::new("ops");
        receiver.push("webhook_configs", json!({"url": "a"}));
        receiver.push("sns_configs", json!({"topic_arn": "b"}));
        receiver.push("webhook_configs", json!({"url": "c"}));

        assert_eq!(receiver.configs("webhook_configs").map(<[_]>::len), Some(2));
        assert!(receiver.configs("email_configs").is_none());

        let text = serde_json::to_string(&receiver).unwrap();
        assert_eq!(
            text,
            r#"{"name":"ops","webhook_configs":[{"url":"a"},{"url":"c"}],"sns_configs":[{"topic_arn":"b"}]}"#
        );
    }

    #[test]
    fn receiver_without_destinations_renders_name_only() {
        let text = serde_json::to_string(&ReceiverConfig::new("blackhole")).unwrap();
        assert_eq!(text, r#"{"name":"blackhole"}"#);
    }

    #[test]
    fn route_omits_unset_fields() {
        let route = RouteConfig {
            receiver: Some("default".to_string()),
            ..RouteConfig::default()
        };
        assert_eq!(serde_json::to_value(&route).unwrap(), json!({"receiver": "default"}));
    }

    #[test]
    fn route_renames_continue() {
        let route = RouteConfig {
            continue_matching: Some(false),
            ..RouteConfig::default()
        };
        assert_eq!(serde_json::to_value(&route).unwrap(), json!({"continue": false}));
    }

    #[test]
    fn inhibit_rule_omits_empty_equal() {
        let rule = InhibitRuleConfig {
            target_matchers: vec!["severity = \"warning\"".to_string()],
            source_matchers: vec!["severity = \"critical\"".to_string()],
            equal: Vec::new(),
        };
        let value = serde_json::to_value(&rule).unwrap();
        assert!(value.get("equal").is_none());
    }
}
