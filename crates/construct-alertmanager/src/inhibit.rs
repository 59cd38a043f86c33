//! Inhibit rules: mute target alerts while matching source alerts fire.

use construct_core::{NodePath, Validate, ValidationFailure};

use crate::matcher::Matcher;
use crate::schema::InhibitRuleConfig;

/// Options for a new inhibit rule.
///
/// Empty matcher lists are accepted here and reported when the owning
/// configuration is bound.
#[derive(Debug, Clone, Default)]
pub struct InhibitRuleOptions {
    /// Matchers selecting the alerts that cause muting.
    pub source_matchers: Vec<Matcher>,
    /// Matchers selecting the alerts to mute.
    pub target_matchers: Vec<Matcher>,
    /// Labels that must have equal values on source and target.
    pub equal: Vec<String>,
}

impl InhibitRuleOptions {
    /// Create empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source matcher.
    #[must_use]
    pub fn source_matcher(mut self, matcher: Matcher) -> Self {
        self.source_matchers.push(matcher);
        self
    }

    /// Add a target matcher.
    #[must_use]
    pub fn target_matcher(mut self, matcher: Matcher) -> Self {
        self.target_matchers.push(matcher);
        self
    }

    /// Add labels that must be equal.
    #[must_use]
    pub fn equal<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equal.extend(labels.into_iter().map(Into::into));
        self
    }
}

/// An inhibit rule owned by a configuration.
#[derive(Debug, Clone)]
pub struct InhibitRule {
    node: NodePath,
    source_matchers: Vec<Matcher>,
    target_matchers: Vec<Matcher>,
    equal: Vec<String>,
}

impl InhibitRule {
    pub(crate) fn new(node: NodePath, options: InhibitRuleOptions) -> Self {
        Self {
            node,
            source_matchers: options.source_matchers,
            target_matchers: options.target_matchers,
            equal: options.equal,
        }
    }

    /// Append a source matcher.
    pub fn add_source_matcher(&mut self, matcher: Matcher) -> &mut Self {
        self.source_matchers.push(matcher);
        self
    }

    /// Append a target matcher.
    pub fn add_target_matcher(&mut self, matcher: Matcher) -> &mut Self {
        self.target_matchers.push(matcher);
        self
    }

    /// Append a label that must be equal.
    pub fn add_equal(&mut self, label: impl Into<String>) -> &mut Self {
        self.equal.push(label.into());
        self
    }

    /// The construct path of this rule.
    #[must_use]
    pub const fn node(&self) -> &NodePath {
        &self.node
    }

    /// The source matchers.
    #[must_use]
    pub fn source_matchers(&self) -> &[Matcher] {
        &self.source_matchers
    }

    /// The target matchers.
    #[must_use]
    pub fn target_matchers(&self) -> &[Matcher] {
        &self.target_matchers
    }

    /// The equal labels.
    #[must_use]
    pub fn equal(&self) -> &[String] {
        &self.equal
    }

    pub(crate) fn render(&self) -> InhibitRuleConfig {
        InhibitRuleConfig {
            target_matchers: self.target_matchers.iter().map(Matcher::expression).collect(),
            source_matchers: self.source_matchers.iter().map(Matcher::expression).collect(),
            equal: self.equal.clone(),
        }
    }
}

impl Validate for InhibitRule {
    fn validate(&self) -> Vec<ValidationFailure> {
        let mut failures = Vec::new();
        if self.source_matchers.is_empty() {
            failures.push(ValidationFailure::new(
                self.node.path(),
                "at least one source matcher is required",
            ));
        }
        if self.target_matchers.is_empty() {
            failures.push(ValidationFailure::new(
                self.node.path(),
                "at least one target matcher is required",
            ));
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node() -> NodePath {
        NodePath::root("Stack").unwrap().child("CriticalInhibits").unwrap()
    }

    #[test]
    fn empty_rule_is_accepted_at_construction() {
        let rule = InhibitRule::new(node(), InhibitRuleOptions::new());
        assert!(rule.source_matchers().is_empty());
        assert!(rule.target_matchers().is_empty());
    }

    #[test]
    fn empty_rule_reports_both_failures() {
        let rule = InhibitRule::new(node(), InhibitRuleOptions::new());
        let failures = rule.validate();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].message.contains("source matcher"));
        assert!(failures[1].message.contains("target matcher"));
        assert_eq!(failures[0].path, "Stack/CriticalInhibits");
    }

    #[test]
    fn missing_target_only() {
        let rule = InhibitRule::new(
            node(),
            InhibitRuleOptions::new().source_matcher(Matcher::equals("severity", "critical")),
        );
        let failures = rule.validate();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("target matcher"));
    }

    #[test]
    fn matchers_added_later_satisfy_validation() {
        let mut rule = InhibitRule::new(node(), InhibitRuleOptions::new());
        rule.add_source_matcher(Matcher::equals("severity", "critical"))
            .add_target_matcher(Matcher::equals("severity", "warning"));
        assert!(rule.validate().is_empty());
    }

    #[test]
    fn render_keeps_order_and_equal_labels() {
        let mut rule = InhibitRule::new(
            node(),
            InhibitRuleOptions::new()
                .source_matcher(Matcher::equals("severity", "critical"))
                .target_matcher(Matcher::equals("severity", "warning"))
                .target_matcher(Matcher::from_string("team=~\"ops|sre\""))
                .equal(["alertname"]),
        );
        rule.add_equal("cluster");

        assert_eq!(
            serde_json::to_value(rule.render()).unwrap(),
            json!({
                "target_matchers": ["severity = \"warning\"", "team=~\"ops|sre\""],
                "source_matchers": ["severity = \"critical\""],
                "equal": ["alertname", "cluster"]
            })
        );
    }
}
