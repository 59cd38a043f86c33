//! Amazon SNS destinations.

use std::collections::BTreeMap;

use construct_core::{Arn, Bindable, ConstructError, Scope};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::destination::{Destination, DestinationCategory};
use crate::error::{AlertManagerError, Result};

/// Identity attributes for importing an existing SNS topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAttributes {
    /// Full topic ARN.
    pub arn: Option<String>,
    /// Topic name, combined with region and account to build the ARN.
    pub name: Option<String>,
    /// Topic region; defaults to the scope's region.
    pub region: Option<String>,
    /// Topic account; defaults to the scope's account.
    pub account: Option<String>,
}

/// A reference to an SNS topic, resolved when the configuration is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicReference {
    attributes: TopicAttributes,
}

impl TopicReference {
    /// Reference a topic by ARN.
    #[must_use]
    pub fn from_arn(arn: impl Into<String>) -> Self {
        Self {
            attributes: TopicAttributes {
                arn: Some(arn.into()),
                ..TopicAttributes::default()
            },
        }
    }

    /// Reference a topic by name in the binding scope's account and region.
    #[must_use]
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            attributes: TopicAttributes {
                name: Some(name.into()),
                ..TopicAttributes::default()
            },
        }
    }

    /// Reference a topic from its identity attributes.
    ///
    /// Nothing is checked here; a reference with neither ARN nor name fails
    /// when bound.
    #[must_use]
    pub const fn from_attributes(attributes: TopicAttributes) -> Self {
        Self { attributes }
    }

    /// The attributes this reference was created from.
    #[must_use]
    pub const fn attributes(&self) -> &TopicAttributes {
        &self.attributes
    }

    /// Resolve the topic ARN in `scope`.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::MissingIdentity` if neither ARN nor name was
    /// given, or `ConstructError::InvalidArn` if the ARN is malformed.
    pub fn resolve_arn(&self, scope: &Scope) -> std::result::Result<Arn, ConstructError> {
        let attrs = &self.attributes;
        if let Some(arn) = &attrs.arn {
            return Arn::parse(arn);
        }
        let Some(name) = &attrs.name else {
            return Err(ConstructError::missing_identity("SNS topic", &["arn", "name"]));
        };
        Ok(Arn::new(
            scope.partition(),
            "sns",
            attrs.region.as_deref().unwrap_or(scope.region()),
            attrs.account.as_deref().unwrap_or(scope.account()),
            name.as_str(),
        ))
    }
}

/// SigV4 signing settings of an SNS config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigV4Config {
    /// Signing region, taken from the topic ARN.
    pub region: String,
}

/// The rendered `sns_configs` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsConfig {
    /// SNS API endpoint override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Message attributes.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attributes: BTreeMap<String, String>,
    /// Message body template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether resolved alerts are notified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_resolved: Option<bool>,
    /// Request signing.
    pub sigv4: SigV4Config,
    /// Message subject template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Target topic.
    pub topic_arn: String,
}

/// Delivers notifications to an SNS topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnsDestination {
    topic: TopicReference,
    api_url: Option<String>,
    attributes: BTreeMap<String, String>,
    message: Option<String>,
    send_resolved: Option<bool>,
    subject: Option<String>,
}

impl SnsDestination {
    /// Create a destination for `topic`.
    #[must_use]
    pub fn new(topic: TopicReference) -> Self {
        Self {
            topic,
            api_url: None,
            attributes: BTreeMap::new(),
            message: None,
            send_resolved: None,
            subject: None,
        }
    }

    /// Set the SNS API URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the message template.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set the subject template.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set whether resolved alerts are sent.
    #[must_use]
    pub const fn with_send_resolved(mut self, send_resolved: bool) -> Self {
        self.send_resolved = Some(send_resolved);
        self
    }

    /// Add a message attribute.
    ///
    /// Adding a key again with the same value is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::ConflictingAttribute` if `key` is already
    /// set to a different value.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<&mut Self> {
        let key = key.into();
        let value = value.into();

        if let Some(existing) = self.attributes.get(&key) {
            if *existing != value {
                return Err(AlertManagerError::ConflictingAttribute {
                    key,
                    existing: existing.clone(),
                    value,
                });
            }
            warn!(key = %key, "attribute re-added with identical value, ignoring");
            return Ok(self);
        }

        self.attributes.insert(key, value);
        Ok(self)
    }

    /// The topic reference.
    #[must_use]
    pub const fn topic(&self) -> &TopicReference {
        &self.topic
    }

    /// The message attributes.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Render the typed config for `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the topic reference cannot be resolved.
    pub fn render(&self, scope: &Scope) -> Result<SnsConfig> {
        let arn = self.topic.resolve_arn(scope)?;
        Ok(SnsConfig {
            api_url: self.api_url.clone(),
            attributes: self.attributes.clone(),
            message: self.message.clone(),
            send_resolved: self.send_resolved,
            sigv4: SigV4Config {
                region: arn.region.clone(),
            },
            subject: self.subject.clone(),
            topic_arn: arn.to_string(),
        })
    }
}

impl Bindable for SnsDestination {
    type Error = AlertManagerError;

    fn bind(&self, scope: &Scope) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.render(scope)?)?)
    }
}

impl Destination for SnsDestination {
    fn category(&self) -> DestinationCategory {
        DestinationCategory::SNS
    }
}
