//! The bound output of a configuration.

use std::collections::BTreeMap;

use construct_core::{Bindable, Scope};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AlertManagerError, Result};

/// The payload handed to the template synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertManagerDefinition {
    /// An imported combined definition, passed through verbatim.
    Raw(String),
    /// A rendered or split-imported definition.
    Rendered(RenderedDefinition),
}

/// `{alertmanager_config, template_files?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDefinition {
    /// The Alertmanager configuration as a string.
    pub alertmanager_config: String,
    /// Template contents keyed by template name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template_files: Option<BTreeMap<String, String>>,
}

impl AlertManagerDefinition {
    /// Build a rendered definition. An empty template map is omitted.
    #[must_use]
    pub fn rendered(alertmanager_config: String, template_files: BTreeMap<String, String>) -> Self {
        Self::Rendered(RenderedDefinition {
            alertmanager_config,
            template_files: (!template_files.is_empty()).then_some(template_files),
        })
    }

    /// The Alertmanager configuration string, if this is not a raw import.
    #[must_use]
    pub fn alertmanager_config(&self) -> Option<&str> {
        match self {
            Self::Raw(_) => None,
            Self::Rendered(rendered) => Some(&rendered.alertmanager_config),
        }
    }

    /// The template files, if any.
    #[must_use]
    pub fn template_files(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Raw(_) => None,
            Self::Rendered(rendered) => rendered.template_files.as_ref(),
        }
    }

    /// The definition as a JSON value. Raw imports become a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::SerializationError` if serialization fails.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Self::Raw(contents) => Ok(Value::String(contents.clone())),
            Self::Rendered(rendered) => Ok(serde_json::to_value(rendered)?),
        }
    }

    /// The definition as JSON text. Raw imports are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::SerializationError` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        match self {
            Self::Raw(contents) => Ok(contents.clone()),
            Self::Rendered(rendered) => Ok(serde_json::to_string(rendered)?),
        }
    }

    /// The definition as YAML text. Raw imports are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::SerializationError` if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        match self {
            Self::Raw(contents) => Ok(contents.clone()),
            Self::Rendered(rendered) => Ok(serde_yaml::to_string(rendered)?),
        }
    }
}

impl Bindable for AlertManagerDefinition {
    type Error = AlertManagerError;

    fn bind(&self, _scope: &Scope) -> Result<Value> {
        self.to_value()
    }
}
