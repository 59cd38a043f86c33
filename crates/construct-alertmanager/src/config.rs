//! The Alertmanager configuration construct.
//!
//! A configuration is either built through the structured API (receivers,
//! a routing tree, inhibit rules, time intervals and templates) or imported
//! from existing file contents. Binding it renders an
//! [`AlertManagerDefinition`] and leaves the configuration untouched, so
//! binding twice yields identical output.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use construct_core::{Bindable, ChildIds, ConstructError, NodePath, Scope, Validator};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::definition::AlertManagerDefinition;
use crate::destination::Destination;
use crate::error::{AlertManagerError, Result};
use crate::inhibit::{InhibitRule, InhibitRuleOptions};
use crate::receiver::{DEFAULT_RECEIVER_NAME, Receiver, ReceiverHandle, ReceiverOptions};
use crate::render::{NameTable, render_route};
use crate::route::{Route, RouteOptions};
use crate::schema::AlertManagerConfigDocument;
use crate::template::{DEFAULT_TEMPLATE_PREFIX, TemplateContent, template_key};
use crate::time_interval::{TimeIntervalGroup, TimeIntervalHandle, TimeIntervalOptions};

/// Construct id of the default receiver.
const DEFAULT_RECEIVER_ID: &str = "DefaultReceiver";
/// Construct id of the root route.
const ROOT_ROUTE_ID: &str = "Route";

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Options for a structured configuration.
#[derive(Debug)]
pub struct AlertManagerConfigurationOptions {
    /// Name of the default receiver.
    pub default_receiver_name: String,
    /// Destinations of the default receiver.
    pub default_destinations: Vec<Box<dyn Destination>>,
    /// Options of the root route.
    pub route: RouteOptions,
    /// Prefix of generated template keys.
    pub template_prefix: String,
}

impl Default for AlertManagerConfigurationOptions {
    fn default() -> Self {
        Self {
            default_receiver_name: DEFAULT_RECEIVER_NAME.to_string(),
            default_destinations: Vec::new(),
            route: RouteOptions::default(),
            template_prefix: DEFAULT_TEMPLATE_PREFIX.to_string(),
        }
    }
}

impl AlertManagerConfigurationOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default receiver name.
    #[must_use]
    pub fn with_default_receiver_name(mut self, name: impl Into<String>) -> Self {
        self.default_receiver_name = name.into();
        self
    }

    /// Add a destination to the default receiver.
    #[must_use]
    pub fn with_default_destination(mut self, destination: impl Destination + 'static) -> Self {
        self.default_destinations.push(Box::new(destination));
        self
    }

    /// Set the root route options.
    #[must_use]
    pub fn with_route(mut self, route: RouteOptions) -> Self {
        self.route = route;
        self
    }

    /// Set the template key prefix.
    #[must_use]
    pub fn with_template_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.template_prefix = prefix.into();
        self
    }
}

#[derive(Debug)]
struct StructuredConfiguration {
    template_prefix: String,
    children: ChildIds,
    receivers: Vec<Receiver>,
    route: Route,
    inhibit_rules: Vec<InhibitRule>,
    time_intervals: Vec<TimeIntervalGroup>,
    templates: Vec<TemplateContent>,
}

#[derive(Debug)]
enum ConfigurationSource {
    Structured(Box<StructuredConfiguration>),
    Definition(String),
    Split {
        config: String,
        templates: BTreeMap<String, String>,
    },
}

/// An Alertmanager configuration.
///
/// # Example
///
/// ```
/// use construct_alertmanager::{
///     AlertManagerConfiguration, AlertManagerConfigurationOptions, Matcher, RouteOptions,
///     SnsDestination, TopicReference,
/// };
/// use construct_core::{Environment, Scope};
///
/// let scope = Scope::stack("Monitoring", Environment::new("123456789012", "us-east-1"))?;
/// let options = AlertManagerConfigurationOptions::new().with_default_destination(
///     SnsDestination::new(TopicReference::from_arn(
///         "arn:aws:sns:us-east-1:123456789012:alerts",
///     )),
/// );
/// let mut config = AlertManagerConfiguration::new(&scope, "AlertManager", options)?;
///
/// config.root_route_mut()?.add_child(
///     "Critical",
///     RouteOptions::new().matcher(Matcher::equals("severity", "critical")),
/// )?;
///
/// let definition = config.bind(&scope)?;
/// assert!(definition.alertmanager_config().unwrap().contains("severity = \\\"critical\\\""));
/// # Ok::<(), construct_alertmanager::AlertManagerError>(())
/// ```
#[derive(Debug)]
pub struct AlertManagerConfiguration {
    node: NodePath,
    owner: u64,
    source: ConfigurationSource,
}

impl AlertManagerConfiguration {
    /// Create a structured configuration under `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid, if the root route options carry
    /// time intervals, or if a root route duration has sub-second precision.
    pub fn new(
        scope: &Scope,
        id: impl Into<String>,
        options: AlertManagerConfigurationOptions,
    ) -> Result<Self> {
        let node = scope.node().child(id)?;
        let owner = NEXT_OWNER.fetch_add(1, Ordering::Relaxed);

        let mut children = ChildIds::new();
        let receiver_node = children.claim(&node, DEFAULT_RECEIVER_ID)?;
        let route_node = children.claim(&node, ROOT_ROUTE_ID)?;

        let default_receiver = Receiver::new(
            receiver_node,
            ReceiverOptions {
                name: Some(options.default_receiver_name),
                destinations: options.default_destinations,
            },
        );
        let route = Route::root(route_node, ReceiverHandle { owner, index: 0 }, options.route)?;

        info!(
            config = %node,
            default_destinations = default_receiver.destinations().len(),
            "created alertmanager configuration"
        );

        Ok(Self {
            node,
            owner,
            source: ConfigurationSource::Structured(Box::new(StructuredConfiguration {
                template_prefix: options.template_prefix,
                children,
                receivers: vec![default_receiver],
                route,
                inhibit_rules: Vec::new(),
                time_intervals: Vec::new(),
                templates: Vec::new(),
            })),
        })
    }

    // ============ Imported Configurations ============

    /// Import a combined definition. The contents are passed through
    /// verbatim when bound.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid.
    pub fn from_definition_string(
        scope: &Scope,
        id: impl Into<String>,
        contents: impl Into<String>,
    ) -> Result<Self> {
        Self::imported(scope, id, ConfigurationSource::Definition(contents.into()))
    }

    /// Import a combined definition from `path`. The file is read
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::Io` if the file cannot be read, or an
    /// error if `id` is invalid.
    pub fn from_definition_file(
        scope: &Scope,
        id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_definition_string(scope, id, contents)
    }

    /// Import a raw Alertmanager configuration and its template files.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid.
    pub fn from_config_string<I, K>(
        scope: &Scope,
        id: impl Into<String>,
        config: impl Into<String>,
        templates: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, TemplateContent)>,
        K: Into<String>,
    {
        let templates = templates
            .into_iter()
            .map(|(name, content)| (name.into(), content.contents().to_string()))
            .collect();
        Self::imported(
            scope,
            id,
            ConfigurationSource::Split {
                config: config.into(),
                templates,
            },
        )
    }

    /// Import a raw Alertmanager configuration from `path`, together with
    /// template files. The file is read immediately.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::Io` if the file cannot be read, or an
    /// error if `id` is invalid.
    pub fn from_config_file<I, K>(
        scope: &Scope,
        id: impl Into<String>,
        path: impl AsRef<Path>,
        templates: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, TemplateContent)>,
        K: Into<String>,
    {
        let config = fs::read_to_string(path)?;
        Self::from_config_string(scope, id, config, templates)
    }

    fn imported(scope: &Scope, id: impl Into<String>, source: ConfigurationSource) -> Result<Self> {
        let node = scope.node().child(id)?;
        info!(config = %node, "imported alertmanager configuration");
        Ok(Self {
            node,
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            source,
        })
    }

    // ============ Structured Building ============

    fn structured(&self) -> Option<&StructuredConfiguration> {
        match &self.source {
            ConfigurationSource::Structured(structured) => Some(&**structured),
            ConfigurationSource::Definition(_) | ConfigurationSource::Split { .. } => None,
        }
    }

    fn structured_mut(&mut self) -> Result<(&NodePath, &mut StructuredConfiguration)> {
        match &mut self.source {
            ConfigurationSource::Structured(structured) => Ok((&self.node, &mut **structured)),
            ConfigurationSource::Definition(_) | ConfigurationSource::Split { .. } => {
                Err(AlertManagerError::ImportedConfiguration {
                    path: self.node.path(),
                })
            }
        }
    }

    /// Add a receiver and return its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid or taken, or if the configuration
    /// was imported.
    pub fn add_receiver(
        &mut self,
        id: impl Into<String>,
        options: ReceiverOptions,
    ) -> Result<ReceiverHandle> {
        let owner = self.owner;
        let (parent, structured) = self.structured_mut()?;
        let node = structured.children.claim(parent, id)?;

        let receiver = Receiver::new(node, options);
        info!(
            receiver = %receiver.name(),
            destinations = receiver.destinations().len(),
            "added receiver"
        );

        let index = structured.receivers.len();
        structured.receivers.push(receiver);
        Ok(ReceiverHandle { owner, index })
    }

    /// The handle of the default receiver.
    #[must_use]
    pub const fn default_receiver(&self) -> ReceiverHandle {
        ReceiverHandle {
            owner: self.owner,
            index: 0,
        }
    }

    /// Look up a receiver for further configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::UnknownReference` for a handle from
    /// another configuration, or an error if the configuration was imported.
    pub fn receiver_mut(&mut self, handle: ReceiverHandle) -> Result<&mut Receiver> {
        let owner = self.owner;
        let (_, structured) = self.structured_mut()?;
        if handle.owner != owner {
            return Err(AlertManagerError::UnknownReference {
                kind: "receiver",
                index: handle.index,
            });
        }
        structured
            .receivers
            .get_mut(handle.index)
            .ok_or(AlertManagerError::UnknownReference {
                kind: "receiver",
                index: handle.index,
            })
    }

    /// Add a time interval group and return its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid or taken, or if the configuration
    /// was imported.
    pub fn add_time_interval(
        &mut self,
        id: impl Into<String>,
        options: TimeIntervalOptions,
    ) -> Result<TimeIntervalHandle> {
        let owner = self.owner;
        let (parent, structured) = self.structured_mut()?;
        let node = structured.children.claim(parent, id)?;

        let group = TimeIntervalGroup::new(node, options);
        info!(
            time_interval = %group.name(),
            entries = group.entries().len(),
            "added time interval"
        );

        let index = structured.time_intervals.len();
        structured.time_intervals.push(group);
        Ok(TimeIntervalHandle { owner, index })
    }

    /// Look up a time interval group for further configuration.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::UnknownReference` for a handle from
    /// another configuration, or an error if the configuration was imported.
    pub fn time_interval_mut(
        &mut self,
        handle: TimeIntervalHandle,
    ) -> Result<&mut TimeIntervalGroup> {
        let owner = self.owner;
        let (_, structured) = self.structured_mut()?;
        if handle.owner != owner {
            return Err(AlertManagerError::UnknownReference {
                kind: "time interval",
                index: handle.index,
            });
        }
        structured
            .time_intervals
            .get_mut(handle.index)
            .ok_or(AlertManagerError::UnknownReference {
                kind: "time interval",
                index: handle.index,
            })
    }

    /// Add an inhibit rule and return it for further configuration.
    ///
    /// Matchers are checked when the configuration is bound, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid or taken, or if the configuration
    /// was imported.
    pub fn add_inhibit_rule(
        &mut self,
        id: impl Into<String>,
        options: InhibitRuleOptions,
    ) -> Result<&mut InhibitRule> {
        let (parent, structured) = self.structured_mut()?;
        let node = structured.children.claim(parent, id)?;

        let rule = InhibitRule::new(node, options);
        info!(
            rule = %rule.node(),
            source_matchers = rule.source_matchers().len(),
            target_matchers = rule.target_matchers().len(),
            "added inhibit rule"
        );

        let index = structured.inhibit_rules.len();
        structured.inhibit_rules.push(rule);
        Ok(&mut structured.inhibit_rules[index])
    }

    /// Look up an inhibit rule by id.
    pub fn inhibit_rule_mut(&mut self, id: &str) -> Option<&mut InhibitRule> {
        match &mut self.source {
            ConfigurationSource::Structured(structured) => structured
                .inhibit_rules
                .iter_mut()
                .find(|rule| rule.node().id() == id),
            ConfigurationSource::Definition(_) | ConfigurationSource::Split { .. } => None,
        }
    }

    /// Register a template. Every registration gets its own key, even for
    /// identical contents.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::ImportedConfiguration` if the
    /// configuration was imported.
    pub fn add_template(&mut self, template: TemplateContent) -> Result<&mut Self> {
        let (_, structured) = self.structured_mut()?;
        structured.templates.push(template);
        Ok(self)
    }

    /// The root route, for adding child routes.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::ImportedConfiguration` if the
    /// configuration was imported.
    pub fn root_route_mut(&mut self) -> Result<&mut Route> {
        let (_, structured) = self.structured_mut()?;
        Ok(&mut structured.route)
    }

    // ============ Introspection ============

    /// The construct path of this configuration.
    #[must_use]
    pub const fn node(&self) -> &NodePath {
        &self.node
    }

    /// Returns true if the configuration was imported from raw contents.
    #[must_use]
    pub const fn is_imported(&self) -> bool {
        !matches!(self.source, ConfigurationSource::Structured(_))
    }

    /// The receivers, default receiver first. Empty for imported
    /// configurations.
    #[must_use]
    pub fn receivers(&self) -> &[Receiver] {
        self.structured().map_or(&[], |s| s.receivers.as_slice())
    }

    /// The inhibit rules.
    #[must_use]
    pub fn inhibit_rules(&self) -> &[InhibitRule] {
        self.structured().map_or(&[], |s| s.inhibit_rules.as_slice())
    }

    /// The time interval groups.
    #[must_use]
    pub fn time_intervals(&self) -> &[TimeIntervalGroup] {
        self.structured().map_or(&[], |s| s.time_intervals.as_slice())
    }

    /// The registered templates.
    #[must_use]
    pub fn templates(&self) -> &[TemplateContent] {
        self.structured().map_or(&[], |s| s.templates.as_slice())
    }

    /// The root route. `None` for imported configurations.
    #[must_use]
    pub fn root_route(&self) -> Option<&Route> {
        self.structured().map(|s| &s.route)
    }

    // ============ Binding ============

    /// Render the definition for `scope`.
    ///
    /// Bind-time validation runs first: every inhibit rule needs source and
    /// target matchers, and receiver and time interval names must be
    /// unique. All failures are reported together.
    ///
    /// # Errors
    ///
    /// Returns a validation error, an unresolvable destination or handle
    /// error, or a serialization error.
    pub fn bind(&self, scope: &Scope) -> Result<AlertManagerDefinition> {
        match &self.source {
            ConfigurationSource::Definition(contents) => {
                debug!(config = %self.node, "binding imported definition");
                Ok(AlertManagerDefinition::Raw(contents.clone()))
            }
            ConfigurationSource::Split { config, templates } => {
                debug!(
                    config = %self.node,
                    templates = templates.len(),
                    "binding imported configuration"
                );
                Ok(AlertManagerDefinition::rendered(config.clone(), templates.clone()))
            }
            ConfigurationSource::Structured(structured) => self.bind_structured(structured, scope),
        }
    }

    fn bind_structured(
        &self,
        structured: &StructuredConfiguration,
        scope: &Scope,
    ) -> Result<AlertManagerDefinition> {
        debug!(config = %self.node, "binding alertmanager configuration");

        self.validate(structured)?;

        let names = NameTable::new(
            self.owner,
            structured.receivers.iter().map(Receiver::name).collect(),
            structured
                .time_intervals
                .iter()
                .map(TimeIntervalGroup::name)
                .collect(),
        );

        let addr = self.node.addr();
        let template_keys: Vec<String> = (1..=structured.templates.len())
            .map(|sequence| template_key(&structured.template_prefix, &addr, sequence))
            .collect();

        let document = AlertManagerConfigDocument {
            receivers: structured
                .receivers
                .iter()
                .map(|receiver| receiver.render(scope))
                .collect::<Result<Vec<_>>>()?,
            route: render_route(&structured.route, &names)?,
            inhibit_rules: structured.inhibit_rules.iter().map(InhibitRule::render).collect(),
            time_intervals: structured
                .time_intervals
                .iter()
                .map(TimeIntervalGroup::render)
                .collect(),
            templates: template_keys.clone(),
        };

        let template_files: BTreeMap<String, String> = template_keys
            .into_iter()
            .zip(&structured.templates)
            .map(|(key, template)| (key, template.contents().to_string()))
            .collect();

        debug!(
            config = %self.node,
            receivers = document.receivers.len(),
            inhibit_rules = document.inhibit_rules.len(),
            time_intervals = document.time_intervals.len(),
            templates = template_files.len(),
            "rendered alertmanager configuration"
        );

        Ok(AlertManagerDefinition::rendered(
            serde_json::to_string(&document)?,
            template_files,
        ))
    }

    fn validate(&self, structured: &StructuredConfiguration) -> Result<()> {
        let mut validator = Validator::new().validate_all(&structured.inhibit_rules);

        let mut receiver_names = HashSet::new();
        for receiver in &structured.receivers {
            let name = receiver.name();
            let message = format!("receiver name '{name}' is used more than once");
            validator = validator.require(receiver.node(), receiver_names.insert(name), message);
        }

        let mut interval_names = HashSet::new();
        for group in &structured.time_intervals {
            let name = group.name();
            if group.entries().is_empty() {
                warn!(time_interval = %name, "time interval has no entries");
            }
            let message = format!("time interval name '{name}' is used more than once");
            validator = validator.require(group.node(), interval_names.insert(name), message);
        }

        if validator.has_errors() {
            debug!(
                config = %self.node,
                errors = validator.error_count(),
                "alertmanager configuration failed validation"
            );
        }
        validator.finish().map_err(ConstructError::from)?;
        Ok(())
    }
}

impl Bindable for AlertManagerConfiguration {
    type Error = AlertManagerError;

    fn bind(&self, scope: &Scope) -> Result<Value> {
        Self::bind(self, scope)?.to_value()
    }
}
