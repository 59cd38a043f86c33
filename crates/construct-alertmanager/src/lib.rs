//! Typed Prometheus Alertmanager configuration constructs for Skyforge.
//!
//! `construct-alertmanager` builds an Alertmanager configuration as a tree of
//! typed objects and renders it, at bind time, into the payload a managed
//! Alertmanager definition expects.
//!
//! # Features
//!
//! - **Matchers**: literal, structured (`label op "value"`, escaped) and
//!   compound expressions
//! - **Receivers**: named bundles of destinations, grouped by category
//!   (`sns_configs`, ...)
//! - **Routes**: a routing tree with matchers, grouping, timing and
//!   active/mute time intervals
//! - **Inhibit Rules**: source/target matcher pairs, checked at bind time
//! - **Time Intervals**: recurring windows rendered to Alertmanager ranges
//! - **Templates**: registered template text with generated, sequential keys
//! - **Imports**: pass-through of existing combined or split definitions
//!
//! # Example
//!
//! ```rust
//! use construct_alertmanager::{
//!     AlertManagerConfiguration, AlertManagerConfigurationOptions, InhibitRuleOptions,
//!     Matcher, ReceiverOptions, RouteOptions, SnsDestination, TemplateContent,
//!     TopicReference,
//! };
//! use construct_core::{Environment, Scope};
//! use std::time::Duration;
//!
//! let scope = Scope::stack("Monitoring", Environment::new("123456789012", "us-east-1"))?;
//!
//! let mut config = AlertManagerConfiguration::new(
//!     &scope,
//!     "AlertManager",
//!     AlertManagerConfigurationOptions::new()
//!         .with_default_destination(SnsDestination::new(TopicReference::from_arn(
//!             "arn:aws:sns:us-east-1:123456789012:alerts",
//!         )))
//!         .with_route(RouteOptions::new().group_wait(Duration::from_secs(30))),
//! )?;
//!
//! // Page on critical alerts through a dedicated receiver.
//! let pager = config.add_receiver(
//!     "Pager",
//!     ReceiverOptions::new()
//!         .name("pager")
//!         .destination(SnsDestination::new(TopicReference::from_name("pager"))),
//! )?;
//! config.root_route_mut()?.add_child(
//!     "Critical",
//!     RouteOptions::new()
//!         .receiver(pager)
//!         .matcher(Matcher::equals("severity", "critical")),
//! )?;
//!
//! // Silence warnings while a critical alert for the same cluster fires.
//! config.add_inhibit_rule(
//!     "CriticalInhibitsWarning",
//!     InhibitRuleOptions::new()
//!         .source_matcher(Matcher::equals("severity", "critical"))
//!         .target_matcher(Matcher::equals("severity", "warning"))
//!         .equal(["cluster"]),
//! )?;
//!
//! config.add_template(TemplateContent::from_string(
//!     "{{ define \"sns.message\" }}{{ .CommonAnnotations.summary }}{{ end }}",
//! ))?;
//!
//! let definition = config.bind(&scope)?;
//! assert_eq!(definition.template_files().map(|files| files.len()), Some(1));
//! println!("{}", definition.to_json()?);
//! # Ok::<(), construct_alertmanager::AlertManagerError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod definition;
pub mod destination;
pub mod error;
pub mod inhibit;
pub mod matcher;
pub mod receiver;
mod render;
pub mod route;
pub mod schema;
pub mod sns;
pub mod template;
pub mod time_interval;

// Re-export main types at crate root
pub use config::{AlertManagerConfiguration, AlertManagerConfigurationOptions};
pub use definition::{AlertManagerDefinition, RenderedDefinition};
pub use destination::{Destination, DestinationCategory};
pub use error::{AlertManagerError, Result};
pub use inhibit::{InhibitRule, InhibitRuleOptions};
pub use matcher::{MatchOperator, Matcher};
pub use receiver::{DEFAULT_RECEIVER_NAME, Receiver, ReceiverHandle, ReceiverOptions};
pub use route::{GROUP_BY_ALL, Route, RouteOptions};
pub use sns::{SigV4Config, SnsConfig, SnsDestination, TopicAttributes, TopicReference};
pub use template::{DEFAULT_TEMPLATE_PREFIX, TemplateContent};
pub use time_interval::{
    DayOfMonthRange, IntervalRange, MonthRange, TimeIntervalEntry, TimeIntervalGroup,
    TimeIntervalHandle, TimeIntervalOptions, TimeRange, Weekday, WeekdayRange, YearRange,
};
