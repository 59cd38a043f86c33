//! End-to-end binding of structured configurations.

use std::time::Duration;

use construct_alertmanager::{
    AlertManagerConfiguration, AlertManagerConfigurationOptions, AlertManagerDefinition,
    DayOfMonthRange, InhibitRuleOptions, Matcher, MatchOperator, ReceiverOptions, RouteOptions,
    SnsDestination, TemplateContent, TimeIntervalEntry, TimeIntervalOptions, TimeRange,
    TopicReference, Weekday, WeekdayRange, YearRange,
};
use construct_core::{Environment, Scope};
use serde_json::{Value, json};

const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:test-topic";

fn scope() -> Scope {
    Scope::stack("Monitoring", Environment::new("123456789012", "us-east-1")).unwrap()
}

fn sns_options() -> AlertManagerConfigurationOptions {
    AlertManagerConfigurationOptions::new()
        .with_default_destination(SnsDestination::new(TopicReference::from_arn(TOPIC_ARN)))
}

fn config_json(definition: &AlertManagerDefinition) -> Value {
    serde_json::from_str(definition.alertmanager_config().unwrap()).unwrap()
}

#[test]
fn default_sns_receiver() {
    let config = AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    let definition = config.bind(&scope()).unwrap();

    assert_eq!(
        config_json(&definition),
        json!({
            "receivers": [{
                "name": "default",
                "sns_configs": [{
                    "sigv4": {"region": "us-east-1"},
                    "topic_arn": TOPIC_ARN
                }]
            }],
            "route": {"receiver": "default"}
        })
    );
    assert!(definition.template_files().is_none());
}

#[test]
fn root_route_durations_render_in_seconds() {
    let options = sns_options().with_route(
        RouteOptions::new()
            .group_by(["alertname"])
            .group_wait(Duration::from_secs(30))
            .group_interval(Duration::from_secs(15 * 60))
            .repeat_interval(Duration::from_secs(12 * 60 * 60)),
    );
    let config = AlertManagerConfiguration::new(&scope(), "AlertManager", options).unwrap();
    let route = &config_json(&config.bind(&scope()).unwrap())["route"];

    assert_eq!(route["group_wait"], "30s");
    assert_eq!(route["group_interval"], "900s");
    assert_eq!(route["repeat_interval"], "43200s");
    assert_eq!(route["group_by"], json!(["alertname"]));
}

#[test]
fn sub_second_root_duration_is_rejected() {
    let options = sns_options()
        .with_route(RouteOptions::new().group_wait(Duration::from_millis(250)));
    let err = AlertManagerConfiguration::new(&scope(), "AlertManager", options).unwrap_err();
    assert!(err.to_string().contains("group_wait"));
}

#[test]
fn time_intervals_render_ranges() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    let first_week = config
        .add_time_interval(
            "FirstWeek",
            TimeIntervalOptions::new()
                .name("first-week")
                .entry(TimeIntervalEntry::new().days_of_month([DayOfMonthRange::between(1, 7)]))
                .entry(TimeIntervalEntry::new().years([YearRange::single(2050)])),
        )
        .unwrap();
    let business_hours = config
        .add_time_interval(
            "BusinessHours",
            TimeIntervalOptions::new().entry(
                TimeIntervalEntry::new()
                    .weekdays([WeekdayRange::between(Weekday::Monday, Weekday::Friday)])
                    .times([TimeRange::new("09:00", "17:00").unwrap()])
                    .location("Europe/Berlin"),
            ),
        )
        .unwrap();

    let child = config
        .root_route_mut()
        .unwrap()
        .add_child("Office", RouteOptions::new().active_time_interval(business_hours))
        .unwrap();
    child.add_mute_time_interval(first_week).unwrap();

    let business_hours_name = config.time_intervals()[1].name();
    assert!(business_hours_name.starts_with("MonitoringAlertManagerBusinessHours"));

    let rendered = config_json(&config.bind(&scope()).unwrap());
    assert_eq!(
        rendered["time_intervals"],
        json!([
            {
                "name": "first-week",
                "time_intervals": [
                    {"days_of_month": ["1:7"]},
                    {"years": ["2050"]}
                ]
            },
            {
                "name": business_hours_name,
                "time_intervals": [{
                    "times": [{"start_time": "09:00", "end_time": "17:00"}],
                    "weekdays": ["monday:friday"],
                    "location": "Europe/Berlin"
                }]
            }
        ])
    );
    assert_eq!(
        rendered["route"]["routes"][0],
        json!({
            "mute_time_intervals": ["first-week"],
            "active_time_intervals": [business_hours_name]
        })
    );
}

#[test]
fn duplicate_templates_get_sequential_keys() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    let template = TemplateContent::from_string("{{ define \"sns.subject\" }}alert{{ end }}");
    config
        .add_template(template.clone())
        .unwrap()
        .add_template(template)
        .unwrap();

    let addr = config.node().addr();
    let first = format!("tmpl_{addr}_001");
    let second = format!("tmpl_{addr}_002");

    let definition = config.bind(&scope()).unwrap();
    assert_eq!(config_json(&definition)["templates"], json!([first, second]));

    let files = definition.template_files().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[&first], files[&second]);
    assert_eq!(files[&first], "{{ define \"sns.subject\" }}alert{{ end }}");
}

#[test]
fn custom_template_prefix() {
    let mut config = AlertManagerConfiguration::new(
        &scope(),
        "AlertManager",
        sns_options().with_template_prefix("notify"),
    )
    .unwrap();
    config
        .add_template(TemplateContent::from_string("body"))
        .unwrap();
    let definition = config.bind(&scope()).unwrap();
    let key = format!("notify_{}_001", config.node().addr());
    assert!(definition.template_files().unwrap().contains_key(&key));
}

#[test]
fn bind_is_idempotent() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    let pager = config
        .add_receiver("Pager", ReceiverOptions::new())
        .unwrap();
    config
        .root_route_mut()
        .unwrap()
        .add_child(
            "Critical",
            RouteOptions::new()
                .receiver(pager)
                .matcher(Matcher::equals("severity", "critical")),
        )
        .unwrap();
    config
        .add_inhibit_rule(
            "Inhibit",
            InhibitRuleOptions::new()
                .source_matcher(Matcher::equals("severity", "critical"))
                .target_matcher(Matcher::equals("severity", "warning")),
        )
        .unwrap();
    config
        .add_template(TemplateContent::from_string("x"))
        .unwrap();

    let first = config.bind(&scope()).unwrap().to_json().unwrap();
    let second = config.bind(&scope()).unwrap().to_json().unwrap();
    assert_eq!(first, second);
}

#[test]
fn derived_receiver_names_are_stable_across_trees() {
    let build = || {
        let mut config =
            AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
        config
            .add_receiver("Pager", ReceiverOptions::new())
            .unwrap();
        config.bind(&scope()).unwrap().to_json().unwrap()
    };
    assert_eq!(build(), build());
}

#[test]
fn inhibit_rule_without_source_fails_at_bind() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    config
        .add_inhibit_rule(
            "NoSource",
            InhibitRuleOptions::new().target_matcher(Matcher::equals("severity", "warning")),
        )
        .unwrap();

    let err = config.bind(&scope()).unwrap_err();
    assert!(err.is_validation());
    assert!(err.mentions("source matcher"));
    assert!(!err.mentions("target matcher"));
}

#[test]
fn inhibit_rule_without_target_fails_at_bind() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    config
        .add_inhibit_rule(
            "NoTarget",
            InhibitRuleOptions::new().source_matcher(Matcher::equals("severity", "critical")),
        )
        .unwrap();

    let err = config.bind(&scope()).unwrap_err();
    assert!(err.mentions("target matcher"));
    assert!(err.to_string().contains("Monitoring/AlertManager/NoTarget"));
}

#[test]
fn inhibit_rules_render_in_order() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    config
        .add_inhibit_rule(
            "CriticalOverWarning",
            InhibitRuleOptions::new()
                .source_matcher(Matcher::equals("severity", "critical"))
                .target_matcher(Matcher::from_components(
                    "severity",
                    MatchOperator::RegexMatch,
                    "warning|info",
                ))
                .equal(["cluster", "service"]),
        )
        .unwrap();

    let rendered = config_json(&config.bind(&scope()).unwrap());
    assert_eq!(
        rendered["inhibit_rules"],
        json!([{
            "target_matchers": ["severity =~ \"warning|info\""],
            "source_matchers": ["severity = \"critical\""],
            "equal": ["cluster", "service"]
        }])
    );
}

#[test]
fn unresolvable_topic_fails_at_bind() {
    let options = AlertManagerConfigurationOptions::new().with_default_destination(
        SnsDestination::new(TopicReference::from_attributes(Default::default())),
    );
    let config = AlertManagerConfiguration::new(&scope(), "AlertManager", options).unwrap();
    let err = config.bind(&scope()).unwrap_err();
    assert!(err.to_string().contains("SNS topic"));
}

#[test]
fn name_referenced_topic_uses_bind_scope() {
    let options = AlertManagerConfigurationOptions::new()
        .with_default_destination(SnsDestination::new(TopicReference::from_name("alerts")));
    let config = AlertManagerConfiguration::new(&scope(), "AlertManager", options).unwrap();

    let other = Scope::stack("Monitoring", Environment::new("210987654321", "eu-west-1")).unwrap();
    let rendered = config_json(&config.bind(&other).unwrap());
    assert_eq!(
        rendered["receivers"][0]["sns_configs"][0],
        json!({
            "sigv4": {"region": "eu-west-1"},
            "topic_arn": "arn:aws:sns:eu-west-1:210987654321:alerts"
        })
    );
}

#[test]
fn yaml_output_matches_json() {
    let mut config =
        AlertManagerConfiguration::new(&scope(), "AlertManager", sns_options()).unwrap();
    config
        .add_template(TemplateContent::from_string("x"))
        .unwrap();
    let definition = config.bind(&scope()).unwrap();

    let from_yaml: Value = serde_yaml::from_str(&definition.to_yaml().unwrap()).unwrap();
    assert_eq!(from_yaml, definition.to_value().unwrap());
}
