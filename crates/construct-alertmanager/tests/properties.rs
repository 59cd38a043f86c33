//! Property-based tests for the routing tree and binding.

use construct_alertmanager::{
    AlertManagerConfiguration, AlertManagerConfigurationOptions, Matcher, Route, RouteOptions,
};
use construct_core::{Environment, Scope};
use proptest::prelude::*;
use serde_json::Value;

fn scope() -> Scope {
    Scope::stack("Monitoring", Environment::new("123456789012", "us-east-1")).unwrap()
}

fn rendered_route(config: &AlertManagerConfiguration) -> Value {
    let definition = config.bind(&scope()).unwrap();
    let document: Value = serde_json::from_str(definition.alertmanager_config().unwrap()).unwrap();
    document["route"].clone()
}

fn depth(route: &Value) -> usize {
    route["routes"]
        .as_array()
        .map_or(0, |children| 1 + children.iter().map(depth).max().unwrap_or(0))
}

fn add_chain(route: &mut Route, remaining: usize) {
    if remaining == 0 {
        return;
    }
    let child = route
        .add_child(
            format!("Level{remaining}"),
            RouteOptions::new().matcher(Matcher::equals("level", remaining.to_string())),
        )
        .unwrap();
    add_chain(child, remaining - 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn nested_chain_keeps_depth(levels in 0usize..12) {
        let mut config = AlertManagerConfiguration::new(
            &scope(),
            "AlertManager",
            AlertManagerConfigurationOptions::new(),
        )
        .unwrap();
        add_chain(config.root_route_mut().unwrap(), levels);

        prop_assert_eq!(depth(&rendered_route(&config)), levels);
    }

    #[test]
    fn siblings_keep_insertion_order(labels in prop::collection::vec("[a-z]{1,8}", 1..10)) {
        let mut config = AlertManagerConfiguration::new(
            &scope(),
            "AlertManager",
            AlertManagerConfigurationOptions::new(),
        )
        .unwrap();
        let root = config.root_route_mut().unwrap();
        for (index, label) in labels.iter().enumerate() {
            root.add_child(
                format!("Route{index}"),
                RouteOptions::new().matcher(Matcher::equals("team", label.as_str())),
            )
            .unwrap();
        }

        let route = rendered_route(&config);
        let rendered: Vec<String> = route["routes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|child| child["matchers"][0].as_str().unwrap().to_string())
            .collect();
        let expected: Vec<String> = labels
            .iter()
            .map(|label| format!("team = \"{label}\""))
            .collect();
        prop_assert_eq!(rendered, expected);
    }

    #[test]
    fn bind_twice_is_byte_identical(
        values in prop::collection::vec("[ -~]{0,16}", 0..6),
        group_wait in 0u64..86_400,
    ) {
        let mut config = AlertManagerConfiguration::new(
            &scope(),
            "AlertManager",
            AlertManagerConfigurationOptions::new().with_route(
                RouteOptions::new().group_wait(std::time::Duration::from_secs(group_wait)),
            ),
        )
        .unwrap();
        let root = config.root_route_mut().unwrap();
        for (index, value) in values.iter().enumerate() {
            root.add_child(
                format!("Route{index}"),
                RouteOptions::new().matcher(Matcher::equals("value", value.as_str())),
            )
            .unwrap();
        }

        let first = config.bind(&scope()).unwrap().to_json().unwrap();
        let second = config.bind(&scope()).unwrap().to_json().unwrap();
        prop_assert_eq!(first, second);
    }
}
