//! Rendering of the routing tree against resolved names.

use crate::error::{AlertManagerError, Result};
use crate::matcher::Matcher;
use crate::receiver::ReceiverHandle;
use crate::route::{Route, format_duration};
use crate::schema::RouteConfig;
use crate::time_interval::TimeIntervalHandle;

/// Names of a configuration's receivers and time interval groups, indexed
/// the same way as the handles that point at them.
#[derive(Debug)]
pub(crate) struct NameTable {
    owner: u64,
    receivers: Vec<String>,
    time_intervals: Vec<String>,
}

impl NameTable {
    pub(crate) const fn new(owner: u64, receivers: Vec<String>, time_intervals: Vec<String>) -> Self {
        Self {
            owner,
            receivers,
            time_intervals,
        }
    }

    pub(crate) fn receiver(&self, handle: ReceiverHandle) -> Result<&str> {
        lookup(self.owner, &self.receivers, "receiver", handle.owner, handle.index)
    }

    pub(crate) fn time_interval(&self, handle: TimeIntervalHandle) -> Result<&str> {
        lookup(
            self.owner,
            &self.time_intervals,
            "time interval",
            handle.owner,
            handle.index,
        )
    }
}

fn lookup<'a>(
    owner: u64,
    names: &'a [String],
    kind: &'static str,
    handle_owner: u64,
    index: usize,
) -> Result<&'a str> {
    if handle_owner != owner {
        return Err(AlertManagerError::UnknownReference { kind, index });
    }
    names
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| AlertManagerError::UnknownReference { kind, index })
}

/// Render `route` and its descendants, depth first in insertion order.
pub(crate) fn render_route(route: &Route, names: &NameTable) -> Result<RouteConfig> {
    let receiver = route
        .receiver
        .map(|handle| names.receiver(handle).map(str::to_string))
        .transpose()?;

    let active_time_intervals = route
        .active_time_intervals
        .iter()
        .map(|handle| names.time_interval(*handle).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;
    let mute_time_intervals = route
        .mute_time_intervals
        .iter()
        .map(|handle| names.time_interval(*handle).map(str::to_string))
        .collect::<Result<Vec<_>>>()?;

    let routes = route
        .children()
        .iter()
        .map(|child| render_route(child, names))
        .collect::<Result<Vec<_>>>()?;

    Ok(RouteConfig {
        receiver,
        group_by: route.group_by.clone(),
        continue_matching: route.continue_matching,
        matchers: route.matchers.iter().map(Matcher::expression).collect(),
        group_wait: route.group_wait.map(format_duration),
        group_interval: route.group_interval.map(format_duration),
        repeat_interval: route.repeat_interval.map(format_duration),
        mute_time_intervals,
        active_time_intervals,
        routes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::RouteOptions;
    use construct_core::NodePath;
    use serde_json::json;
    use std::time::Duration;

    const OWNER: u64 = 11;

    fn receiver(index: usize) -> ReceiverHandle {
        ReceiverHandle {
            owner: OWNER,
            index,
        }
    }

    fn interval(index: usize) -> TimeIntervalHandle {
        TimeIntervalHandle {
            owner: OWNER,
            index,
        }
    }

    fn names() -> NameTable {
        NameTable::new(
            OWNER,
            vec!["default".to_string(), "pager".to_string()],
            vec!["business-hours".to_string(), "weekends".to_string()],
        )
    }

    fn root(options: RouteOptions) -> Route {
        let node = NodePath::root("Stack").unwrap().child("Route").unwrap();
        Route::root(node, receiver(0), options).unwrap()
    }

    #[test]
    fn minimal_root() {
        let config = render_route(&root(RouteOptions::new()), &names()).unwrap();
        assert_eq!(serde_json::to_value(config).unwrap(), json!({"receiver": "default"}));
    }

    #[test]
    fn root_with_grouping_and_timing() {
        let route = root(
            RouteOptions::new()
                .group_by(["alertname", "cluster"])
                .group_wait(Duration::from_secs(30))
                .group_interval(Duration::from_secs(15 * 60))
                .repeat_interval(Duration::from_secs(12 * 60 * 60)),
        );
        assert_eq!(
            serde_json::to_value(render_route(&route, &names()).unwrap()).unwrap(),
            json!({
                "receiver": "default",
                "group_by": ["alertname", "cluster"],
                "group_wait": "30s",
                "group_interval": "900s",
                "repeat_interval": "43200s"
            })
        );
    }

    #[test]
    fn child_routes_render_in_order_with_references() {
        let mut route = root(RouteOptions::new());
        route
            .add_child(
                "Pager",
                RouteOptions::new()
                    .receiver(receiver(1))
                    .matcher(Matcher::equals("severity", "critical"))
                    .continue_matching(true)
                    .active_time_interval(interval(0)),
            )
            .unwrap();
        route
            .add_child(
                "Quiet",
                RouteOptions::new()
                    .matcher(Matcher::equals("severity", "info"))
                    .mute_time_interval(interval(1)),
            )
            .unwrap();

        assert_eq!(
            serde_json::to_value(render_route(&route, &names()).unwrap()).unwrap(),
            json!({
                "receiver": "default",
                "routes": [
                    {
                        "receiver": "pager",
                        "continue": true,
                        "matchers": ["severity = \"critical\""],
                        "active_time_intervals": ["business-hours"]
                    },
                    {
                        "matchers": ["severity = \"info\""],
                        "mute_time_intervals": ["weekends"]
                    }
                ]
            })
        );
    }

    #[test]
    fn foreign_receiver_handle_is_rejected() {
        let foreign = ReceiverHandle {
            owner: OWNER + 1,
            index: 0,
        };
        let mut route = root(RouteOptions::new());
        route
            .add_child("Elsewhere", RouteOptions::new().receiver(foreign))
            .unwrap();
        assert!(matches!(
            render_route(&route, &names()),
            Err(AlertManagerError::UnknownReference { kind: "receiver", .. })
        ));
    }

    #[test]
    fn out_of_range_time_interval_is_rejected() {
        let mut route = root(RouteOptions::new());
        route
            .add_child("Muted", RouteOptions::new().mute_time_interval(interval(5)))
            .unwrap();
        assert!(matches!(
            render_route(&route, &names()),
            Err(AlertManagerError::UnknownReference {
                kind: "time interval",
                index: 5
            })
        ));
    }
}
