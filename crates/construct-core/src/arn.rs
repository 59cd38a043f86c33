//! Amazon Resource Name parsing and formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConstructError, Result};

/// The components of an ARN: `arn:partition:service:region:account:resource`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arn {
    /// Partition, e.g. `aws` or `aws-cn`.
    pub partition: String,
    /// Service namespace, e.g. `sns`.
    pub service: String,
    /// Region, empty for global resources.
    pub region: String,
    /// Account id, empty for some resource types.
    pub account: String,
    /// Resource part, everything after the account.
    pub resource: String,
}

impl Arn {
    /// Number of `:`-separated sections in an ARN.
    const SECTIONS: usize = 6;

    /// Build an ARN from its components.
    #[must_use]
    pub fn new(
        partition: impl Into<String>,
        service: impl Into<String>,
        region: impl Into<String>,
        account: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            partition: partition.into(),
            service: service.into(),
            region: region.into(),
            account: account.into(),
            resource: resource.into(),
        }
    }

    /// Parse an ARN string.
    ///
    /// The resource section may itself contain `:`.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::InvalidArn` if the string does not start with
    /// `arn:`, has fewer than six sections, or has an empty partition,
    /// service or resource.
    pub fn parse(arn: &str) -> Result<Self> {
        let sections: Vec<&str> = arn.splitn(Self::SECTIONS, ':').collect();
        let [prefix, partition, service, region, account, resource] = sections.as_slice() else {
            return Err(ConstructError::invalid_arn(
                arn,
                format!("expected {} ':'-separated sections", Self::SECTIONS),
            ));
        };

        if *prefix != "arn" {
            return Err(ConstructError::invalid_arn(arn, "must start with 'arn:'"));
        }
        for (name, value) in [("partition", partition), ("service", service), ("resource", resource)] {
            if value.is_empty() {
                return Err(ConstructError::invalid_arn(arn, format!("{name} cannot be empty")));
            }
        }

        Ok(Self::new(*partition, *service, *region, *account, *resource))
    }
}

impl FromStr for Arn {
    type Err = ConstructError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account, self.resource
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn parse_sns_topic_arn() {
        let arn = Arn::parse("arn:aws:sns:us-east-1:123456789012:test-topic").unwrap();
        assert_eq!(arn.partition, "aws");
        assert_eq!(arn.service, "sns");
        assert_eq!(arn.region, "us-east-1");
        assert_eq!(arn.account, "123456789012");
        assert_eq!(arn.resource, "test-topic");
    }

    #[test]
    fn resource_may_contain_colons() {
        let arn: Arn = "arn:aws:logs:eu-west-1:111122223333:log-group:/my/group:*"
            .parse()
            .unwrap();
        assert_eq!(arn.resource, "log-group:/my/group:*");
    }

    #[test]
    fn global_resources_have_empty_region() {
        let arn = Arn::parse("arn:aws:iam::123456789012:role/admin").unwrap();
        assert_eq!(arn.region, "");
        assert_eq!(arn.resource, "role/admin");
    }

    #[test]
    fn display_round_trips() {
        let text = "arn:aws-cn:sns:cn-north-1:123456789012:alerts";
        assert_eq!(Arn::parse(text).unwrap().to_string(), text);
    }

    #[test_case("" ; "empty")]
    #[test_case("arn:aws:sns" ; "too few sections")]
    #[test_case("urn:aws:sns:us-east-1:123:topic" ; "wrong prefix")]
    #[test_case("arn::sns:us-east-1:123:topic" ; "empty partition")]
    #[test_case("arn:aws::us-east-1:123:topic" ; "empty service")]
    #[test_case("arn:aws:sns:us-east-1:123:" ; "empty resource")]
    fn invalid_arns_are_rejected(text: &str) {
        assert!(matches!(
            Arn::parse(text),
            Err(ConstructError::InvalidArn { .. })
        ));
    }
}
