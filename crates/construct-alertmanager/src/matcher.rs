//! Label matcher expressions.
//!
//! A [`Matcher`] selects alerts by label. It is built in one of three ways:
//!
//! - [`Matcher::from_string`]: an opaque expression, rendered verbatim
//! - [`Matcher::from_components`]: `label <op> "value"` with the value escaped
//! - [`Matcher::from_compound`]: several matchers rendered as `{e1, e2, ...}`

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{AlertManagerError, Result};

/// Operators supported in label matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOperator {
    /// Label equals the value (`=`).
    #[serde(rename = "=")]
    Equals,
    /// Label does not equal the value (`!=`).
    #[serde(rename = "!=")]
    NotEquals,
    /// Label matches the regular expression (`=~`).
    #[serde(rename = "=~")]
    RegexMatch,
    /// Label does not match the regular expression (`!~`).
    #[serde(rename = "!~")]
    RegexNoMatch,
}

impl MatchOperator {
    /// Returns the operator as its expression symbol.
    #[must_use]
    pub const fn as_symbol(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::RegexMatch => "=~",
            Self::RegexNoMatch => "!~",
        }
    }
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MatcherKind {
    Literal(String),
    Components {
        label: String,
        operator: MatchOperator,
        value: String,
    },
    Compound(Vec<Matcher>),
}

/// A label matcher expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    kind: MatcherKind,
}

impl Matcher {
    /// Wrap an already-written matcher expression. It is rendered unchanged.
    #[must_use]
    pub fn from_string(expression: impl Into<String>) -> Self {
        Self {
            kind: MatcherKind::Literal(expression.into()),
        }
    }

    /// Build `label <operator> "value"`, escaping the value.
    #[must_use]
    pub fn from_components(
        label: impl Into<String>,
        operator: MatchOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: MatcherKind::Components {
                label: label.into(),
                operator,
                value: value.into(),
            },
        }
    }

    /// Shorthand for `label = "value"`.
    #[must_use]
    pub fn equals(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::from_components(label, MatchOperator::Equals, value)
    }

    /// Combine several matchers into one expression.
    ///
    /// A single matcher renders as its own bare expression; two or more
    /// render as `{e1, e2, ...}`.
    ///
    /// # Errors
    ///
    /// Returns `AlertManagerError::EmptyCompoundMatcher` if `matchers` is empty.
    pub fn from_compound(matchers: impl IntoIterator<Item = Self>) -> Result<Self> {
        let matchers: Vec<Self> = matchers.into_iter().collect();
        if matchers.is_empty() {
            return Err(AlertManagerError::EmptyCompoundMatcher);
        }
        Ok(Self {
            kind: MatcherKind::Compound(matchers),
        })
    }

    /// Renders the matcher expression.
    #[must_use]
    pub fn expression(&self) -> String {
        match &self.kind {
            MatcherKind::Literal(expression) => expression.clone(),
            MatcherKind::Components {
                label,
                operator,
                value,
            } => format!("{label} {operator} \"{}\"", escape_value(value)),
            MatcherKind::Compound(matchers) => match matchers.as_slice() {
                [single] => single.expression(),
                many => {
                    let parts: Vec<String> = many.iter().map(Self::expression).collect();
                    format!("{{{}}}", parts.join(", "))
                }
            },
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression())
    }
}

impl Serialize for Matcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.expression())
    }
}

/// Escape a matcher value for use inside double quotes.
///
/// Backslashes are escaped first so the escapes added for quotes and
/// newlines are not escaped again.
#[must_use]
pub fn escape_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
