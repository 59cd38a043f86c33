//! Construct node identity.
//!
//! Every construct lives at a [`NodePath`]: the ordered list of ids from the
//! stack down to the construct itself. Two identifiers are derived from the
//! path, and both are pure functions of it so repeated synthesis of the same
//! tree yields the same names:
//!
//! - [`NodePath::unique_id`]: a human-readable id made of the alphanumeric
//!   characters of each component followed by an 8-character hash suffix.
//! - [`NodePath::addr`]: a fixed-length address, `c8` followed by 40 hex
//!   characters of the path hash.

use std::collections::HashSet;
use std::fmt;

use crate::error::{ConstructError, Result};

/// Separator between path components.
pub const PATH_SEPARATOR: char = '/';

/// Number of hash characters appended by [`NodePath::unique_id`].
const UNIQUE_ID_HASH_LEN: usize = 8;

/// Number of hash characters in [`NodePath::addr`] after the prefix.
const ADDR_HASH_LEN: usize = 40;

/// Prefix of every construct address.
const ADDR_PREFIX: &str = "c8";

/// The location of a construct in the construct tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath {
    components: Vec<String>,
}

impl NodePath {
    /// Create a top-level path.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::InvalidId` if `id` is empty or contains `/`.
    pub fn root(id: impl Into<String>) -> Result<Self> {
        let id = validate_id(id.into())?;
        Ok(Self {
            components: vec![id],
        })
    }

    /// Create the path of a child construct.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::InvalidId` if `id` is empty or contains `/`.
    pub fn child(&self, id: impl Into<String>) -> Result<Self> {
        let id = validate_id(id.into())?;
        let mut components = self.components.clone();
        components.push(id);
        Ok(Self { components })
    }

    /// The id of the construct itself (the last component).
    #[must_use]
    pub fn id(&self) -> &str {
        self.components.last().map_or("", String::as_str)
    }

    /// All path components, outermost first.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Number of components in the path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// The full path joined with `/`.
    #[must_use]
    pub fn path(&self) -> String {
        self.components.join("/")
    }

    /// A stable, human-readable unique id for this path.
    ///
    /// Single-component paths are returned unchanged. Longer paths join the
    /// alphanumeric characters of every component and append the first
    /// eight characters of the path hash, upper-cased.
    #[must_use]
    pub fn unique_id(&self) -> String {
        if let [only] = self.components.as_slice() {
            return only.clone();
        }

        let human: String = self
            .components
            .iter()
            .flat_map(|c| c.chars().filter(char::is_ascii_alphanumeric))
            .collect();
        let hash = self.hash_hex();

        format!(
            "{human}{}",
            hash[..UNIQUE_ID_HASH_LEN].to_ascii_uppercase()
        )
    }

    /// A stable, fixed-length address for this path.
    #[must_use]
    pub fn addr(&self) -> String {
        let hash = self.hash_hex();
        format!("{ADDR_PREFIX}{}", &hash[..ADDR_HASH_LEN])
    }

    fn hash_hex(&self) -> String {
        blake3::hash(self.path().as_bytes()).to_hex().to_string()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

fn validate_id(id: String) -> Result<String> {
    if id.is_empty() {
        return Err(ConstructError::invalid_id(id, "ids cannot be empty"));
    }
    if id.contains(PATH_SEPARATOR) {
        return Err(ConstructError::invalid_id(
            id,
            format!("ids cannot contain '{PATH_SEPARATOR}'"),
        ));
    }
    Ok(id)
}

/// Tracks the ids already used by the children of one construct.
#[derive(Debug, Clone, Default)]
pub struct ChildIds {
    ids: HashSet<String>,
}

impl ChildIds {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `id` under `parent` and return the child's path.
    ///
    /// # Errors
    ///
    /// Returns `ConstructError::DuplicateId` if a sibling already uses `id`,
    /// or `ConstructError::InvalidId` if `id` is malformed.
    pub fn claim(&mut self, parent: &NodePath, id: impl Into<String>) -> Result<NodePath> {
        let id = id.into();
        let path = parent.child(id.clone())?;
        if !self.ids.insert(id.clone()) {
            return Err(ConstructError::DuplicateId {
                id,
                parent: parent.path(),
            });
        }
        Ok(path)
    }

    /// Returns true if `id` is already in use.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of claimed ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no ids have been claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
