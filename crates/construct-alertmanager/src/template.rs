//! Notification templates registered with a configuration.

use std::fs;
use std::path::Path;

/// Default prefix of generated template keys.
pub const DEFAULT_TEMPLATE_PREFIX: &str = "tmpl";

/// Immutable template text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContent {
    contents: String,
}

impl TemplateContent {
    /// Wrap literal template text.
    #[must_use]
    pub fn from_string(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
        }
    }

    /// Read template text from `path`. The file is read immediately.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self {
            contents: fs::read_to_string(path)?,
        })
    }

    /// The template text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Build the key of the `sequence`-th registered template (1-based).
#[must_use]
pub fn template_key(prefix: &str, owner_addr: &str, sequence: usize) -> String {
    format!("{prefix}_{owner_addr}_{sequence:03}")
}
