//! The bind contract between constructs and the template synthesizer.

use serde_json::Value;

use crate::scope::Scope;

/// Something that renders to a plain JSON value when synthesized.
///
/// Binding is a terminal, read-only step: implementations must not mutate
/// the construct, and binding the same unchanged construct twice must yield
/// identical values.
pub trait Bindable {
    /// Error returned when rendering fails.
    type Error: std::error::Error;

    /// Render this construct for `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the construct is invalid or cannot be resolved in
    /// `scope`.
    fn bind(&self, scope: &Scope) -> Result<Value, Self::Error>;
}
