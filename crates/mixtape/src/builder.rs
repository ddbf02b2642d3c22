//! The type builder capability.
//!
//! A builder knows how to produce a value for one canonical type name and
//! may answer to any number of aliases. Builders receive the creating
//! [`FixtureContext`] so they can request nested types.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::context::FixtureContext;
use crate::error::FixtureError;

/// Produces values for a named type.
pub trait TypeBuilder {
    /// Returns the canonical type name.
    fn type_name(&self) -> &str;

    /// Returns alternate names resolving to this builder.
    fn aliases(&self) -> &[String] {
        &[]
    }

    /// Builds a fresh value, requesting nested types from `context`.
    ///
    /// # Errors
    ///
    /// Returns any [`FixtureError`] raised while building nested values.
    fn build(&self, context: &dyn FixtureContext) -> Result<Value, FixtureError>;
}

/// Wraps a builder at registration time.
///
/// A decorator must keep the wrapped builder's type name and aliases intact.
pub type BuilderDecorator = fn(Rc<dyn TypeBuilder>) -> Rc<dyn TypeBuilder>;

/// A builder backed by a closure.
///
/// # Example
///
/// ```
/// use mixtape::{FnTypeBuilder, TypeBuilder};
/// use serde_json::json;
///
/// let builder = FnTypeBuilder::new("Gender", |_| Ok(json!("MALE")))
///     .with_aliases(["Sex"]);
///
/// assert_eq!(builder.type_name(), "Gender");
/// assert_eq!(builder.aliases(), ["Sex".to_owned()]);
/// ```
pub struct FnTypeBuilder<F> {
    type_name: String,
    aliases: Vec<String>,
    build: F,
}

impl<F> FnTypeBuilder<F> {
    /// Creates a builder for `type_name` with no aliases.
    #[must_use]
    pub fn new(type_name: impl Into<String>, build: F) -> Self
    where
        F: Fn(&dyn FixtureContext) -> Result<Value, FixtureError>,
    {
        Self {
            type_name: type_name.into(),
            aliases: Vec::new(),
            build,
        }
    }

    /// Replaces the builder's aliases.
    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }
}

impl<F> fmt::Debug for FnTypeBuilder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTypeBuilder")
            .field("type_name", &self.type_name)
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

impl<F> TypeBuilder for FnTypeBuilder<F>
where
    F: Fn(&dyn FixtureContext) -> Result<Value, FixtureError>,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn build(&self, context: &dyn FixtureContext) -> Result<Value, FixtureError> {
        (self.build)(context)
    }
}
