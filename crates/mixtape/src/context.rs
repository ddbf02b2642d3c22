//! The capability surface handed to builders.
//!
//! [`FixtureContext`] is what a builder, composer or template sees of the
//! fixture. Keeping it a trait lets decorators such as the self-reference
//! guard stand between a builder and the real fixture.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::composer::TypeComposer;
use crate::error::FixtureError;
use crate::template::ObjectBuilder;

/// Creation operations available to builders.
pub trait FixtureContext {
    /// Creates one value for a type name or alias.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the type cannot be resolved or any nested
    /// creation fails.
    fn create(&self, type_name: &str) -> Result<Value, FixtureError>;

    /// Creates `size` independent values, or a generated number of them when
    /// `size` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the first [`FixtureError`] raised by any element.
    fn create_many(&self, type_name: &str, size: Option<usize>)
    -> Result<Vec<Value>, FixtureError>;

    /// Starts a [`TypeComposer`] for an object type.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::SelfReference`] when a guarded builder asks to
    /// compose its own type.
    fn build(&self, type_name: &str) -> Result<TypeComposer<'_>, FixtureError>;

    /// Starts an [`ObjectBuilder`] for a template.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotAnObject`] when the template is not a JSON
    /// object, or [`FixtureError::SelfReference`] when a guarded builder's
    /// template names its own type.
    fn from_template(&self, template: Value) -> Result<ObjectBuilder<'_>, FixtureError>;
}

/// Typed convenience methods for every [`FixtureContext`].
///
/// # Example
///
/// ```
/// use mixtape::{Fixture, FixtureContextExt};
///
/// let mut fixture = Fixture::with_primitives();
/// fixture.use_value("Age", 17);
///
/// let age: u8 = fixture.create_as("Age").expect("age converts");
/// assert_eq!(age, 17);
/// ```
pub trait FixtureContextExt: FixtureContext {
    /// Creates one value and deserializes it into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Conversion`] when the value does not fit `T`,
    /// or any creation error.
    fn create_as<T: DeserializeOwned>(&self, type_name: &str) -> Result<T, FixtureError> {
        let value = self.create(type_name)?;
        convert(type_name, value)
    }

    /// Creates many values and deserializes each into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Conversion`] when any value does not fit `T`,
    /// or any creation error.
    fn create_many_as<T: DeserializeOwned>(
        &self,
        type_name: &str,
        size: Option<usize>,
    ) -> Result<Vec<T>, FixtureError> {
        self.create_many(type_name, size)?
            .into_iter()
            .map(|value| convert(type_name, value))
            .collect()
    }
}

impl<C: FixtureContext + ?Sized> FixtureContextExt for C {}

/// Deserializes a created value, attributing failures to `type_name`.
pub(crate) fn convert<T: DeserializeOwned>(
    type_name: &str,
    value: Value,
) -> Result<T, FixtureError> {
    serde_json::from_value(value).map_err(|e| FixtureError::Conversion {
        type_name: type_name.to_owned(),
        message: e.to_string(),
    })
}
