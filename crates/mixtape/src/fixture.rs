//! The fixture creation engine.
//!
//! A [`Fixture`] owns a [`BuilderRegistry`], the frozen values installed by
//! [`Fixture::freeze`] and [`Fixture::use_value`], and the generator that
//! decides collection sizes. Builders receive the fixture back as a
//! [`FixtureContext`] and recurse through it to create nested types.
//!
//! Fixtures are single-threaded: builders and generators use shared
//! ownership and interior mutability without locking.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::builder::{BuilderDecorator, TypeBuilder};
use crate::composer::TypeComposer;
use crate::context::FixtureContext;
use crate::error::FixtureError;
use crate::generator::ValueGenerator;
use crate::guard::guard_self_reference;
use crate::primitive::{NumberBuilder, StringBuilder, register_primitives};
use crate::registry::BuilderRegistry;
use crate::settings::FixtureSettings;
use crate::template::ObjectBuilder;

/// Creates values for registered types.
///
/// # Example
///
/// ```
/// use mixtape::{BuilderRegistry, Fixture, FnTypeBuilder};
/// use serde_json::json;
///
/// let mut cards = BuilderRegistry::new();
/// cards
///     .add(FnTypeBuilder::new("Card", |context| {
///         Ok(json!({"owner": context.create("string")?}))
///     }))
///     .expect("register card");
///
/// let mut fixture = Fixture::with_primitives();
/// fixture.extend(&cards).expect("no collisions");
///
/// let card = fixture.create("Card").expect("card created");
/// assert!(card["owner"].is_string());
/// ```
pub struct Fixture {
    registry: BuilderRegistry,
    frozen: HashMap<String, Value>,
    sizes: Box<dyn ValueGenerator<usize>>,
}

impl Fixture {
    /// Creates an empty fixture whose builders are guarded against
    /// requesting their own type.
    ///
    /// `sizes` picks the element count whenever a collection size is not
    /// given.
    #[must_use]
    pub fn new(sizes: impl ValueGenerator<usize> + 'static) -> Self {
        Self::with_decorators(sizes, vec![guard_self_reference])
    }

    /// Creates an empty fixture that wraps added builders with `decorators`
    /// instead of the default self-reference guard.
    #[must_use]
    pub fn with_decorators(
        sizes: impl ValueGenerator<usize> + 'static,
        decorators: Vec<BuilderDecorator>,
    ) -> Self {
        Self {
            registry: BuilderRegistry::with_decorators(decorators),
            frozen: HashMap::new(),
            sizes: Box::new(sizes),
        }
    }

    /// Creates a fixture with the primitive builders registered and
    /// collections sized between 5 and 75 elements.
    #[must_use]
    pub fn with_primitives() -> Self {
        Self::from_settings(&FixtureSettings::default())
    }

    /// Creates a fixture with the primitive builders registered, drawing
    /// sizes, numbers and strings from the generators `settings` describes.
    #[must_use]
    pub fn from_settings(settings: &FixtureSettings) -> Self {
        let mut fixture = Self::new(settings.size_generator());
        register_primitives(
            &mut fixture.registry,
            StringBuilder::new(settings.string_generator()),
            NumberBuilder::new(settings.number_generator()),
        );
        debug!(seed = ?settings.seed(), "created fixture with primitives");
        fixture
    }

    /// Returns the fixture's registry.
    #[must_use]
    pub const fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    /// Registers a single builder.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::DuplicateType`] or
    /// [`FixtureError::DuplicateAlias`] on a name collision.
    pub fn add(&mut self, builder: impl TypeBuilder + 'static) -> Result<&mut Self, FixtureError> {
        self.registry.add(builder)?;
        Ok(self)
    }

    /// Merges every builder from `registry` into the fixture.
    ///
    /// Calls accumulate. A collision stops the merge part-way; builders
    /// merged before it stay registered.
    ///
    /// # Errors
    ///
    /// Returns the first [`FixtureError::DuplicateType`] or
    /// [`FixtureError::DuplicateAlias`] encountered.
    pub fn extend(&mut self, registry: &BuilderRegistry) -> Result<&mut Self, FixtureError> {
        self.registry.merge(registry)?;
        Ok(self)
    }

    /// Alias of [`Fixture::extend`].
    ///
    /// # Errors
    ///
    /// Same as [`Fixture::extend`].
    pub fn customize(&mut self, registry: &BuilderRegistry) -> Result<&mut Self, FixtureError> {
        self.extend(registry)
    }

    /// Creates one value and keeps returning copies of it for `type_name`.
    ///
    /// Freezing an already frozen or overridden name does nothing. The
    /// frozen value is keyed by the requested name, so freezing an alias
    /// leaves its canonical type live.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoBuilderDefined`] when the name does not
    /// resolve, or any error raised while building the value.
    pub fn freeze(&mut self, type_name: &str) -> Result<&mut Self, FixtureError> {
        if self.frozen.contains_key(type_name) {
            return Ok(self);
        }

        let builder = self.resolve(type_name)?;
        let value = builder.build(&*self)?;
        debug!(type_name, "froze type");
        self.frozen.insert(type_name.to_owned(), value);
        Ok(self)
    }

    /// Installs `value` for `type_name`, bypassing any builder.
    ///
    /// The name does not need a registered builder.
    pub fn use_value(&mut self, type_name: &str, value: impl Into<Value>) -> &mut Self {
        debug!(type_name, "installed override value");
        self.frozen.insert(type_name.to_owned(), value.into());
        self
    }

    /// Returns `true` when `type_name` has a frozen or overridden value.
    #[must_use]
    pub fn is_frozen(&self, type_name: &str) -> bool {
        self.frozen.contains_key(type_name)
    }

    /// Creates one value for a type name or alias.
    ///
    /// Frozen and overridden values are returned as deep copies, so mutating
    /// a returned value never affects later creations.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NoBuilderDefined`] when the name does not
    /// resolve, or any error raised while building the value.
    pub fn create(&self, type_name: &str) -> Result<Value, FixtureError> {
        if let Some(frozen) = self.frozen.get(type_name) {
            trace!(type_name, "returning frozen value");
            return Ok(frozen.clone());
        }

        trace!(type_name, "building value");
        self.resolve(type_name)?.build(self)
    }

    /// Creates `size` independent values, or a generated number of values
    /// when `size` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any element.
    pub fn create_many(
        &self,
        type_name: &str,
        size: Option<usize>,
    ) -> Result<Vec<Value>, FixtureError> {
        let count = size.unwrap_or_else(|| self.sizes.generate());
        (0..count).map(|_| self.create(type_name)).collect()
    }

    /// Starts a [`TypeComposer`] for an object type.
    #[must_use]
    pub fn build(&self, type_name: &str) -> TypeComposer<'_> {
        TypeComposer::new(type_name, self, self.sizes.as_ref())
    }

    /// Starts an [`ObjectBuilder`] for a template.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotAnObject`] when the template is not a JSON
    /// object.
    pub fn from_template(&self, template: Value) -> Result<ObjectBuilder<'_>, FixtureError> {
        ObjectBuilder::new(template, self, self.sizes.as_ref())
    }

    /// Forgets every frozen and overridden value. Builders are kept.
    pub fn reset(&mut self) {
        debug!(frozen = self.frozen.len(), "reset fixture");
        self.frozen.clear();
    }

    /// Removes every registered builder. Frozen values are kept.
    pub fn clear_registry(&mut self) {
        self.registry.clear();
    }

    fn resolve(&self, type_name: &str) -> Result<Rc<dyn TypeBuilder>, FixtureError> {
        self.registry
            .get(type_name)
            .ok_or_else(|| FixtureError::NoBuilderDefined {
                type_name: type_name.to_owned(),
            })
    }
}

impl FixtureContext for Fixture {
    fn create(&self, type_name: &str) -> Result<Value, FixtureError> {
        Self::create(self, type_name)
    }

    fn create_many(
        &self,
        type_name: &str,
        size: Option<usize>,
    ) -> Result<Vec<Value>, FixtureError> {
        Self::create_many(self, type_name, size)
    }

    fn build(&self, type_name: &str) -> Result<TypeComposer<'_>, FixtureError> {
        Ok(Self::build(self, type_name))
    }

    fn from_template(&self, template: Value) -> Result<ObjectBuilder<'_>, FixtureError> {
        Self::from_template(self, template)
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut frozen: Vec<&String> = self.frozen.keys().collect();
        frozen.sort();
        f.debug_struct("Fixture")
            .field("registry", &self.registry)
            .field("frozen", &frozen)
            .finish_non_exhaustive()
    }
}
