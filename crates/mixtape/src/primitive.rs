//! Builders for the primitive JSON types.
//!
//! [`Fixture::with_primitives`](crate::Fixture::with_primitives) registers
//! one builder per [`PrimitiveType`] so templates and custom builders can
//! request `"string"`, `"number"`, `"boolean"` or `"null"` directly.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::builder::TypeBuilder;
use crate::context::FixtureContext;
use crate::error::FixtureError;
use crate::generator::{NumberGenerator, StringGenerator, ValueGenerator};
use crate::registry::BuilderRegistry;

/// Default inclusive bounds for generated numbers.
pub(crate) const NUMBER_RANGE: (usize, usize) = (1, 250);

/// The primitive type names understood by the primitive builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Random UUID strings.
    String,
    /// Random whole numbers.
    Number,
    /// Booleans.
    Boolean,
    /// The JSON `null`.
    Null,
}

impl PrimitiveType {
    /// Every primitive type, in registration order.
    pub const ALL: [Self; 4] = [Self::String, Self::Number, Self::Boolean, Self::Null];

    /// Returns the type name builders are registered under.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds random UUID strings.
#[derive(Debug, Default)]
pub struct StringBuilder {
    generator: StringGenerator,
}

impl StringBuilder {
    /// Creates a builder drawing from `generator`.
    #[must_use]
    pub const fn new(generator: StringGenerator) -> Self {
        Self { generator }
    }
}

impl TypeBuilder for StringBuilder {
    fn type_name(&self) -> &str {
        PrimitiveType::String.as_str()
    }

    fn build(&self, _context: &dyn FixtureContext) -> Result<Value, FixtureError> {
        Ok(Value::String(self.generator.generate()))
    }
}

/// Builds random numbers.
#[derive(Debug)]
pub struct NumberBuilder {
    generator: NumberGenerator,
}

impl NumberBuilder {
    /// Creates a builder drawing from `generator`.
    #[must_use]
    pub const fn new(generator: NumberGenerator) -> Self {
        Self { generator }
    }
}

impl Default for NumberBuilder {
    fn default() -> Self {
        let (min, max) = NUMBER_RANGE;
        Self::new(NumberGenerator::from_entropy(min, max))
    }
}

impl TypeBuilder for NumberBuilder {
    fn type_name(&self) -> &str {
        PrimitiveType::Number.as_str()
    }

    fn build(&self, _context: &dyn FixtureContext) -> Result<Value, FixtureError> {
        Ok(Value::from(self.generator.generate()))
    }
}

/// Builds `true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanBuilder;

impl TypeBuilder for BooleanBuilder {
    fn type_name(&self) -> &str {
        PrimitiveType::Boolean.as_str()
    }

    fn build(&self, _context: &dyn FixtureContext) -> Result<Value, FixtureError> {
        Ok(Value::Bool(true))
    }
}

/// Builds `null`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBuilder;

impl TypeBuilder for NullBuilder {
    fn type_name(&self) -> &str {
        PrimitiveType::Null.as_str()
    }

    fn build(&self, _context: &dyn FixtureContext) -> Result<Value, FixtureError> {
        Ok(Value::Null)
    }
}

/// Stores the four primitive builders in a registry that holds none of the
/// primitive type names yet.
pub(crate) fn register_primitives(
    registry: &mut BuilderRegistry,
    strings: StringBuilder,
    numbers: NumberBuilder,
) {
    registry
        .insert_unclaimed(Rc::new(strings))
        .insert_unclaimed(Rc::new(numbers))
        .insert_unclaimed(Rc::new(BooleanBuilder))
        .insert_unclaimed(Rc::new(NullBuilder));
}
