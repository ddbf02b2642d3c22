//! Self-reference guard for type builders.
//!
//! The guard hands the wrapped builder a checking context instead of the
//! real one. The checking context refuses any request naming the builder's
//! own type or aliases and forwards everything else untouched.
//!
//! Only direct self-reference is caught. Two builders requesting each other
//! recurse until the stack overflows.

use std::rc::Rc;

use serde_json::Value;

use crate::builder::TypeBuilder;
use crate::composer::TypeComposer;
use crate::context::FixtureContext;
use crate::error::FixtureError;
use crate::template::ObjectBuilder;

/// Wraps `builder` in a [`SelfReferenceGuard`].
///
/// This is a [`BuilderDecorator`](crate::BuilderDecorator) and is part of
/// every [`Fixture`](crate::Fixture) registry by default.
#[must_use]
pub fn guard_self_reference(builder: Rc<dyn TypeBuilder>) -> Rc<dyn TypeBuilder> {
    Rc::new(SelfReferenceGuard::new(builder))
}

/// A builder that fails with [`FixtureError::SelfReference`] when the wrapped
/// builder requests its own type while building.
pub struct SelfReferenceGuard {
    decoratee: Rc<dyn TypeBuilder>,
}

impl SelfReferenceGuard {
    /// Wraps a builder.
    #[must_use]
    pub fn new(decoratee: Rc<dyn TypeBuilder>) -> Self {
        Self { decoratee }
    }
}

impl TypeBuilder for SelfReferenceGuard {
    fn type_name(&self) -> &str {
        self.decoratee.type_name()
    }

    fn aliases(&self) -> &[String] {
        self.decoratee.aliases()
    }

    fn build(&self, context: &dyn FixtureContext) -> Result<Value, FixtureError> {
        let checker = ContextCallChecker {
            inner: context,
            building: self.decoratee.as_ref(),
        };
        self.decoratee.build(&checker)
    }
}

struct ContextCallChecker<'a> {
    inner: &'a dyn FixtureContext,
    building: &'a dyn TypeBuilder,
}

impl ContextCallChecker<'_> {
    fn check(&self, requested: &str) -> Result<(), FixtureError> {
        let is_self = self.building.type_name() == requested
            || self.building.aliases().iter().any(|alias| alias == requested);

        if is_self {
            return Err(FixtureError::SelfReference {
                type_name: requested.to_owned(),
            });
        }
        Ok(())
    }
}

impl FixtureContext for ContextCallChecker<'_> {
    fn create(&self, type_name: &str) -> Result<Value, FixtureError> {
        self.check(type_name)?;
        self.inner.create(type_name)
    }

    fn create_many(
        &self,
        type_name: &str,
        size: Option<usize>,
    ) -> Result<Vec<Value>, FixtureError> {
        self.check(type_name)?;
        self.inner.create_many(type_name, size)
    }

    fn build(&self, type_name: &str) -> Result<TypeComposer<'_>, FixtureError> {
        self.check(type_name)?;
        self.inner.build(type_name)
    }

    fn from_template(&self, template: Value) -> Result<ObjectBuilder<'_>, FixtureError> {
        let mut referenced = Vec::new();
        collect_type_names(&template, &mut referenced);
        for type_name in referenced {
            self.check(type_name)?;
        }
        self.inner.from_template(template)
    }
}

/// Gathers every type name a template mentions, at any depth.
fn collect_type_names<'t>(template: &'t Value, names: &mut Vec<&'t str>) {
    let Value::Object(map) = template else {
        return;
    };

    for value in map.values() {
        match value {
            Value::Object(_) => collect_type_names(value, names),
            Value::Array(items) => {
                if let Some(Value::String(name)) = items.first() {
                    names.push(name);
                }
            }
            Value::String(name) => names.push(name),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
}
