//! Builder registry with alias resolution.
//!
//! This module defines the registry that maps canonical type names to
//! builders and aliases to canonical type names. Both maps share one
//! namespace: every name is claimed by at most one builder.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::builder::{BuilderDecorator, TypeBuilder};
use crate::error::FixtureError;

/// A bundle of type builders keyed by canonical type and alias.
///
/// Registries are cheap to assemble and merge, so related builders can be
/// grouped and handed to a [`Fixture`](crate::Fixture) together.
///
/// # Example
///
/// ```
/// use mixtape::{BuilderRegistry, FnTypeBuilder};
/// use serde_json::json;
///
/// let mut registry = BuilderRegistry::new();
/// registry
///     .add(FnTypeBuilder::new("CardNumber", |_| Ok(json!({"value": "4111"}))).with_aliases(["CardDigits"]))
///     .expect("first registration succeeds");
///
/// assert!(registry.get("CardDigits").is_some());
/// assert!(registry.get("Unknown").is_none());
/// ```
#[derive(Default)]
pub struct BuilderRegistry {
    builders: HashMap<String, Rc<dyn TypeBuilder>>,
    aliases: HashMap<String, String>,
    decorators: Vec<BuilderDecorator>,
}

impl BuilderRegistry {
    /// Creates an empty registry that stores builders undecorated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry that wraps every added builder with
    /// `decorators`, the first entry innermost.
    #[must_use]
    pub fn with_decorators(decorators: Vec<BuilderDecorator>) -> Self {
        Self {
            decorators,
            ..Self::default()
        }
    }

    /// Adds a builder.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::DuplicateType`] if the builder's type name is
    /// already claimed, or [`FixtureError::DuplicateAlias`] if one of its
    /// aliases is. A rejected builder leaves the registry unchanged.
    pub fn add(&mut self, builder: impl TypeBuilder + 'static) -> Result<&mut Self, FixtureError> {
        self.add_shared(Rc::new(builder))
    }

    /// Adds a builder that may also be registered elsewhere.
    ///
    /// # Errors
    ///
    /// Same as [`BuilderRegistry::add`].
    pub fn add_shared(&mut self, builder: Rc<dyn TypeBuilder>) -> Result<&mut Self, FixtureError> {
        self.ensure_unclaimed(builder.as_ref())?;
        Ok(self.insert_unclaimed(builder))
    }

    /// Decorates and stores a builder whose names the caller knows to be
    /// free.
    pub(crate) fn insert_unclaimed(&mut self, builder: Rc<dyn TypeBuilder>) -> &mut Self {
        let decorated = self
            .decorators
            .iter()
            .fold(builder, |inner, decorate| decorate(inner));
        let type_name = decorated.type_name().to_owned();

        for alias in decorated.aliases() {
            self.aliases.insert(alias.clone(), type_name.clone());
        }
        debug!(
            type_name = %type_name,
            aliases = ?decorated.aliases(),
            "registered type builder"
        );
        self.builders.insert(type_name, decorated);
        self
    }

    fn ensure_unclaimed(&self, builder: &dyn TypeBuilder) -> Result<(), FixtureError> {
        let type_name = builder.type_name();
        if self.builders.contains_key(type_name) || self.aliases.contains_key(type_name) {
            return Err(FixtureError::DuplicateType {
                type_name: type_name.to_owned(),
            });
        }

        for (index, alias) in builder.aliases().iter().enumerate() {
            let repeated = builder.aliases().iter().take(index).any(|a| a == alias);
            let existing_type = if alias == type_name || repeated {
                Some(type_name)
            } else if self.builders.contains_key(alias) {
                Some(alias.as_str())
            } else {
                self.aliases.get(alias).map(String::as_str)
            };

            if let Some(owner) = existing_type {
                return Err(FixtureError::DuplicateAlias {
                    alias: alias.clone(),
                    existing_type: owner.to_owned(),
                });
            }
        }

        Ok(())
    }

    /// Resolves a canonical type name or alias to its builder.
    #[must_use]
    pub fn get(&self, type_or_alias: &str) -> Option<Rc<dyn TypeBuilder>> {
        self.builders
            .get(type_or_alias)
            .or_else(|| {
                self.aliases
                    .get(type_or_alias)
                    .and_then(|type_name| self.builders.get(type_name))
            })
            .cloned()
    }

    /// Returns `true` if `type_or_alias` resolves to a builder.
    #[must_use]
    pub fn contains(&self, type_or_alias: &str) -> bool {
        self.builders.contains_key(type_or_alias) || self.aliases.contains_key(type_or_alias)
    }

    /// Removes the builder for a canonical type and every alias pointing at
    /// it.
    ///
    /// Removing by alias or removing an unknown type does nothing.
    pub fn remove(&mut self, type_name: &str) -> &mut Self {
        if self.builders.remove(type_name).is_some() {
            self.aliases.retain(|_, owner| owner != type_name);
            debug!(type_name, "removed type builder");
        }
        self
    }

    /// Adds every builder from `other`, one at a time.
    ///
    /// # Errors
    ///
    /// Returns the first collision as [`BuilderRegistry::add`] would. Builders
    /// merged before the collision stay registered.
    ///
    /// Builders arrive as `other` stores them, already decorated, and are
    /// decorated again here. Merging a guarded registry into a guarded one
    /// therefore stacks guards; each layer still rejects the same names.
    pub fn merge(&mut self, other: &Self) -> Result<&mut Self, FixtureError> {
        for builder in other.builders() {
            self.add_shared(builder)?;
        }
        Ok(self)
    }

    /// Removes all builders and aliases. Decorators are kept.
    pub fn clear(&mut self) {
        self.builders.clear();
        self.aliases.clear();
    }

    /// Returns a snapshot of the stored builders in unspecified order.
    #[must_use]
    pub fn builders(&self) -> Vec<Rc<dyn TypeBuilder>> {
        self.builders.values().cloned().collect()
    }

    /// Returns the number of registered builders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Returns `true` if no builders are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&String> = self.builders.keys().collect();
        types.sort();
        f.debug_struct("BuilderRegistry")
            .field("types", &types)
            .field("aliases", &self.aliases)
            .field("decorators", &self.decorators.len())
            .finish()
    }
}
