//! Error types for the mixtape crate.
//!
//! This module defines semantic error enums for builder registration, value
//! creation, generator construction and settings parsing, following the
//! project's error handling conventions with `thiserror`.

use thiserror::Error;

/// Errors raised while registering builders or creating values.
///
/// Every variant is raised synchronously at the point of detection and
/// propagates unchanged to the caller of the top-level creation call. No
/// partial value is ever returned alongside one of these errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// A builder for the canonical type (or an alias with that name) is
    /// already registered.
    #[error("builder for type '{type_name}' already exists")]
    DuplicateType {
        /// The type name that collided.
        type_name: String,
    },

    /// An alias is already taken by another builder's type or alias.
    #[error("builder for type '{existing_type}' also contains alias '{alias}'")]
    DuplicateAlias {
        /// The alias that collided.
        alias: String,
        /// The canonical type that already owns the name.
        existing_type: String,
    },

    /// No builder is registered for the requested type or alias.
    #[error("no builder defined for type '{type_name}'")]
    NoBuilderDefined {
        /// The requested type name.
        type_name: String,
    },

    /// A builder requested its own type or alias while building.
    #[error("builder for type '{type_name}' is referencing itself")]
    SelfReference {
        /// The requested type name that resolved back to the builder.
        type_name: String,
    },

    /// A value that must be a JSON object was something else.
    #[error("{subject} must be an object, found {found}")]
    NotAnObject {
        /// What was being checked, such as a type name or "template".
        subject: String,
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// A composer transform targeted a property that is absent or falsy.
    #[error("property '{property}' does not exist on type '{type_name}'")]
    PropertyNotFound {
        /// The property name.
        property: String,
        /// The type being composed.
        type_name: String,
    },

    /// A template leaf is not a type name, single-element array or object.
    #[error("invalid template syntax '{key}: {value}'")]
    InvalidTemplateSyntax {
        /// The template key holding the invalid leaf.
        key: String,
        /// The rendered leaf value.
        value: String,
    },

    /// A created value could not be converted into the requested Rust type.
    #[error("value created for type '{type_name}' cannot be converted: {message}")]
    Conversion {
        /// The type name whose value failed to convert.
        type_name: String,
        /// Description of the deserialization failure.
        message: String,
    },
}

/// Errors that can occur when constructing a value generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// The minimum bound is not strictly below the maximum bound.
    #[error("minimum value must be smaller than maximum value (min {min}, max {max})")]
    InvalidRange {
        /// Requested lower bound.
        min: usize,
        /// Requested upper bound.
        max: usize,
    },
}

/// Errors that can occur when loading fixture settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The settings JSON is malformed or has fields of the wrong type.
    #[error("invalid settings JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// A configured range cannot back a generator.
    #[error("invalid {setting} range: {source}")]
    InvalidRange {
        /// Name of the offending setting.
        setting: &'static str,
        /// Underlying generator error.
        #[source]
        source: GeneratorError,
    },
}
