//! Composable test fixture generation.
//!
//! This crate creates arbitrary test data from registered type builders.
//! Builders are grouped in a [`BuilderRegistry`], handed to a [`Fixture`],
//! and requested by type name or alias. Builders receive the fixture back as
//! a [`FixtureContext`] so they can request the types they are made of.
//!
//! Created values are `serde_json::Value` trees; [`FixtureContextExt`]
//! deserializes them into concrete types.
//!
//! # Example
//!
//! ```
//! use mixtape::{BuilderRegistry, Fixture, FnTypeBuilder};
//! use serde_json::json;
//!
//! let mut cards = BuilderRegistry::new();
//! cards
//!     .add(FnTypeBuilder::new("CardNumber", |context| {
//!         Ok(json!({"value": context.create("string")?}))
//!     }).with_aliases(["CardDigits"]))
//!     .expect("register card number");
//! cards
//!     .add(FnTypeBuilder::new("Card", |context| {
//!         Ok(json!({
//!             "cardNumber": context.create("CardNumber")?,
//!             "maskedCardNumber": context.create("CardDigits")?
//!         }))
//!     }))
//!     .expect("register card");
//!
//! let mut fixture = Fixture::with_primitives();
//! fixture.extend(&cards).expect("no collisions");
//! fixture.freeze("CardDigits").expect("alias freezes");
//!
//! let first = fixture.create("Card").expect("card created");
//! let second = fixture.create("Card").expect("card created");
//! assert_eq!(first["maskedCardNumber"], second["maskedCardNumber"]);
//! assert_ne!(first["cardNumber"], second["cardNumber"]);
//! ```

mod builder;
mod composer;
mod context;
mod error;
mod fixture;
mod generator;
mod guard;
mod injector;
mod primitive;
mod registry;
mod settings;
mod template;
mod value;

pub use builder::{BuilderDecorator, FnTypeBuilder, TypeBuilder};
pub use composer::TypeComposer;
pub use context::{FixtureContext, FixtureContextExt};
pub use error::{FixtureError, GeneratorError, SettingsError};
pub use fixture::Fixture;
pub use generator::{NumberGenerator, StringGenerator, ValueGenerator};
pub use guard::{SelfReferenceGuard, guard_self_reference};
pub use injector::Injector;
pub use primitive::{BooleanBuilder, NullBuilder, NumberBuilder, PrimitiveType, StringBuilder};
pub use registry::BuilderRegistry;
pub use settings::FixtureSettings;
pub use template::ObjectBuilder;
