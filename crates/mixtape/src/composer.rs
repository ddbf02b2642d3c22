//! Builder-pattern customization of created objects.
//!
//! A [`TypeComposer`] records operations and replays them over a freshly
//! created object every time [`TypeComposer::create`] runs.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::context::{FixtureContext, convert};
use crate::error::FixtureError;
use crate::generator::ValueGenerator;
use crate::value::{is_truthy, kind_of};

type Mutation<'a> = Box<dyn Fn(&mut Map<String, Value>) + 'a>;
type Transform<'a> = Box<dyn Fn(Value) -> Value + 'a>;

enum Operation<'a> {
    Apply(Mutation<'a>),
    With {
        property: String,
        transform: Transform<'a>,
    },
    Without(String),
}

/// Creates an object type and applies queued customizations to it.
///
/// Nothing is evaluated until [`TypeComposer::create`]; each call creates a
/// new base object and replays every operation in the order it was queued.
///
/// # Example
///
/// ```
/// use mixtape::Fixture;
/// use serde_json::json;
///
/// let mut fixture = Fixture::with_primitives();
/// fixture.use_value("Contact", json!({"mail": "marty@bttf.now", "phone": "555"}));
///
/// let contact = fixture
///     .build("Contact")
///     .with("mail", |_| json!("doc@bttf.now"))
///     .without("phone")
///     .create()
///     .expect("contact composes");
///
/// assert_eq!(contact, json!({"mail": "doc@bttf.now"}));
/// ```
pub struct TypeComposer<'a> {
    type_name: String,
    context: &'a dyn FixtureContext,
    sizes: &'a dyn ValueGenerator<usize>,
    operations: Vec<Operation<'a>>,
}

impl<'a> TypeComposer<'a> {
    /// Creates a composer for `type_name`; `sizes` picks the element count
    /// for [`TypeComposer::create_many`] when none is given.
    #[must_use]
    pub fn new(
        type_name: impl Into<String>,
        context: &'a dyn FixtureContext,
        sizes: &'a dyn ValueGenerator<usize>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            context,
            sizes,
            operations: Vec::new(),
        }
    }

    /// Queues an in-place mutation of the whole object.
    #[must_use]
    pub fn apply(mut self, action: impl Fn(&mut Map<String, Value>) + 'a) -> Self {
        self.operations.push(Operation::Apply(Box::new(action)));
        self
    }

    /// Queues a replacement of one property computed from its current value.
    ///
    /// When the operation runs, the property must hold a truthy value:
    /// absent, `null`, `false`, `0` and `""` all count as missing and fail
    /// with [`FixtureError::PropertyNotFound`].
    #[must_use]
    pub fn with(
        mut self,
        property: impl Into<String>,
        transform: impl Fn(Value) -> Value + 'a,
    ) -> Self {
        self.operations.push(Operation::With {
            property: property.into(),
            transform: Box::new(transform),
        });
        self
    }

    /// Queues removal of a property. Missing properties are ignored.
    #[must_use]
    pub fn without(mut self, property: impl Into<String>) -> Self {
        self.operations.push(Operation::Without(property.into()));
        self
    }

    /// Creates the base object and applies every queued operation.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotAnObject`] when the type does not produce
    /// an object, [`FixtureError::PropertyNotFound`] when a `with` target is
    /// missing, or any error from creating the base value.
    pub fn create(&self) -> Result<Value, FixtureError> {
        let mut object = match self.context.create(&self.type_name)? {
            Value::Object(map) => map,
            other => {
                return Err(FixtureError::NotAnObject {
                    subject: format!("type '{}'", self.type_name),
                    found: kind_of(&other),
                });
            }
        };

        for operation in &self.operations {
            self.run(operation, &mut object)?;
        }

        Ok(Value::Object(object))
    }

    fn run(
        &self,
        operation: &Operation<'a>,
        object: &mut Map<String, Value>,
    ) -> Result<(), FixtureError> {
        match operation {
            Operation::Apply(action) => action(object),
            Operation::With {
                property,
                transform,
            } => {
                let slot = object
                    .get_mut(property)
                    .filter(|current| is_truthy(current))
                    .ok_or_else(|| FixtureError::PropertyNotFound {
                        property: property.clone(),
                        type_name: self.type_name.clone(),
                    })?;
                let current = std::mem::take(slot);
                *slot = transform(current);
            }
            Operation::Without(property) => {
                object.remove(property);
            }
        }
        Ok(())
    }

    /// Creates and deserializes the composed object.
    ///
    /// # Errors
    ///
    /// Same as [`TypeComposer::create`], plus [`FixtureError::Conversion`].
    pub fn create_as<T: DeserializeOwned>(&self) -> Result<T, FixtureError> {
        convert(&self.type_name, self.create()?)
    }

    /// Runs [`TypeComposer::create`] `size` times, or a generated number of
    /// times when `size` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any run.
    pub fn create_many(&self, size: Option<usize>) -> Result<Vec<Value>, FixtureError> {
        let count = size.unwrap_or_else(|| self.sizes.generate());
        (0..count).map(|_| self.create()).collect()
    }
}

impl fmt::Debug for TypeComposer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeComposer")
            .field("type_name", &self.type_name)
            .field("operations", &self.operations.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::builder::FnTypeBuilder;
    use crate::fixture::Fixture;

    const TYPE: &str = "Profile";

    #[fixture]
    fn fixture() -> Fixture {
        let mut fixture = Fixture::new(|| 3_usize);
        fixture.use_value(
            TYPE,
            json!({
                "name": "Marty",
                "tags": ["a", "b"],
                "address": {"street": "9303 Lyon Drive", "country": "USA"},
                "age": 0,
                "nickname": "",
                "verified": false
            }),
        );
        fixture
    }

    #[rstest]
    fn creates_base_value_from_context(fixture: Fixture) {
        let value = fixture.build(TYPE).create().expect("compose");
        assert_eq!(value["name"], json!("Marty"));
    }

    #[rstest]
    fn apply_mutates_whole_object(fixture: Fixture) {
        let value = fixture
            .build(TYPE)
            .apply(|profile| {
                profile.insert("name".to_owned(), json!("Doc"));
            })
            .apply(|profile| {
                profile.insert("extra".to_owned(), json!(true));
            })
            .create()
            .expect("compose");

        assert_eq!(value["name"], json!("Doc"));
        assert_eq!(value["extra"], json!(true));
    }

    #[rstest]
    fn with_transforms_scalar(fixture: Fixture) {
        let value = fixture
            .build(TYPE)
            .with("name", |name| json!(format!("{}!", name.as_str().unwrap_or_default())))
            .create()
            .expect("compose");

        assert_eq!(value["name"], json!("Marty!"));
    }

    #[rstest]
    fn with_transforms_array(fixture: Fixture) {
        let value = fixture
            .build(TYPE)
            .with("tags", |tags| {
                let mut items = tags.as_array().cloned().unwrap_or_default();
                items.push(json!("c"));
                Value::Array(items)
            })
            .create()
            .expect("compose");

        assert_eq!(value["tags"], json!(["a", "b", "c"]));
    }

    #[rstest]
    fn with_transforms_nested_object(fixture: Fixture) {
        let value = fixture
            .build(TYPE)
            .with("address", |mut address| {
                address["street"] = json!("1640 Riverside Drive");
                address
            })
            .create()
            .expect("compose");

        assert_eq!(
            value["address"],
            json!({"street": "1640 Riverside Drive", "country": "USA"})
        );
    }

    #[rstest]
    fn with_applies_transforms_in_order(fixture: Fixture) {
        let value = fixture
            .build(TYPE)
            .with("name", |_| json!("first"))
            .with("name", |name| {
                json!(format!("{}-second", name.as_str().unwrap_or_default()))
            })
            .create()
            .expect("compose");

        assert_eq!(value["name"], json!("first-second"));
    }

    #[rstest]
    #[case::absent("missing")]
    #[case::zero("age")]
    #[case::empty_string("nickname")]
    #[case::false_flag("verified")]
    fn with_treats_falsy_values_as_missing(fixture: Fixture, #[case] property: &str) {
        let result = fixture.build(TYPE).with(property, |v| v).create();

        assert_eq!(
            result,
            Err(FixtureError::PropertyNotFound {
                property: property.to_owned(),
                type_name: TYPE.to_owned(),
            })
        );
    }

    #[rstest]
    fn without_removes_property(fixture: Fixture) {
        let value = fixture
            .build(TYPE)
            .without("tags")
            .without("not-there")
            .create()
            .expect("compose");

        assert!(value.get("tags").is_none());
        assert!(value.get("name").is_some());
    }

    #[rstest]
    fn with_after_without_fails(fixture: Fixture) {
        let result = fixture
            .build(TYPE)
            .without("name")
            .with("name", |v| v)
            .create();

        assert!(matches!(result, Err(FixtureError::PropertyNotFound { .. })));
    }

    #[rstest]
    #[case(json!("text"), "string")]
    #[case(json!([1, 2]), "array")]
    #[case(json!(null), "null")]
    fn rejects_non_object_types(
        mut fixture: Fixture,
        #[case] value: Value,
        #[case] found: &'static str,
    ) {
        fixture.use_value("Scalar", value);

        let result = fixture.build("Scalar").create();

        assert_eq!(
            result,
            Err(FixtureError::NotAnObject {
                subject: "type 'Scalar'".to_owned(),
                found,
            })
        );
    }

    #[test]
    fn create_reruns_base_creation_each_time() {
        let counter = Cell::new(0_u32);
        let mut fixture = Fixture::new(|| 1_usize);
        fixture
            .add(FnTypeBuilder::new("Ticket", move |_| {
                counter.set(counter.get() + 1);
                Ok(json!({"number": counter.get()}))
            }))
            .expect("register");
        let composer = fixture
            .build("Ticket")
            .with("number", |n| json!(n.as_u64().map(|v| v * 10)));

        let first = composer.create().expect("first");
        let second = composer.create().expect("second");

        assert_eq!(first, json!({"number": 10}));
        assert_eq!(second, json!({"number": 20}));
    }

    #[rstest]
    fn create_many_uses_explicit_size(fixture: Fixture) {
        let values = fixture.build(TYPE).create_many(Some(5)).expect("compose");
        assert_eq!(values.len(), 5);
    }

    #[rstest]
    fn create_many_falls_back_to_generator(fixture: Fixture) {
        let values = fixture.build(TYPE).create_many(None).expect("compose");
        assert_eq!(values.len(), 3);
    }
}
