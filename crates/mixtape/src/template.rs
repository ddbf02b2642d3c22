//! Template-driven object construction.
//!
//! A template is a JSON object whose leaves name types:
//!
//! - a string creates one value of that type;
//! - a single-element array of a string creates many values of that type;
//! - a nested object is interpreted the same way, recursively.
//!
//! Any other leaf is a syntax error.

use std::fmt;

use serde_json::{Map, Value};

use crate::context::FixtureContext;
use crate::error::FixtureError;
use crate::generator::ValueGenerator;
use crate::value::kind_of;

/// Compiles a template into a concrete object.
///
/// # Example
///
/// ```
/// use mixtape::Fixture;
/// use serde_json::json;
///
/// let mut fixture = Fixture::with_primitives();
/// fixture.use_value("Street", "9303 Lyon Drive");
///
/// let person = fixture
///     .from_template(json!({"address": {"street": "Street"}, "nicknames": ["string"]}))
///     .expect("template is an object")
///     .create()
///     .expect("template compiles");
///
/// assert_eq!(person["address"]["street"], json!("9303 Lyon Drive"));
/// assert!(person["nicknames"].is_array());
/// ```
pub struct ObjectBuilder<'a> {
    template: Map<String, Value>,
    context: &'a dyn FixtureContext,
    sizes: &'a dyn ValueGenerator<usize>,
}

impl<'a> ObjectBuilder<'a> {
    /// Creates a builder for `template`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotAnObject`] when the template is not a JSON
    /// object.
    pub fn new(
        template: Value,
        context: &'a dyn FixtureContext,
        sizes: &'a dyn ValueGenerator<usize>,
    ) -> Result<Self, FixtureError> {
        match template {
            Value::Object(map) => Ok(Self {
                template: map,
                context,
                sizes,
            }),
            other => Err(FixtureError::NotAnObject {
                subject: "template".to_owned(),
                found: kind_of(&other),
            }),
        }
    }

    /// Walks the template and creates every leaf through the context.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidTemplateSyntax`] for unsupported leaves
    /// or any error raised while creating a leaf.
    pub fn create(&self) -> Result<Value, FixtureError> {
        self.compile(&self.template).map(Value::Object)
    }

    fn compile(&self, template: &Map<String, Value>) -> Result<Map<String, Value>, FixtureError> {
        template
            .iter()
            .map(|(key, leaf)| Ok((key.clone(), self.compile_leaf(key, leaf)?)))
            .collect()
    }

    fn compile_leaf(&self, key: &str, leaf: &Value) -> Result<Value, FixtureError> {
        match leaf {
            Value::Object(nested) => self.compile(nested).map(Value::Object),
            Value::Array(items) => match items.as_slice() {
                [Value::String(type_name)] => {
                    self.context.create_many(type_name, None).map(Value::Array)
                }
                _ => Err(invalid_syntax(key, leaf)),
            },
            Value::String(type_name) => self.context.create(type_name),
            Value::Null | Value::Bool(_) | Value::Number(_) => Err(invalid_syntax(key, leaf)),
        }
    }

    /// Runs [`ObjectBuilder::create`] `size` times, or a generated number of
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

fn invalid_syntax(key: &str, leaf: &Value) -> FixtureError {
    FixtureError::InvalidTemplateSyntax {
        key: key.to_owned(),
        value: leaf.to_string(),
    }
}

impl fmt::Debug for ObjectBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectBuilder")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::fixture::Fixture;

    #[fixture]
    fn fixture() -> Fixture {
        let mut fixture = Fixture::new(|| 4_usize);
        fixture.use_value("Name", "Marty");
        fixture.use_value("Age", 17);
        fixture
    }

    #[rstest]
    #[case::string(json!("Name"), "string")]
    #[case::array(json!(["Name"]), "array")]
    #[case::number(json!(3), "number")]
    #[case::null(json!(null), "null")]
    fn rejects_non_object_templates(
        fixture: Fixture,
        #[case] template: Value,
        #[case] found: &'static str,
    ) {
        let result = fixture.from_template(template).map(|_| ());

        assert_eq!(
            result,
            Err(FixtureError::NotAnObject {
                subject: "template".to_owned(),
                found,
            })
        );
    }

    #[rstest]
    fn empty_template_creates_empty_object(fixture: Fixture) {
        let value = fixture
            .from_template(json!({}))
            .and_then(|builder| builder.create())
            .expect("compile");

        assert_eq!(value, json!({}));
    }

    #[rstest]
    fn creates_flat_object(fixture: Fixture) {
        let value = fixture
            .from_template(json!({"name": "Name", "age": "Age"}))
            .and_then(|builder| builder.create())
            .expect("compile");

        assert_eq!(value, json!({"name": "Marty", "age": 17}));
    }

    #[rstest]
    fn creates_nested_object_with_arrays(fixture: Fixture) {
        let value = fixture
            .from_template(json!({
                "name": "Name",
                "ages": ["Age"],
                "nested": {"name": "Name", "deeper": {"ages": ["Age"]}}
            }))
            .and_then(|builder| builder.create())
            .expect("compile");

        assert_eq!(
            value,
            json!({
                "name": "Marty",
                "ages": [17, 17, 17, 17],
                "nested": {"name": "Marty", "deeper": {"ages": [17, 17, 17, 17]}}
            })
        );
    }

    #[rstest]
    #[case::empty_array(json!({"ages": []}), "ages", "[]")]
    #[case::two_elements(json!({"ages": ["Age", "Age"]}), "ages", r#"["Age","Age"]"#)]
    #[case::non_string_element(json!({"ages": [3]}), "ages", "[3]")]
    #[case::number(json!({"age": 12}), "age", "12")]
    #[case::boolean(json!({"flag": true}), "flag", "true")]
    #[case::null(json!({"nested": {"gone": null}}), "gone", "null")]
    fn rejects_invalid_leaves(
        fixture: Fixture,
        #[case] template: Value,
        #[case] key: &str,
        #[case] rendered: &str,
    ) {
        let result = fixture
            .from_template(template)
            .and_then(|builder| builder.create());

        assert_eq!(
            result,
            Err(FixtureError::InvalidTemplateSyntax {
                key: key.to_owned(),
                value: rendered.to_owned(),
            })
        );
    }

    #[rstest]
    fn propagates_creation_errors(fixture: Fixture) {
        let result = fixture
            .from_template(json!({"pet": "Dog"}))
            .and_then(|builder| builder.create());

        assert_eq!(
            result,
            Err(FixtureError::NoBuilderDefined {
                type_name: "Dog".to_owned()
            })
        );
    }

    #[rstest]
    fn create_many_repeats_the_template(fixture: Fixture) {
        let builder = fixture
            .from_template(json!({"name": "Name"}))
            .expect("object template");

        assert_eq!(builder.create_many(Some(2)).expect("compile").len(), 2);
        assert_eq!(builder.create_many(None).expect("compile").len(), 4);
    }
}
