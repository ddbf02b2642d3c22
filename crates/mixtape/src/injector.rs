//! Test helper lending a fresh fixture to each test body.

use std::fmt;

use tracing::trace;

use crate::fixture::Fixture;

/// Builds a [`Fixture`] for every test body and resets it afterwards.
///
/// Nothing a body does survives into the next one: builders it registers,
/// values it freezes and overrides it sets all belong to that body's fixture.
/// The fixture is reset even when the body panics.
///
/// # Example
///
/// ```
/// use mixtape::{Fixture, Injector};
///
/// let mut injector = Injector::new(Fixture::with_primitives);
///
/// injector.run(|fixture| {
///     fixture.use_value("Name", "Marty");
///     assert_eq!(fixture.create("Name").expect("override"), "Marty");
/// });
///
/// injector.run(|fixture| assert!(!fixture.is_frozen("Name")));
/// ```
pub struct Injector<F> {
    factory: F,
}

impl<F> Injector<F>
where
    F: Fn() -> Fixture,
{
    /// Creates an injector; `factory` runs once per [`Injector::run`].
    #[must_use]
    pub const fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Runs `body` with a freshly built fixture, then resets it.
    pub fn run<R>(&mut self, body: impl FnOnce(&mut Fixture) -> R) -> R {
        trace!("constructing injected fixture");
        let mut fixture = (self.factory)();
        let guard = ResetOnDrop {
            fixture: &mut fixture,
        };
        body(&mut *guard.fixture)
    }
}

impl<F> fmt::Debug for Injector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injector").finish_non_exhaustive()
    }
}

struct ResetOnDrop<'a> {
    fixture: &'a mut Fixture,
}

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.fixture.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use serde_json::json;

    use super::*;
    use crate::builder::FnTypeBuilder;
    use crate::error::FixtureError;

    fn counting_factory(calls: &Cell<u32>) -> impl Fn() -> Fixture + '_ {
        move || {
            calls.set(calls.get() + 1);
            let mut fixture = Fixture::new(|| 2_usize);
            fixture
                .add(FnTypeBuilder::new("Tick", |_| Ok(json!("tick"))))
                .expect("register tick");
            fixture
        }
    }

    #[test]
    fn constructs_a_fixture_per_body() {
        let calls = Cell::new(0);
        let mut injector = Injector::new(counting_factory(&calls));
        assert_eq!(calls.get(), 0);

        injector.run(|_| ());
        injector.run(|_| ());

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn returns_the_body_result() {
        let calls = Cell::new(0);
        let mut injector = Injector::new(counting_factory(&calls));

        let value = injector.run(|fixture| fixture.create("Tick"));

        assert_eq!(value, Ok(json!("tick")));
    }

    #[test]
    fn overrides_do_not_reach_the_next_body() {
        let calls = Cell::new(0);
        let mut injector = Injector::new(counting_factory(&calls));

        injector.run(|fixture| {
            fixture.use_value("Tick", "frozen");
            assert_eq!(fixture.create("Tick"), Ok(json!("frozen")));
        });

        let after = injector.run(|fixture| fixture.create("Tick"));
        assert_eq!(after, Ok(json!("tick")));
    }

    #[test]
    fn builders_added_by_a_body_do_not_reach_the_next_body() {
        let calls = Cell::new(0);
        let mut injector = Injector::new(counting_factory(&calls));
        let local = || FnTypeBuilder::new("Local", |_| Ok(json!("local")));

        let first = injector.run(|fixture| fixture.add(local()).map(|_| ()));
        let second = injector.run(|fixture| fixture.create("Local"));
        let third = injector.run(|fixture| fixture.add(local()).map(|_| ()));

        assert_eq!(first, Ok(()));
        assert_eq!(
            second,
            Err(FixtureError::NoBuilderDefined {
                type_name: "Local".to_owned()
            })
        );
        assert_eq!(third, Ok(()));
    }

    #[test]
    fn resets_even_when_the_body_panics() {
        let calls = Cell::new(0);
        let mut injector = Injector::new(counting_factory(&calls));

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            injector.run(|fixture| {
                fixture.use_value("Leaked", 1);
                panic!("body failed");
            });
        }));

        assert!(outcome.is_err());
        assert!(!injector.run(|fixture| fixture.is_frozen("Leaked")));
    }
}
