//! Random value generators.
//!
//! Generators back the primitive builders and decide how many elements a
//! collection gets when the caller does not say. Each generator owns its own
//! ChaCha8 stream, so a seeded generator always yields the same sequence.

use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::{Builder, Uuid};

use crate::error::GeneratorError;

/// Produces values of type `T` on demand.
///
/// Any `Fn() -> T` closure is a generator, which keeps test doubles short:
///
/// ```
/// use mixtape::ValueGenerator;
///
/// let always_three = || 3_usize;
/// assert_eq!(always_three.generate(), 3);
/// ```
pub trait ValueGenerator<T> {
    /// Produces the next value.
    fn generate(&self) -> T;
}

impl<T, F> ValueGenerator<T> for F
where
    F: Fn() -> T,
{
    fn generate(&self) -> T {
        self()
    }
}

/// Generates numbers uniformly from an inclusive range.
///
/// # Example
///
/// ```
/// use mixtape::{NumberGenerator, ValueGenerator};
///
/// let generator = NumberGenerator::seeded(1, 10, 42).expect("valid range");
/// let value = generator.generate();
/// assert!((1..=10).contains(&value));
/// ```
#[derive(Debug)]
pub struct NumberGenerator {
    min: usize,
    max: usize,
    rng: RefCell<ChaCha8Rng>,
}

impl NumberGenerator {
    /// Creates a generator seeded from the thread-local entropy source.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidRange`] unless `min < max`.
    pub fn new(min: usize, max: usize) -> Result<Self, GeneratorError> {
        ensure_range(min, max)?;
        Ok(Self::from_entropy(min, max))
    }

    /// Creates a deterministic generator from a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidRange`] unless `min < max`.
    pub fn seeded(min: usize, max: usize, seed: u64) -> Result<Self, GeneratorError> {
        ensure_range(min, max)?;
        Ok(Self::from_seed(min, max, seed))
    }

    /// Builds an entropy-seeded generator for bounds already known to hold
    /// `min < max`.
    pub(crate) fn from_entropy(min: usize, max: usize) -> Self {
        Self::with_rng(min, max, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Builds a seeded generator for bounds already known to hold
    /// `min < max`.
    pub(crate) fn from_seed(min: usize, max: usize, seed: u64) -> Self {
        Self::with_rng(min, max, ChaCha8Rng::seed_from_u64(seed))
    }

    const fn with_rng(min: usize, max: usize, rng: ChaCha8Rng) -> Self {
        Self {
            min,
            max,
            rng: RefCell::new(rng),
        }
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }
}

pub(crate) const fn ensure_range(min: usize, max: usize) -> Result<(), GeneratorError> {
    if min >= max {
        return Err(GeneratorError::InvalidRange { min, max });
    }
    Ok(())
}

impl ValueGenerator<usize> for NumberGenerator {
    fn generate(&self) -> usize {
        self.rng.borrow_mut().random_range(self.min..=self.max)
    }
}

/// Generates random version 4 UUID strings.
#[derive(Debug)]
pub struct StringGenerator {
    rng: RefCell<ChaCha8Rng>,
}

impl StringGenerator {
    /// Creates a generator seeded from the thread-local entropy source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::from_rng(&mut rand::rng())),
        }
    }

    /// Creates a deterministic generator from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    fn next_uuid(&self) -> Uuid {
        let bytes: [u8; 16] = self.rng.borrow_mut().random();
        Builder::from_random_bytes(bytes).into_uuid()
    }
}

impl Default for StringGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueGenerator<String> for StringGenerator {
    fn generate(&self) -> String {
        self.next_uuid().to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(3, 2)]
    #[case(0, 0)]
    #[case(5, 5)]
    fn rejects_ranges_without_room(#[case] min: usize, #[case] max: usize) {
        assert_eq!(
            NumberGenerator::new(min, max).map(|_| ()),
            Err(GeneratorError::InvalidRange { min, max })
        );
    }

    #[test]
    fn numbers_stay_within_bounds() {
        let generator = NumberGenerator::seeded(1, 10, 7).expect("valid range");

        for _ in 0..200 {
            let value = generator.generate();
            assert!((1..=10).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn seeded_numbers_are_deterministic() {
        let first = NumberGenerator::seeded(0, 1_000, 2026).expect("valid range");
        let second = NumberGenerator::seeded(0, 1_000, 2026).expect("valid range");

        let left: Vec<usize> = (0..20).map(|_| first.generate()).collect();
        let right: Vec<usize> = (0..20).map(|_| second.generate()).collect();

        assert_eq!(left, right);
    }

    #[test]
    fn exposes_bounds() {
        let generator = NumberGenerator::new(5, 75).expect("valid range");
        assert_eq!(generator.min(), 5);
        assert_eq!(generator.max(), 75);
    }

    #[test]
    fn strings_are_version_four_uuids() {
        let generator = StringGenerator::new();
        let value = generator.generate();
        let parsed = Uuid::parse_str(&value).expect("uuid string");

        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn seeded_strings_are_deterministic_and_distinct() {
        let first = StringGenerator::seeded(11);
        let second = StringGenerator::seeded(11);

        let a = first.generate();
        let b = first.generate();

        assert_eq!(a, second.generate());
        assert_ne!(a, b);
    }

    #[test]
    fn closures_act_as_generators() {
        let generator = || 10_usize;
        assert_eq!(ValueGenerator::<usize>::generate(&generator), 10);
    }
}
