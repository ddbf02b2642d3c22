//! Fixture settings and JSON parsing.
//!
//! Settings control the generators a primed fixture starts with: how many
//! elements unsized collections get, which numbers the `number` builder
//! draws from, and an optional seed that makes every generated value
//! reproducible.

use serde::Deserialize;

use crate::error::SettingsError;
use crate::generator::{NumberGenerator, StringGenerator, ensure_range};
use crate::primitive::NUMBER_RANGE;

/// Default inclusive bounds for unsized collections.
pub(crate) const COLLECTION_SIZE: (usize, usize) = (5, 75);

/// Validated generator settings for a [`Fixture`](crate::Fixture).
///
/// # Example
///
/// ```
/// use mixtape::{Fixture, FixtureSettings};
///
/// let settings = FixtureSettings::from_json(
///     r#"{"collectionSize": {"min": 1, "max": 3}, "seed": 7}"#,
/// )
/// .expect("valid settings");
///
/// let fixture = Fixture::from_settings(&settings);
/// let names = fixture.create_many("string", None).expect("strings");
/// assert!((1..=3).contains(&names.len()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSettings {
    collection_size: (usize, usize),
    number_range: (usize, usize),
    seed: Option<u64>,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            collection_size: COLLECTION_SIZE,
            number_range: NUMBER_RANGE,
            seed: None,
        }
    }
}

impl FixtureSettings {
    /// Parses settings from a JSON string.
    ///
    /// Every field is optional; missing ranges fall back to `5..=75` for
    /// collection sizes and `1..=250` for numbers.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ParseError`] if the JSON is malformed or has
    /// unknown fields, and [`SettingsError::InvalidRange`] if a range does
    /// not have `min < max`.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let raw: RawFixtureSettings =
            serde_json::from_str(json).map_err(|e| SettingsError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawFixtureSettings) -> Result<Self, SettingsError> {
        let collection_size = raw
            .collection_size
            .map_or(Ok(COLLECTION_SIZE), |range| range.validate("collectionSize"))?;
        let number_range = raw
            .number_range
            .map_or(Ok(NUMBER_RANGE), |range| range.validate("numberRange"))?;

        Ok(Self {
            collection_size,
            number_range,
            seed: raw.seed,
        })
    }

    /// Returns the settings with a fixed seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the inclusive collection size bounds.
    #[must_use]
    pub const fn collection_size(&self) -> (usize, usize) {
        self.collection_size
    }

    /// Returns the inclusive bounds for generated numbers.
    #[must_use]
    pub const fn number_range(&self) -> (usize, usize) {
        self.number_range
    }

    /// Returns the seed, if one is configured.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Creates the generator for unsized collections.
    #[must_use]
    pub fn size_generator(&self) -> NumberGenerator {
        let (min, max) = self.collection_size;
        self.number_generator_for(min, max, 0)
    }

    /// Creates the generator backing the `number` builder.
    #[must_use]
    pub fn number_generator(&self) -> NumberGenerator {
        let (min, max) = self.number_range;
        self.number_generator_for(min, max, 1)
    }

    /// Creates the generator backing the `string` builder.
    #[must_use]
    pub fn string_generator(&self) -> StringGenerator {
        self.stream_seed(2)
            .map_or_else(StringGenerator::new, StringGenerator::seeded)
    }

    fn number_generator_for(&self, min: usize, max: usize, stream: u64) -> NumberGenerator {
        self.stream_seed(stream).map_or_else(
            || NumberGenerator::from_entropy(min, max),
            |seed| NumberGenerator::from_seed(min, max, seed),
        )
    }

    // One seed offset per generator.
    fn stream_seed(&self, stream: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(stream))
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawFixtureSettings {
    collection_size: Option<RawRange>,
    number_range: Option<RawRange>,
    seed: Option<u64>,
}

/// Raw JSON representation of an inclusive range.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRange {
    min: usize,
    max: usize,
}

impl RawRange {
    fn validate(self, setting: &'static str) -> Result<(usize, usize), SettingsError> {
        ensure_range(self.min, self.max)
            .map(|()| (self.min, self.max))
            .map_err(|source| SettingsError::InvalidRange { setting, source })
    }
}
