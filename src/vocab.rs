use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::key::{COMMENT_DELIMITER, DIMENSION_DELIMITER, GENERATION_WIDTH};
use crate::constants::vocab as defaults;
use crate::errors::VocabLoadError;
use crate::types::{DimensionCode, Generation};

/// One categorical axis of the reentry vocabulary.
///
/// The variant order is the canonical composition order used by the key
/// codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// How long the reentry window lasted.
    Duration,
    /// Where the reentry sat relative to the triggering event.
    Proximity,
    /// Graded outcome of the reentry.
    Outcome,
    /// Trade direction.
    Direction,
}

impl Dimension {
    /// All dimensions in canonical composition order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Duration,
        Dimension::Proximity,
        Dimension::Outcome,
        Dimension::Direction,
    ];

    /// Lowercase dimension name as used in override sources and schemas.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dimension::Duration => "duration",
            Dimension::Proximity => "proximity",
            Dimension::Outcome => "outcome",
            Dimension::Direction => "direction",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the legal codes per dimension and the generation
/// bounds.
///
/// Constructed once (default table, optionally reshaped by an override
/// source) and treated as read-only afterwards; safe to share across threads
/// without locking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vocabulary {
    codes: IndexMap<Dimension, IndexSet<DimensionCode>>,
    generation_min: Generation,
    generation_max: Generation,
}

impl Vocabulary {
    /// Build the built-in vocabulary.
    pub fn load_default() -> Self {
        let tables: [(Dimension, &[&str]); 4] = [
            (Dimension::Duration, defaults::DEFAULT_DURATION),
            (Dimension::Proximity, defaults::DEFAULT_PROXIMITY),
            (Dimension::Outcome, defaults::DEFAULT_OUTCOME),
            (Dimension::Direction, defaults::DEFAULT_DIRECTION),
        ];
        let codes = tables
            .into_iter()
            .map(|(dimension, table)| {
                (
                    dimension,
                    table.iter().map(|code| code.to_string()).collect(),
                )
            })
            .collect();
        Self {
            codes,
            generation_min: defaults::DEFAULT_GENERATION_MIN,
            generation_max: defaults::DEFAULT_GENERATION_MAX,
        }
    }

    /// Shared process-wide default vocabulary.
    ///
    /// Lazily built on first access; every later caller observes the same
    /// immutable instance.
    pub fn default_shared() -> &'static Vocabulary {
        static DEFAULT: OnceLock<Vocabulary> = OnceLock::new();
        DEFAULT.get_or_init(Vocabulary::load_default)
    }

    /// Build a vocabulary from the defaults reshaped by `source`.
    ///
    /// Merge policy: a dimension listed in the override **replaces** that
    /// dimension's default code set entirely; unlisted dimensions keep the
    /// defaults. `generation_min` and `generation_max` are each individually
    /// overridable.
    pub fn load_with_override(source: &VocabOverride) -> Result<Self, VocabLoadError> {
        let mut vocab = Self::load_default();
        for dimension in Dimension::ALL {
            if let Some(codes) = source.dimension_codes(dimension) {
                debug!(
                    dimension = %dimension,
                    codes = codes.len(),
                    "replacing dimension code set from override"
                );
                vocab.codes.insert(dimension, build_code_set(dimension, codes)?);
            }
        }
        if let Some(min) = source.generation_min {
            vocab.generation_min = min;
        }
        if let Some(max) = source.generation_max {
            vocab.generation_max = max;
        }
        check_generation_bounds(vocab.generation_min, vocab.generation_max)?;
        Ok(vocab)
    }

    /// Read a JSON override source from `path` and build a vocabulary from it.
    ///
    /// The file handle is scoped to the read and released on every exit path,
    /// including malformed-content failures.
    pub fn load_with_override_file(path: impl AsRef<Path>) -> Result<Self, VocabLoadError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let source: VocabOverride = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "loaded vocabulary override source");
        Self::load_with_override(&source)
    }

    /// Whether `code` is legal for `dimension`.
    pub fn contains(&self, dimension: Dimension, code: &str) -> bool {
        self.codes[&dimension].contains(code)
    }

    /// Legal codes for `dimension`, in declaration order.
    pub fn codes(&self, dimension: Dimension) -> &IndexSet<DimensionCode> {
        &self.codes[&dimension]
    }

    /// Inclusive lower generation bound.
    pub fn generation_min(&self) -> Generation {
        self.generation_min
    }

    /// Inclusive upper generation bound.
    pub fn generation_max(&self) -> Generation {
        self.generation_max
    }
}

/// Override source for [`Vocabulary::load_with_override`].
///
/// Mirrors the external JSON contract: dimension names map to replacement
/// code lists, and either generation bound may be overridden. Unknown keys
/// are a load error, not a silent default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VocabOverride {
    /// Replacement duration codes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Vec<DimensionCode>>,
    /// Replacement proximity codes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity: Option<Vec<DimensionCode>>,
    /// Replacement outcome codes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Vec<DimensionCode>>,
    /// Replacement direction codes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Vec<DimensionCode>>,
    /// Replacement lower generation bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_min: Option<Generation>,
    /// Replacement upper generation bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_max: Option<Generation>,
}

impl VocabOverride {
    fn dimension_codes(&self, dimension: Dimension) -> Option<&Vec<DimensionCode>> {
        match dimension {
            Dimension::Duration => self.duration.as_ref(),
            Dimension::Proximity => self.proximity.as_ref(),
            Dimension::Outcome => self.outcome.as_ref(),
            Dimension::Direction => self.direction.as_ref(),
        }
    }
}

fn build_code_set(
    dimension: Dimension,
    codes: &[DimensionCode],
) -> Result<IndexSet<DimensionCode>, VocabLoadError> {
    if codes.is_empty() {
        return Err(VocabLoadError::EmptyDimension { dimension });
    }
    let mut set = IndexSet::new();
    for code in codes {
        if code.trim().is_empty() {
            return Err(VocabLoadError::BlankCode { dimension });
        }
        if code.contains(DIMENSION_DELIMITER) || code.contains(COMMENT_DELIMITER) {
            return Err(VocabLoadError::ReservedDelimiter {
                dimension,
                code: code.clone(),
            });
        }
        if !set.insert(code.clone()) {
            debug!(dimension = %dimension, code = %code, "ignoring duplicate override code");
        }
    }
    Ok(set)
}

fn check_generation_bounds(min: Generation, max: Generation) -> Result<(), VocabLoadError> {
    if min < 1 {
        return Err(VocabLoadError::GenerationMinZero { min });
    }
    if min > max {
        return Err(VocabLoadError::InvertedGenerationBounds { min, max });
    }
    let width_limit = 10u32.pow(GENERATION_WIDTH as u32) - 1;
    if max > width_limit {
        return Err(VocabLoadError::GenerationWidthExceeded {
            max,
            width: GENERATION_WIDTH,
        });
    }
    Ok(())
}
