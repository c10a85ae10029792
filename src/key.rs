use serde::{Deserialize, Serialize};

use crate::constants::key::{
    COMMENT_DELIMITER, DIMENSION_DELIMITER, GENERATION_WIDTH, SEGMENT_COUNT,
};
use crate::errors::KeyError;
use crate::types::{CommentText, DimensionCode, Generation};
use crate::vocab::{Dimension, Vocabulary};

/// One code per vocabulary dimension, in canonical composition order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCodes {
    /// Duration code, e.g. `FLASH`.
    pub duration: DimensionCode,
    /// Proximity code, e.g. `AT_EVENT`.
    pub proximity: DimensionCode,
    /// Outcome code, e.g. `W1`.
    pub outcome: DimensionCode,
    /// Direction code, e.g. `LONG`.
    pub direction: DimensionCode,
}

impl DimensionCodes {
    /// The code supplied for `dimension`.
    pub fn get(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Duration => &self.duration,
            Dimension::Proximity => &self.proximity,
            Dimension::Outcome => &self.outcome,
            Dimension::Direction => &self.direction,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (Dimension, &str)> {
        Dimension::ALL
            .into_iter()
            .map(move |dimension| (dimension, self.get(dimension)))
    }
}

/// A parsed or composed hybrid key.
///
/// Immutable once built; [`render`](HybridKey::render) and
/// [`parse`] are exact inverses for any key accepted by [`compose`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HybridKey {
    /// One code per dimension.
    pub codes: DimensionCodes,
    /// Generation counter.
    pub generation: Generation,
    /// Optional trailing comment, verbatim. `Some("")` (a trailing bare
    /// comment delimiter) is distinct from `None` and survives a round trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<CommentText>,
}

impl HybridKey {
    /// Render the canonical text form without re-validating.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (_, code) in self.codes.iter() {
            out.push_str(code);
            out.push(DIMENSION_DELIMITER);
        }
        out.push_str(&format!(
            "{:0width$}",
            self.generation,
            width = GENERATION_WIDTH
        ));
        if let Some(comment) = &self.comment {
            out.push(COMMENT_DELIMITER);
            out.push_str(comment);
        }
        out
    }
}

/// Validate the supplied fields against `vocabulary` and render them as a
/// hybrid key string.
///
/// Fails fast: the first unknown code yields [`KeyError::UnknownCode`] and an
/// out-of-bounds (or non-renderable) generation yields
/// [`KeyError::GenerationRange`]; no partial key is ever produced.
pub fn compose(
    vocabulary: &Vocabulary,
    codes: &DimensionCodes,
    generation: Generation,
    comment: Option<&str>,
) -> Result<String, KeyError> {
    for (dimension, code) in codes.iter() {
        check_code(vocabulary, dimension, code)?;
    }
    check_generation(vocabulary, generation)?;
    let key = HybridKey {
        codes: codes.clone(),
        generation,
        comment: comment.map(str::to_string),
    };
    Ok(key.render())
}

/// Parse `key` back into a [`HybridKey`], re-validating every extracted code
/// and the generation against `vocabulary`.
///
/// The comment starts at the *first* comment delimiter and is recovered
/// verbatim, so delimiter characters inside the comment region round-trip.
pub fn parse(vocabulary: &Vocabulary, key: &str) -> Result<HybridKey, KeyError> {
    let (head, comment) = split_comment(key);
    let segments = split_segments(head)?;
    let generation = parse_generation(segments[SEGMENT_COUNT - 1])?;
    for (dimension, segment) in Dimension::ALL.into_iter().zip(segments) {
        check_code(vocabulary, dimension, segment)?;
    }
    check_generation(vocabulary, generation)?;
    Ok(HybridKey {
        codes: DimensionCodes {
            duration: segments[0].to_string(),
            proximity: segments[1].to_string(),
            outcome: segments[2].to_string(),
            direction: segments[3].to_string(),
        },
        generation,
        comment: comment.map(str::to_string),
    })
}

/// Outcome of a non-throwing key check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCheck {
    /// Whether the key is well-formed and legal under the vocabulary.
    pub valid: bool,
    /// Every violation found, in grammar order. A shape failure yields a
    /// single [`KeyError::ParseFormat`] entry; a well-shaped key collects all
    /// code and generation violations, not just the first.
    pub errors: Vec<KeyError>,
}

/// Check `key` against `vocabulary` without propagating errors.
pub fn validate(vocabulary: &Vocabulary, key: &str) -> KeyCheck {
    let mut errors = Vec::new();
    let (head, _comment) = split_comment(key);
    match split_segments(head) {
        Err(err) => errors.push(err),
        Ok(segments) => {
            for (dimension, segment) in Dimension::ALL.into_iter().zip(segments) {
                if let Err(err) = check_code(vocabulary, dimension, segment) {
                    errors.push(err);
                }
            }
            match parse_generation(segments[SEGMENT_COUNT - 1]) {
                Err(err) => errors.push(err),
                Ok(generation) => {
                    if let Err(err) = check_generation(vocabulary, generation) {
                        errors.push(err);
                    }
                }
            }
        }
    }
    KeyCheck {
        valid: errors.is_empty(),
        errors,
    }
}

fn split_comment(key: &str) -> (&str, Option<&str>) {
    match key.split_once(COMMENT_DELIMITER) {
        Some((head, comment)) => (head, Some(comment)),
        None => (key, None),
    }
}

fn split_segments(head: &str) -> Result<[&str; SEGMENT_COUNT], KeyError> {
    let parts: Vec<&str> = head.split(DIMENSION_DELIMITER).collect();
    <[&str; SEGMENT_COUNT]>::try_from(parts.as_slice()).map_err(|_| KeyError::ParseFormat {
        reason: format!(
            "expected {SEGMENT_COUNT} '{DIMENSION_DELIMITER}'-separated segments, found {}",
            parts.len()
        ),
    })
}

fn parse_generation(field: &str) -> Result<Generation, KeyError> {
    if field.len() != GENERATION_WIDTH || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(KeyError::ParseFormat {
            reason: format!(
                "generation field '{field}' is not exactly {GENERATION_WIDTH} digits"
            ),
        });
    }
    field.parse().map_err(|_| KeyError::ParseFormat {
        reason: format!("generation field '{field}' is not numeric"),
    })
}

fn check_code(vocabulary: &Vocabulary, dimension: Dimension, code: &str) -> Result<(), KeyError> {
    if vocabulary.contains(dimension, code) {
        Ok(())
    } else {
        Err(KeyError::UnknownCode {
            dimension,
            code: code.to_string(),
        })
    }
}

fn check_generation(vocabulary: &Vocabulary, generation: Generation) -> Result<(), KeyError> {
    let (min, max) = (vocabulary.generation_min(), vocabulary.generation_max());
    let width_limit = 10u32.pow(GENERATION_WIDTH as u32) - 1;
    if generation < min || generation > max || generation > width_limit {
        return Err(KeyError::GenerationRange {
            generation,
            min,
            max,
        });
    }
    Ok(())
}
