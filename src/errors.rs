use std::io;

use thiserror::Error;

use crate::types::Generation;
use crate::vocab::Dimension;

/// Error type for vocabulary override loading and construction failures.
#[derive(Debug, Error)]
pub enum VocabLoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("override source is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("dimension '{dimension}' has an empty code list")]
    EmptyDimension { dimension: Dimension },
    #[error("dimension '{dimension}' contains a blank code")]
    BlankCode { dimension: Dimension },
    #[error("code '{code}' in dimension '{dimension}' contains a reserved delimiter")]
    ReservedDelimiter { dimension: Dimension, code: String },
    #[error("generation bounds are inverted: min {min} > max {max}")]
    InvertedGenerationBounds { min: Generation, max: Generation },
    #[error("generation_min must be at least 1, got {min}")]
    GenerationMinZero { min: Generation },
    #[error("generation_max {max} does not fit the fixed {width}-digit field")]
    GenerationWidthExceeded { max: Generation, width: usize },
}

/// Error type for hybrid key composition and parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown {dimension} code '{code}'")]
    UnknownCode { dimension: Dimension, code: String },
    #[error("generation {generation} is outside {min}..={max}")]
    GenerationRange {
        generation: Generation,
        min: Generation,
        max: Generation,
    },
    #[error("malformed key: {reason}")]
    ParseFormat { reason: String },
}

/// Error type for structurally unusable indicator schemas.
///
/// Content violations in records never surface here; they are collected in
/// [`ValidationResult`](crate::ValidationResult) instead.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema is not a valid field mapping: {0}")]
    Malformed(#[from] serde_json::Error),
}
