#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Centralized constants for the key grammar and the built-in vocabulary.
pub mod constants;
/// Hybrid key composition, parsing, and non-throwing validation.
pub mod key;
/// Shared type aliases.
pub mod types;
/// Indicator record validation against declared schemas.
pub mod validator;
/// Vocabulary registry and override loading.
pub mod vocab;

mod errors;

pub use errors::{KeyError, SchemaError, VocabLoadError};
pub use key::{DimensionCodes, HybridKey, KeyCheck, compose, parse, validate};
pub use types::{CommentText, DimensionCode, FieldName, Generation};
pub use validator::{
    FieldSpec, FieldType, IndicatorValidator, Schema, SchemaValidationError, ValidationMode,
    ValidationResult, Violation,
};
pub use vocab::{Dimension, VocabOverride, Vocabulary};
