use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::constants::validator::RECORD_FIELD;
use crate::errors::SchemaError;
use crate::types::FieldName;
use crate::vocab::{Dimension, Vocabulary};

/// Expected JSON type of a schema field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// A JSON string.
    String,
    /// A JSON integer (no fractional part).
    Integer,
    /// Any JSON number.
    Number,
    /// A JSON boolean.
    Boolean,
    /// A JSON object (nested mapping).
    Object,
}

impl FieldType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Declared constraints for one indicator field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Whether the field must be present. Checked in both modes.
    #[serde(default)]
    pub required: bool,
    /// Expected JSON type, if constrained.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Enumerated legal values, if constrained.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    /// Inclusive numeric lower bound, if constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive numeric upper bound, if constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Vocabulary dimension whose codes are the legal values, if constrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Dimension>,
    /// Sub-schema for nested object fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Schema>,
}

/// Declared shape of an indicator record: field names mapped to their
/// constraints, in declaration order.
///
/// The schema format is an external contract; this type only consumes it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    /// Per-field constraints, in declaration order.
    pub fields: IndexMap<FieldName, FieldSpec>,
}

impl Schema {
    /// Deserialize a schema from JSON text.
    ///
    /// A schema that does not describe a field mapping is structurally
    /// unusable and is rejected here rather than reported per record.
    pub fn from_json_str(raw: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Deserialize a schema from an already-parsed JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Which guarantee the validator applies, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    /// Full evaluation of every declared constraint.
    Strict,
    /// Reduced guarantee: mapping shape and required-field presence only.
    Fallback,
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Strict => f.write_str("strict"),
            ValidationMode::Fallback => f.write_str("fallback"),
        }
    }
}

/// A single constraint failure, carried inside a [`ValidationResult`] rather
/// than thrown so callers receive every problem at once.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaValidationError {
    #[error("record is not a mapping")]
    NotAMapping,
    #[error("required field is missing")]
    MissingRequired,
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: FieldType,
        found: &'static str,
    },
    #[error("value '{value}' is not one of the allowed values")]
    NotInEnum { value: String },
    #[error("value {value} is below the minimum {minimum}")]
    BelowMinimum { value: f64, minimum: f64 },
    #[error("value {value} is above the maximum {maximum}")]
    AboveMaximum { value: f64, maximum: f64 },
    #[error("'{code}' is not a known {dimension} code")]
    UnknownVocabularyCode { dimension: Dimension, code: String },
}

/// One violation entry: the offending field (dotted for nested fields) and
/// the failed constraint.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    /// Offending field, or [`RECORD_FIELD`] for record-level failures.
    pub field: FieldName,
    /// The constraint that failed.
    pub reason: SchemaValidationError,
}

/// Outcome of validating one record against a schema.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationResult {
    /// The guarantee that was actually applied.
    pub mode: ValidationMode,
    /// Every violation found, in schema declaration order.
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Whether the record passed every check the mode applies.
    pub fn accepted(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether only the reduced fallback guarantee was applied.
    pub fn is_degraded(&self) -> bool {
        self.mode == ValidationMode::Fallback
    }
}

/// Validates indicator records against a declared schema.
///
/// The operating mode is selected once at construction and disclosed on
/// every result, so downstream code can decide whether a degraded check is
/// acceptable.
#[derive(Clone, Debug)]
pub struct IndicatorValidator {
    mode: ValidationMode,
    vocabulary: Option<Vocabulary>,
}

impl IndicatorValidator {
    /// Strict validator consulting the shared default vocabulary for
    /// vocabulary-constrained fields.
    pub fn strict() -> Self {
        Self::strict_with_vocabulary(Vocabulary::default_shared().clone())
    }

    /// Strict validator consulting an explicitly supplied vocabulary.
    pub fn strict_with_vocabulary(vocabulary: Vocabulary) -> Self {
        Self {
            mode: ValidationMode::Strict,
            vocabulary: Some(vocabulary),
        }
    }

    /// Fallback validator: required-field presence and mapping shape only.
    pub fn fallback() -> Self {
        Self {
            mode: ValidationMode::Fallback,
            vocabulary: None,
        }
    }

    /// The mode fixed at construction.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validate `record` against `schema`.
    ///
    /// Pure function of the inputs and the constructed mode; content
    /// violations are always returned, never thrown.
    pub fn validate_indicator(&self, record: &Value, schema: &Schema) -> ValidationResult {
        let mut violations = Vec::new();
        match record.as_object() {
            None => violations.push(Violation {
                field: RECORD_FIELD.to_string(),
                reason: SchemaValidationError::NotAMapping,
            }),
            Some(map) => match self.mode {
                ValidationMode::Strict => self.check_object(map, schema, "", &mut violations),
                ValidationMode::Fallback => check_required_only(map, schema, &mut violations),
            },
        }
        if self.mode == ValidationMode::Fallback {
            warn!(
                violations = violations.len(),
                "applied reduced fallback validation"
            );
        }
        ValidationResult {
            mode: self.mode,
            violations,
        }
    }

    fn check_object(
        &self,
        map: &serde_json::Map<String, Value>,
        schema: &Schema,
        prefix: &str,
        violations: &mut Vec<Violation>,
    ) {
        for (name, spec) in &schema.fields {
            let path = field_path(prefix, name);
            let Some(value) = map.get(name) else {
                if spec.required {
                    violations.push(Violation {
                        field: path,
                        reason: SchemaValidationError::MissingRequired,
                    });
                }
                continue;
            };
            if let Some(expected) = spec.field_type {
                if !expected.matches(value) {
                    violations.push(Violation {
                        field: path,
                        reason: SchemaValidationError::WrongType {
                            expected,
                            found: json_type_name(value),
                        },
                    });
                    // Finer constraints assume the declared type.
                    continue;
                }
            }
            self.check_value(value, spec, &path, violations);
        }
    }

    fn check_value(
        &self,
        value: &Value,
        spec: &FieldSpec,
        path: &str,
        violations: &mut Vec<Violation>,
    ) {
        if let Some(allowed) = &spec.allowed {
            let rendered = scalar_text(value);
            if !allowed.iter().any(|candidate| *candidate == rendered) {
                violations.push(Violation {
                    field: path.to_string(),
                    reason: SchemaValidationError::NotInEnum { value: rendered },
                });
            }
        }
        if let Some(number) = value.as_f64() {
            if let Some(minimum) = spec.minimum {
                if number < minimum {
                    violations.push(Violation {
                        field: path.to_string(),
                        reason: SchemaValidationError::BelowMinimum {
                            value: number,
                            minimum,
                        },
                    });
                }
            }
            if let Some(maximum) = spec.maximum {
                if number > maximum {
                    violations.push(Violation {
                        field: path.to_string(),
                        reason: SchemaValidationError::AboveMaximum {
                            value: number,
                            maximum,
                        },
                    });
                }
            }
        }
        if let (Some(dimension), Some(code)) = (spec.vocabulary, value.as_str()) {
            // Strict validators always carry a vocabulary by construction.
            if let Some(vocabulary) = &self.vocabulary {
                if !vocabulary.contains(dimension, code) {
                    violations.push(Violation {
                        field: path.to_string(),
                        reason: SchemaValidationError::UnknownVocabularyCode {
                            dimension,
                            code: code.to_string(),
                        },
                    });
                }
            }
        }
        if let Some(nested) = &spec.fields {
            match value.as_object() {
                Some(map) => self.check_object(map, nested, path, violations),
                None => violations.push(Violation {
                    field: path.to_string(),
                    reason: SchemaValidationError::WrongType {
                        expected: FieldType::Object,
                        found: json_type_name(value),
                    },
                }),
            }
        }
    }
}

fn check_required_only(
    map: &serde_json::Map<String, Value>,
    schema: &Schema,
    violations: &mut Vec<Violation>,
) {
    for (name, spec) in &schema.fields {
        if spec.required && !map.contains_key(name) {
            violations.push(Violation {
                field: name.clone(),
                reason: SchemaValidationError::MissingRequired,
            });
        }
    }
}

fn field_path(prefix: &str, name: &str) -> FieldName {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::from_json_value(json!({
            "symbol": { "required": true, "type": "string" },
            "direction": { "type": "string", "vocabulary": "direction" },
            "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            "session": { "type": "string", "enum": ["rth", "eth"] },
            "context": {
                "type": "object",
                "fields": {
                    "timeframe": { "required": true, "type": "string" }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn strict_accepts_conforming_record() {
        let validator = IndicatorValidator::strict();
        let record = json!({
            "symbol": "ES",
            "direction": "LONG",
            "confidence": 0.8,
            "session": "rth",
            "context": { "timeframe": "M5" }
        });
        let result = validator.validate_indicator(&record, &schema());
        assert!(result.accepted());
        assert_eq!(result.mode, ValidationMode::Strict);
        assert!(!result.is_degraded());
    }

    #[test]
    fn strict_collects_every_violation() {
        let validator = IndicatorValidator::strict();
        let record = json!({
            "direction": "SIDEWAYS",
            "confidence": 1.5,
            "session": "overnight",
            "context": { }
        });
        let result = validator.validate_indicator(&record, &schema());
        assert!(!result.accepted());
        let reasons: Vec<&SchemaValidationError> =
            result.violations.iter().map(|entry| &entry.reason).collect();
        assert_eq!(result.violations.len(), 5);
        assert!(matches!(reasons[0], SchemaValidationError::MissingRequired));
        assert!(matches!(
            reasons[1],
            SchemaValidationError::UnknownVocabularyCode { .. }
        ));
        assert!(matches!(
            reasons[2],
            SchemaValidationError::AboveMaximum { .. }
        ));
        assert!(matches!(reasons[3], SchemaValidationError::NotInEnum { .. }));
        assert!(matches!(reasons[4], SchemaValidationError::MissingRequired));
        assert_eq!(result.violations[4].field, "context.timeframe");
    }

    #[test]
    fn strict_reports_type_mismatch_once() {
        let validator = IndicatorValidator::strict();
        let record = json!({ "symbol": "ES", "confidence": "high" });
        let result = validator.validate_indicator(&record, &schema());
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].reason,
            SchemaValidationError::WrongType {
                expected: FieldType::Number,
                found: "string"
            }
        );
    }

    #[test]
    fn fallback_checks_required_presence_only() {
        let validator = IndicatorValidator::fallback();
        // Enum, range, and vocabulary constraints are all violated, but the
        // reduced guarantee skips them.
        let record = json!({
            "symbol": "ES",
            "direction": "SIDEWAYS",
            "confidence": 9.0,
            "session": "overnight"
        });
        let result = validator.validate_indicator(&record, &schema());
        assert!(result.accepted());
        assert!(result.is_degraded());

        let missing = json!({ "direction": "LONG" });
        let rejected = validator.validate_indicator(&missing, &schema());
        assert!(!rejected.accepted());
        assert_eq!(rejected.violations[0].field, "symbol");
        assert!(rejected.is_degraded());
    }

    #[test]
    fn non_mapping_record_is_rejected_in_both_modes() {
        let record = json!(["not", "a", "mapping"]);
        for validator in [IndicatorValidator::strict(), IndicatorValidator::fallback()] {
            let result = validator.validate_indicator(&record, &schema());
            assert_eq!(result.violations.len(), 1);
            assert_eq!(
                result.violations[0].reason,
                SchemaValidationError::NotAMapping
            );
        }
    }

    #[test]
    fn malformed_schema_is_a_structural_error() {
        assert!(Schema::from_json_str("[1, 2]").is_err());
        assert!(Schema::from_json_str("{\"f\": {\"bogus\": true}}").is_err());
    }
}
