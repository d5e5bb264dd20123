//! Compiles stored form schemas into reusable payload validators.
//!
//! A schema is compiled once into a list of [`FieldValidator`]s, one per
//! declared field and tagged by value rule. Validation runs every validator,
//! collects all field errors in schema order, and only yields a
//! [`NormalizedPayload`] when nothing failed.

use aula_core::{FieldErrorCode, FieldErrors};
use serde_json::{Map, Number, Value};

use crate::form::{FieldSpec, FieldType, FormSchema};
use crate::user::is_plausible_email;

/// Type check applied to a present, non-empty value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueRule {
    Scalar,
    Email,
    Numeric,
}

impl From<FieldType> for ValueRule {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::String => Self::Scalar,
            FieldType::Email => Self::Email,
            FieldType::Number => Self::Numeric,
        }
    }
}

/// Validator compiled from one field spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidator {
    name: String,
    required: bool,
    rule: ValueRule,
    max_length: Option<usize>,
}

/// Outcome of a single field check.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Field absent or empty and optional: nothing to check.
    Skipped,
    /// Field valid, kept as submitted.
    Valid,
    /// Field valid after coercion to the contained value.
    Coerced(Value),
    /// Field failed with the contained codes.
    Invalid(Vec<FieldErrorCode>),
}

impl FieldValidator {
    fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name().to_owned(),
            required: spec.is_required(),
            rule: ValueRule::from(spec.field_type()),
            max_length: spec.max_length(),
        }
    }

    /// Returns the field this validator guards.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Checks the value found for this field, if any.
    #[must_use]
    pub fn check(&self, value: Option<&Value>) -> FieldOutcome {
        let Some(value) = value.filter(|value| !is_empty_value(value)) else {
            return if self.required {
                FieldOutcome::Invalid(vec![FieldErrorCode::MissingField])
            } else {
                FieldOutcome::Skipped
            };
        };

        let mut codes = Vec::new();
        let coerced = match self.rule {
            ValueRule::Scalar => {
                if !is_scalar(value) {
                    codes.push(FieldErrorCode::InvalidType);
                }
                None
            }
            ValueRule::Email => {
                if !value.as_str().map(is_plausible_email).unwrap_or(false) {
                    codes.push(FieldErrorCode::InvalidType);
                }
                None
            }
            ValueRule::Numeric => match value {
                Value::Number(_) => None,
                Value::String(text) => {
                    let parsed = parse_number(text);
                    if parsed.is_none() {
                        codes.push(FieldErrorCode::InvalidType);
                    }
                    parsed
                }
                _ => {
                    codes.push(FieldErrorCode::InvalidType);
                    None
                }
            },
        };

        if let Some(max_length) = self.max_length
            && value_length(value) > max_length
        {
            codes.push(FieldErrorCode::TooLong);
        }

        if !codes.is_empty() {
            return FieldOutcome::Invalid(codes);
        }

        coerced.map(FieldOutcome::Coerced).unwrap_or(FieldOutcome::Valid)
    }
}

/// Payload that passed validation, with coerced values applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedPayload(Map<String, Value>);

impl NormalizedPayload {
    /// Returns the normalized field map.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload into its field map.
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Validators compiled from a schema, reusable across submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledForm {
    validators: Vec<FieldValidator>,
}

impl CompiledForm {
    /// Returns validators in schema order.
    #[must_use]
    pub fn validators(&self) -> &[FieldValidator] {
        &self.validators
    }

    /// Validates a payload against every compiled field.
    ///
    /// Fields not declared in the schema are passed through unchanged.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<NormalizedPayload, FieldErrors> {
        let mut normalized = payload.clone();
        let mut errors = FieldErrors::default();

        for validator in &self.validators {
            match validator.check(payload.get(validator.name())) {
                FieldOutcome::Skipped | FieldOutcome::Valid => {}
                FieldOutcome::Coerced(value) => {
                    normalized.insert(validator.name().to_owned(), value);
                }
                FieldOutcome::Invalid(codes) => {
                    for code in codes {
                        errors.push(validator.name(), code);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(NormalizedPayload(normalized))
        } else {
            Err(errors)
        }
    }
}

/// Builds one validator per schema field, in schema order.
#[must_use]
pub fn compile(schema: &FormSchema) -> CompiledForm {
    CompiledForm {
        validators: schema.fields().iter().map(FieldValidator::from_spec).collect(),
    }
}

/// Compiles `schema` and validates `payload` against it.
pub fn validate(
    schema: &FormSchema,
    payload: &Map<String, Value>,
) -> Result<NormalizedPayload, FieldErrors> {
    compile(schema).validate(payload)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(object) => object.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn parse_number(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Value::from(integer));
    }
    if let Ok(integer) = trimmed.parse::<u64>() {
        return Some(Value::from(integer));
    }

    let float = trimmed.parse::<f64>().ok().filter(|value| value.is_finite())?;
    if let Some(integer) = integral_i64(float) {
        return Some(Value::from(integer));
    }

    Number::from_f64(float).map(Value::Number)
}

// `i64::MAX as f64` rounds up to 2^63, hence the exclusive upper bound.
fn integral_i64(value: f64) -> Option<i64> {
    const LOWER: f64 = -9_223_372_036_854_775_808.0;
    const UPPER: f64 = 9_223_372_036_854_775_808.0;

    (value.fract() == 0.0 && (LOWER..UPPER).contains(&value)).then_some(value as i64)
}

fn value_length(value: &Value) -> usize {
    match value {
        Value::String(text) => text.chars().count(),
        Value::Number(number) => number.to_string().chars().count(),
        Value::Bool(flag) => flag.to_string().len(),
        Value::Array(items) => items.len(),
        Value::Object(object) => object.len(),
        Value::Null => 0,
    }
}

#[cfg(test)]
mod tests;
