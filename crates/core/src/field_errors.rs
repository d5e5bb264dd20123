use std::fmt::{Display, Formatter};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Reason a single payload field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// A required field is absent or empty.
    MissingField,
    /// The value fails the declared type's syntax check.
    InvalidType,
    /// The value exceeds the declared maximum length.
    TooLong,
}

impl FieldErrorCode {
    /// Returns the stable transport value for this code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidType => "invalid_type",
            Self::TooLong => "too_long",
        }
    }
}

impl Display for FieldErrorCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Ordered collection of field errors keyed by field name.
///
/// Insertion order is preserved, so callers that push in schema order get
/// errors back in schema order. Serializes as a JSON object mapping each field
/// to its list of codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, Vec<FieldErrorCode>)>,
}

impl FieldErrors {
    /// Records `code` against `field`, appending to any codes already present.
    pub fn push(&mut self, field: impl Into<String>, code: FieldErrorCode) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, codes)) => {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
            None => self.entries.push((field, vec![code])),
        }
    }

    /// Returns whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the codes recorded for one field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[FieldErrorCode]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, codes)| codes.as_slice())
    }

    /// Iterates failing fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldErrorCode])> {
        self.entries
            .iter()
            .map(|(name, codes)| (name.as_str(), codes.as_slice()))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, codes) in self.iter() {
            if !first {
                formatter.write_str("; ")?;
            }
            first = false;

            let codes = codes
                .iter()
                .map(FieldErrorCode::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            write!(formatter, "{field}: {codes}")?;
        }

        Ok(())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, codes) in self.iter() {
            map.serialize_entry(field, codes)?;
        }
        map.end()
    }
}
