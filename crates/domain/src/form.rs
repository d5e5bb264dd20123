use std::collections::HashSet;

use aula_core::{AppError, AppResult, NonEmptyString};
use serde_json::{Map, Value};

use crate::form_compiler::{CompiledForm, compile};
use crate::{FormId, UserId};

/// Maximum length of a form's display name.
pub const FORM_NAME_MAX_LENGTH: usize = 160;

/// Maximum length of a form's unique code.
pub const FORM_CODE_MAX_LENGTH: usize = 80;

/// Value type declared for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Any scalar value.
    String,
    /// A string with email address syntax.
    Email,
    /// A number, or a string holding a finite number.
    Number,
}

impl FieldType {
    /// Returns a stable storage value for the field type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Email => "email",
            Self::Number => "number",
        }
    }

    /// Resolves a schema `type` value.
    ///
    /// Omitted and unrecognized types resolve to [`FieldType::String`].
    #[must_use]
    pub fn from_schema(value: Option<&str>) -> Self {
        match value {
            Some("email") => Self::Email,
            Some("number") => Self::Number,
            _ => Self::String,
        }
    }
}

/// Validation contract for one field of a form schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: NonEmptyString,
    field_type: FieldType,
    required: bool,
    max_length: Option<usize>,
}

impl FieldSpec {
    /// Creates a validated field spec.
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        required: bool,
        max_length: Option<usize>,
    ) -> AppResult<Self> {
        let name = NonEmptyString::new(name).map_err(|_| {
            AppError::Validation("form field name must not be empty".to_owned())
        })?;

        Ok(Self {
            name,
            field_type,
            required,
            max_length,
        })
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the declared field type.
    #[must_use]
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns whether the field must be present and non-empty.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the maximum character length, if declared.
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    fn from_json(index: usize, value: &Value) -> AppResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            AppError::Validation(format!("form field #{index} must be a JSON object"))
        })?;

        let name = object
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::Validation(format!("form field #{index} requires a string 'name'"))
            })?;

        let field_type = FieldType::from_schema(object.get("type").and_then(Value::as_str));

        let required = match object.get("required") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(required)) => *required,
            Some(_) => {
                return Err(AppError::Validation(format!(
                    "form field '{name}' has a non-boolean 'required'"
                )));
            }
        };

        let max_length = match object.get("max").or_else(|| object.get("maxLength")) {
            None | Some(Value::Null) => None,
            Some(value) => {
                let max = value.as_u64().ok_or_else(|| {
                    AppError::Validation(format!(
                        "form field '{name}' has an invalid 'max', expected a non-negative integer"
                    ))
                })?;
                Some(usize::try_from(max).map_err(|_| {
                    AppError::Validation(format!("form field '{name}' has an oversized 'max'"))
                })?)
            }
        };

        Self::new(name, field_type, required, max_length)
    }

    fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".to_owned(), Value::from(self.name()));
        object.insert("type".to_owned(), Value::from(self.field_type.as_str()));
        object.insert("required".to_owned(), Value::Bool(self.required));
        if let Some(max_length) = self.max_length {
            object.insert("max".to_owned(), Value::from(max_length));
        }

        Value::Object(object)
    }
}

/// Ordered list of field specs describing a form's accepted payload.
///
/// The schema document it was parsed from is kept verbatim, so keys the
/// validator does not interpret survive storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
    document: Value,
}

impl Default for FormSchema {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            document: fields_document(&[]),
        }
    }
}

fn fields_document(fields: &[FieldSpec]) -> Value {
    let mut object = Map::new();
    object.insert(
        "fields".to_owned(),
        Value::Array(fields.iter().map(FieldSpec::to_json).collect()),
    );
    Value::Object(object)
}

fn ensure_unique_names(fields: &[FieldSpec]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name()) {
            return Err(AppError::Validation(format!(
                "duplicate form field '{}'",
                field.name()
            )));
        }
    }

    Ok(())
}

impl FormSchema {
    /// Creates a schema, enforcing unique field names.
    pub fn new(fields: Vec<FieldSpec>) -> AppResult<Self> {
        ensure_unique_names(&fields)?;
        let document = fields_document(&fields);

        Ok(Self { fields, document })
    }

    /// Parses the stored schema shape `{"fields": [...]}`.
    ///
    /// A missing `fields` key yields an empty schema. Unrecognized keys and
    /// field types are ignored for validation but kept in the document.
    pub fn from_json(value: &Value) -> AppResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            AppError::Validation("form schema must be a JSON object".to_owned())
        })?;

        let fields = match object.get("fields") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| FieldSpec::from_json(index, item))
                .collect::<AppResult<Vec<_>>>()?,
            Some(_) => {
                return Err(AppError::Validation(
                    "form schema 'fields' must be an array".to_owned(),
                ));
            }
        };

        ensure_unique_names(&fields)?;

        Ok(Self {
            fields,
            document: value.clone(),
        })
    }

    /// Returns the schema document as submitted.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.document.clone()
    }

    /// Returns fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// A custom form whose submissions are validated against its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDefinition {
    form_id: FormId,
    name: NonEmptyString,
    code: NonEmptyString,
    is_active: bool,
    schema: FormSchema,
    compiled: CompiledForm,
    created_by: Option<UserId>,
}

impl FormDefinition {
    /// Creates a validated form definition and compiles its schema.
    pub fn new(
        form_id: FormId,
        name: impl Into<String>,
        code: impl Into<String>,
        is_active: bool,
        schema: FormSchema,
        created_by: Option<UserId>,
    ) -> AppResult<Self> {
        let compiled = compile(&schema);

        Ok(Self {
            form_id,
            name: NonEmptyString::bounded(name, FORM_NAME_MAX_LENGTH, "form name")?,
            code: NonEmptyString::bounded(code, FORM_CODE_MAX_LENGTH, "form code")?,
            is_active,
            schema,
            compiled,
            created_by,
        })
    }

    /// Returns the form identifier.
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the unique form code.
    #[must_use]
    pub fn code(&self) -> &NonEmptyString {
        &self.code
    }

    /// Returns whether the form accepts submissions.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the form schema.
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Returns the validators compiled from the schema.
    #[must_use]
    pub fn compiled(&self) -> &CompiledForm {
        &self.compiled
    }

    /// Returns the creating user, if recorded.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}
