use aula_domain::FormId;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Input payload for form creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateFormInput {
    /// Display name.
    pub name: String,
    /// Unique form code.
    pub code: String,
    /// Whether the form accepts submissions. Defaults to true.
    pub is_active: Option<bool>,
    /// Stored schema shape `{"fields": [...]}`.
    pub schema: Value,
}

/// Partial update of a form. Absent values keep their current state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateFormInput {
    /// New display name.
    pub name: Option<String>,
    /// New unique code.
    pub code: Option<String>,
    /// Replacement schema.
    pub schema: Option<Value>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Input payload for submitting a form.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitFormInput {
    /// Target form.
    pub form_id: FormId,
    /// Submitted field values.
    pub payload: Map<String, Value>,
    /// Client address the submission came from.
    pub source_address: Option<String>,
    /// Opaque reference to an uploaded media item.
    pub attachment_media_id: Option<Uuid>,
}

/// Filter for listing submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionListQuery {
    /// Restricts results to one form.
    pub form_id: Option<FormId>,
}
