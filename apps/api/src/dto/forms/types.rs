use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// Incoming payload for form creation.
///
/// `schema` has the shape `{"fields": [{"name", "type", "required", "max"}]}`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-form-request.ts"
)]
pub struct CreateFormRequest {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    #[ts(type = "{ fields?: Array<Record<string, unknown>> } | null")]
    pub schema: Option<Value>,
}

/// Incoming payload for partial form updates.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-form-request.ts"
)]
pub struct UpdateFormRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    #[ts(type = "{ fields?: Array<Record<string, unknown>> } | null")]
    pub schema: Option<Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// API representation of a form definition.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-response.ts"
)]
pub struct FormResponse {
    pub form_id: String,
    pub name: String,
    pub code: String,
    pub is_active: bool,
    #[ts(type = "{ fields: Array<Record<string, unknown>> }")]
    pub schema: Value,
    pub created_by: Option<String>,
}

/// Incoming payload for a form submission.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/submit-form-request.ts"
)]
pub struct SubmitFormRequest {
    pub form_id: String,
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub attachment_media_id: Option<String>,
}

/// Query string for submission listing.
#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    #[serde(default)]
    pub form_id: Option<String>,
}

/// API representation of a stored submission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/form-submission-response.ts"
)]
pub struct FormSubmissionResponse {
    pub submission_id: String,
    pub form_id: String,
    #[ts(type = "Record<string, unknown>")]
    pub payload: Map<String, Value>,
    pub submitted_at: String,
    pub source_address: Option<String>,
    pub attachment_media_id: Option<String>,
}
