use aula_application::{CreateFormInput, UpdateFormInput};
use aula_domain::{FormDefinition, FormSubmission};
use serde_json::{Map, Value};

use super::types::{CreateFormRequest, FormResponse, FormSubmissionResponse, UpdateFormRequest};

impl From<CreateFormRequest> for CreateFormInput {
    fn from(value: CreateFormRequest) -> Self {
        Self {
            name: value.name,
            code: value.code,
            is_active: value.is_active,
            schema: value.schema.unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

impl From<UpdateFormRequest> for UpdateFormInput {
    fn from(value: UpdateFormRequest) -> Self {
        Self {
            name: value.name,
            code: value.code,
            schema: value.schema,
            is_active: value.is_active,
        }
    }
}

impl From<FormDefinition> for FormResponse {
    fn from(value: FormDefinition) -> Self {
        Self {
            form_id: value.form_id().to_string(),
            name: value.name().as_str().to_owned(),
            code: value.code().as_str().to_owned(),
            is_active: value.is_active(),
            schema: value.schema().to_json(),
            created_by: value.created_by().map(|user_id| user_id.to_string()),
        }
    }
}

impl From<FormSubmission> for FormSubmissionResponse {
    fn from(value: FormSubmission) -> Self {
        Self {
            submission_id: value.submission_id().to_string(),
            form_id: value.form_id().to_string(),
            payload: value.payload().clone(),
            submitted_at: value.submitted_at().to_rfc3339(),
            source_address: value.source_address().map(ToOwned::to_owned),
            attachment_media_id: value.attachment_media_id().map(|id| id.to_string()),
        }
    }
}
