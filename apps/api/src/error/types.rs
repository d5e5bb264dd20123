use aula_core::FieldErrors;
use serde::Serialize;
use ts_rs::TS;

/// API error payload.
///
/// `errors` is present only for payloads rejected by a form schema and maps
/// each failing field to its error codes.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "Record<string, Array<string>> | null")]
    errors: Option<FieldErrors>,
}

impl ErrorResponse {
    pub(super) fn new(message: String) -> Self {
        Self {
            message,
            errors: None,
        }
    }

    pub(super) fn invalid_payload(errors: FieldErrors) -> Self {
        Self {
            message: "the submitted payload is invalid".to_owned(),
            errors: Some(errors),
        }
    }
}
