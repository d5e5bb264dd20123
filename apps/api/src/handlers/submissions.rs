use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use aula_application::{SubmissionListQuery, SubmitFormInput};
use aula_core::{AppError, UserIdentity};
use aula_domain::{FormId, SubmissionId};

use crate::dto::{FormSubmissionResponse, SubmissionListParams, SubmitFormRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_submissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(params): Query<SubmissionListParams>,
) -> ApiResult<Json<Vec<FormSubmissionResponse>>> {
    let form_id = params
        .form_id
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(FormId::from_str)
        .transpose()?;

    let submissions = state
        .form_service
        .list_submissions(&user, SubmissionListQuery { form_id })
        .await?
        .into_iter()
        .map(FormSubmissionResponse::from)
        .collect();

    Ok(Json(submissions))
}

pub async fn submit_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    headers: HeaderMap,
    Json(payload): Json<SubmitFormRequest>,
) -> ApiResult<(StatusCode, Json<FormSubmissionResponse>)> {
    let attachment_media_id = payload
        .attachment_media_id
        .as_deref()
        .map(|value| {
            uuid::Uuid::parse_str(value.trim()).map_err(|error| {
                AppError::Validation(format!("invalid attachment media id '{value}': {error}"))
            })
        })
        .transpose()?;

    let submission = state
        .form_service
        .submit(
            &user,
            SubmitFormInput {
                form_id: FormId::from_str(payload.form_id.as_str())?,
                payload: payload.payload,
                source_address: source_address(&headers),
                attachment_media_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FormSubmissionResponse::from(submission)),
    ))
}

pub async fn get_submission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(submission_id): Path<String>,
) -> ApiResult<Json<FormSubmissionResponse>> {
    let submission = state
        .form_service
        .get_submission(&user, SubmissionId::from_str(submission_id.as_str())?)
        .await?;

    Ok(Json(FormSubmissionResponse::from(submission)))
}

pub async fn delete_submission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(submission_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .form_service
        .delete_submission(&user, SubmissionId::from_str(submission_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Client address from `x-forwarded-for` (first hop) or `x-real-ip`.
pub(crate) fn source_address(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
        .map(ToOwned::to_owned)
}
