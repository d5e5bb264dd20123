use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use aula_core::UserIdentity;
use aula_domain::FormId;

use crate::dto::{CreateFormRequest, FormResponse, UpdateFormRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_forms_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<FormResponse>>> {
    let forms = state
        .form_service
        .list_forms(&user)
        .await?
        .into_iter()
        .map(FormResponse::from)
        .collect();

    Ok(Json(forms))
}

pub async fn create_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateFormRequest>,
) -> ApiResult<(StatusCode, Json<FormResponse>)> {
    let form = state
        .form_service
        .create_form(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(FormResponse::from(form))))
}

pub async fn get_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(form_id): Path<String>,
) -> ApiResult<Json<FormResponse>> {
    let form = state
        .form_service
        .get_form(&user, FormId::from_str(form_id.as_str())?)
        .await?;

    Ok(Json(FormResponse::from(form)))
}

pub async fn update_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(form_id): Path<String>,
    Json(payload): Json<UpdateFormRequest>,
) -> ApiResult<Json<FormResponse>> {
    let form = state
        .form_service
        .update_form(&user, FormId::from_str(form_id.as_str())?, payload.into())
        .await?;

    Ok(Json(FormResponse::from(form)))
}

pub async fn delete_form_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(form_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .form_service
        .delete_form(&user, FormId::from_str(form_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
