use aula_domain::PermissionId;

use super::*;

pub async fn my_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<PermissionNamesResponse>> {
    let permissions = state.security_admin_service.my_permissions(&user).await?;
    Ok(Json(PermissionNamesResponse::from(permissions)))
}

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .security_admin_service
        .list_permissions(&user)
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<PermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .security_admin_service
        .create_permission(&user, payload.name.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .get_permission(&user, PermissionId::from_str(permission_id.as_str())?)
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn rename_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
    Json(payload): Json<PermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission = state
        .security_admin_service
        .rename_permission(
            &user,
            PermissionId::from_str(permission_id.as_str())?,
            payload.name.as_str(),
        )
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_permission(&user, PermissionId::from_str(permission_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
