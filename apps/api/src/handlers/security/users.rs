use aula_domain::{RoleId, UserId};

use super::*;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .security_admin_service
        .list_users(&user)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let account = state
        .security_admin_service
        .create_user(&user, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(account))))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .security_admin_service
        .get_user(&user, UserId::from_str(user_id.as_str())?)
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let account = state
        .security_admin_service
        .update_user(&user, UserId::from_str(user_id.as_str())?, payload.into())
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .security_admin_service
        .delete_user(&user, UserId::from_str(user_id.as_str())?)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn sync_user_roles_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
    Json(payload): Json<SyncUserRolesRequest>,
) -> ApiResult<Json<UserResponse>> {
    let role_ids = payload
        .role_ids
        .iter()
        .map(|value| RoleId::from_str(value.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let account = state
        .security_admin_service
        .sync_user_roles(&user, UserId::from_str(user_id.as_str())?, role_ids)
        .await?;

    Ok(Json(UserResponse::from(account)))
}

pub async fn user_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<PermissionNamesResponse>> {
    let permissions = state
        .security_admin_service
        .user_permissions(&user, UserId::from_str(user_id.as_str())?)
        .await?;

    Ok(Json(PermissionNamesResponse::from(permissions)))
}
