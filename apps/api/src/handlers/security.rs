use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use aula_core::UserIdentity;

use crate::dto::{
    CreateRoleRequest, CreateUserRequest, PermissionNamesResponse, PermissionRequest,
    PermissionResponse, RoleResponse, SyncRolePermissionsRequest, SyncUserRolesRequest,
    UpdateRoleRequest, UpdateUserRequest, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

mod permissions;
mod roles;
mod users;

pub use permissions::{
    create_permission_handler, delete_permission_handler, get_permission_handler,
    list_permissions_handler, my_permissions_handler, rename_permission_handler,
};
pub use roles::{
    create_role_handler, delete_role_handler, get_role_handler, list_role_permissions_handler,
    list_roles_handler, sync_role_permissions_handler, update_role_handler,
};
pub use users::{
    create_user_handler, delete_user_handler, get_user_handler, list_users_handler,
    sync_user_roles_handler, update_user_handler, user_permissions_handler,
};
