mod conversions;
mod types;

pub use types::{
    CreateRoleRequest, CreateUserRequest, PermissionNamesResponse, PermissionRequest,
    PermissionResponse, RoleResponse, SyncRolePermissionsRequest, SyncUserRolesRequest,
    UpdateRoleRequest, UpdateUserRequest, UserResponse,
};
