mod common;
mod forms;
mod security;

pub use common::{HealthResponse, UserIdentityResponse};
pub use forms::{
    CreateFormRequest, FormResponse, FormSubmissionResponse, SubmissionListParams,
    SubmitFormRequest, UpdateFormRequest,
};
pub use security::{
    CreateRoleRequest, CreateUserRequest, PermissionNamesResponse, PermissionRequest,
    PermissionResponse, RoleResponse, SyncRolePermissionsRequest, SyncUserRolesRequest,
    UpdateRoleRequest, UpdateUserRequest, UserResponse,
};
