use std::collections::BTreeSet;

use aula_application::{
    CreateRoleInput, CreateUserInput, RoleDefinition, UpdateRoleInput, UpdateUserInput,
    UserAccount,
};
use aula_domain::Permission;

use super::types::{
    CreateRoleRequest, CreateUserRequest, PermissionNamesResponse, PermissionResponse,
    RoleResponse, UpdateRoleRequest, UpdateUserRequest, UserResponse,
};

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            permission_id: value.permission_id().to_string(),
            name: value.name().as_str().to_owned(),
        }
    }
}

impl From<BTreeSet<String>> for PermissionNamesResponse {
    fn from(value: BTreeSet<String>) -> Self {
        Self {
            permissions: value.into_iter().collect(),
        }
    }
}

impl From<CreateRoleRequest> for CreateRoleInput {
    fn from(value: CreateRoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
            permissions: value.permissions,
        }
    }
}

impl From<UpdateRoleRequest> for UpdateRoleInput {
    fn from(value: UpdateRoleRequest) -> Self {
        Self {
            name: value.name,
            description: value.description,
        }
    }
}

impl From<RoleDefinition> for RoleResponse {
    fn from(value: RoleDefinition) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            name: value.name,
            description: value.description,
            permissions: value.permissions,
        }
    }
}

impl From<CreateUserRequest> for CreateUserInput {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
        }
    }
}

impl From<UserAccount> for UserResponse {
    fn from(value: UserAccount) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            name: value.name,
            email: value.email,
            roles: value.roles,
        }
    }
}
