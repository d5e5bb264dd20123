use async_trait::async_trait;

use aula_core::AppResult;
use aula_domain::{Permission, PermissionId, Role, RoleId, User, UserId};

use super::roles::RoleDefinition;
use super::users::UserAccount;

/// Repository port for permission, role and user administration.
///
/// Unique names and emails are enforced by the adapter, which reports
/// violations as `Conflict`. Unknown permission names or role ids in grant
/// lists are reported as `Validation` and leave stored edges untouched.
#[async_trait]
pub trait SecurityAdminRepository: Send + Sync {
    /// Lists permissions ordered by name.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Returns one permission by id.
    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>>;

    /// Returns one permission by name.
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>>;

    /// Stores a new permission.
    async fn create_permission(&self, permission: Permission) -> AppResult<()>;

    /// Replaces a stored permission's name.
    async fn update_permission(&self, permission: Permission) -> AppResult<()>;

    /// Deletes a permission and detaches it from every role.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;

    /// Lists roles with their grants, ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>>;

    /// Returns one role with its grants.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>>;

    /// Returns one role by name with its grants.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>>;

    /// Stores a new role with initial grants.
    async fn create_role(&self, role: Role, permissions: &[String]) -> AppResult<RoleDefinition>;

    /// Replaces a role's name and description.
    async fn update_role(&self, role: Role) -> AppResult<RoleDefinition>;

    /// Deletes a role and detaches it from every user.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Replaces a role's grants with exactly `permissions`.
    async fn sync_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition>;

    /// Adds grants to a role without removing existing ones.
    async fn grant_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition>;

    /// Lists users with their role names, ordered by email.
    async fn list_users(&self) -> AppResult<Vec<UserAccount>>;

    /// Returns one user with its role names.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Stores a new user without roles.
    async fn create_user(&self, user: User) -> AppResult<UserAccount>;

    /// Replaces a user's name and email.
    async fn update_user(&self, user: User) -> AppResult<UserAccount>;

    /// Deletes a user.
    async fn delete_user(&self, user_id: UserId) -> AppResult<()>;

    /// Replaces a user's roles with exactly `role_ids`.
    async fn sync_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<UserAccount>;
}
