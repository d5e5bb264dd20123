use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use aula_application::{RoleDefinition, SecurityAdminRepository, UserAccount};
use aula_core::{AppError, AppResult};
use aula_domain::{Permission, PermissionId, Role, RoleId, User, UserId};

mod permissions;
mod roles;
mod users;


/// PostgreSQL-backed repository for permission, role and user administration.
#[derive(Clone)]
pub struct PostgresSecurityAdminRepository {
    pool: PgPool,
}

impl PostgresSecurityAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: uuid::Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    description: Option<String>,
    permission: Option<String>,
}

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: uuid::Uuid,
    name: String,
    email: String,
    role_name: Option<String>,
}

#[async_trait]
impl SecurityAdminRepository for PostgresSecurityAdminRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.list_permissions_impl().await
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        self.find_permission_impl(permission_id).await
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        self.find_permission_by_name_impl(name).await
    }

    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        self.create_permission_impl(permission).await
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<()> {
        self.update_permission_impl(permission).await
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.delete_permission_impl(permission_id).await
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        self.list_roles_impl().await
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        self.find_role_impl(role_id).await
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        self.find_role_by_name_impl(name).await
    }

    async fn create_role(&self, role: Role, permissions: &[String]) -> AppResult<RoleDefinition> {
        self.create_role_impl(role, permissions).await
    }

    async fn update_role(&self, role: Role) -> AppResult<RoleDefinition> {
        self.update_role_impl(role).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.delete_role_impl(role_id).await
    }

    async fn sync_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        self.write_role_permissions_impl(role_id, permissions, true)
            .await
    }

    async fn grant_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        self.write_role_permissions_impl(role_id, permissions, false)
            .await
    }

    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        self.list_users_impl().await
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        self.find_user_impl(user_id).await
    }

    async fn create_user(&self, user: User) -> AppResult<UserAccount> {
        self.create_user_impl(user).await
    }

    async fn update_user(&self, user: User) -> AppResult<UserAccount> {
        self.update_user_impl(user).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.delete_user_impl(user_id).await
    }

    async fn sync_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<UserAccount> {
        self.sync_user_roles_impl(user_id, role_ids).await
    }
}

fn permission_from_row(row: PermissionRow) -> AppResult<Permission> {
    Permission::new(PermissionId::from_uuid(row.id), row.name.as_str()).map_err(|error| {
        AppError::Internal(format!("invalid stored permission '{}': {error}", row.name))
    })
}

fn aggregate_roles(rows: Vec<RoleRow>) -> Vec<RoleDefinition> {
    let mut by_name: BTreeMap<String, RoleDefinition> = BTreeMap::new();

    for row in rows {
        let role = by_name
            .entry(row.role_name.clone())
            .or_insert_with(|| RoleDefinition {
                role_id: RoleId::from_uuid(row.role_id),
                name: row.role_name,
                description: row.description,
                permissions: Vec::new(),
            });

        if let Some(permission) = row.permission {
            role.permissions.push(permission);
        }
    }

    by_name.into_values().collect()
}

fn aggregate_users(rows: Vec<UserRow>) -> Vec<UserAccount> {
    let mut by_email: BTreeMap<String, UserAccount> = BTreeMap::new();

    for row in rows {
        let user = by_email
            .entry(row.email.clone())
            .or_insert_with(|| UserAccount {
                user_id: UserId::from_uuid(row.user_id),
                name: row.name,
                email: row.email,
                roles: Vec::new(),
            });

        if let Some(role_name) = row.role_name {
            user.roles.push(role_name);
        }
    }

    by_email.into_values().collect()
}

/// Resolves permission names to ids, failing on the first unknown name.
async fn resolve_permission_ids(
    transaction: &mut Transaction<'_, Postgres>,
    names: &[String],
) -> AppResult<Vec<uuid::Uuid>> {
    let requested: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let requested_names: Vec<String> = requested.iter().map(|name| (*name).to_owned()).collect();
    let rows = sqlx::query_as::<_, PermissionRow>(
        r#"
        SELECT id, name
        FROM permissions
        WHERE name = ANY($1)
        "#,
    )
    .bind(requested_names)
    .fetch_all(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to resolve permissions: {error}")))?;

    let found: BTreeSet<&str> = rows.iter().map(|row| row.name.as_str()).collect();
    if let Some(missing) = requested.iter().find(|name| !found.contains(*name)) {
        return Err(AppError::Validation(format!("unknown permission '{missing}'")));
    }

    Ok(rows.into_iter().map(|row| row.id).collect())
}

fn map_unique_violation(error: sqlx::Error, conflict: String, step: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(conflict);
    }

    AppError::Internal(format!("failed to {step}: {error}"))
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}
