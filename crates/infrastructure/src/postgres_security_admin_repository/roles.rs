use super::*;

const ROLE_SELECT: &str = r#"
    SELECT
        roles.id AS role_id,
        roles.name AS role_name,
        roles.description,
        permissions.name AS permission
    FROM roles
    LEFT JOIN role_permissions
        ON role_permissions.role_id = roles.id
    LEFT JOIN permissions
        ON permissions.id = role_permissions.permission_id
"#;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_roles_impl(&self) -> AppResult<Vec<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} ORDER BY roles.name, permissions.name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        Ok(aggregate_roles(rows))
    }

    pub(super) async fn find_role_impl(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} WHERE roles.id = $1 ORDER BY permissions.name"
        ))
        .bind(role_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        Ok(aggregate_roles(rows).into_iter().next())
    }

    pub(super) async fn find_role_by_name_impl(
        &self,
        name: &str,
    ) -> AppResult<Option<RoleDefinition>> {
        let rows = sqlx::query_as::<_, RoleRow>(&format!(
            "{ROLE_SELECT} WHERE roles.name = $1 ORDER BY permissions.name"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        Ok(aggregate_roles(rows).into_iter().next())
    }

    pub(super) async fn create_role_impl(
        &self,
        role: Role,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        let mut transaction = self.begin().await?;
        let name = role.name().as_str();

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(role.role_id().as_uuid())
        .bind(name)
        .bind(role.description())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            map_unique_violation(error, format!("role '{name}' already exists"), "create role")
        })?;

        let permission_ids = resolve_permission_ids(&mut transaction, permissions).await?;
        insert_role_permissions(&mut transaction, role.role_id(), &permission_ids).await?;
        commit(transaction).await?;

        self.load_role(role.role_id()).await
    }

    pub(super) async fn update_role_impl(&self, role: Role) -> AppResult<RoleDefinition> {
        let name = role.name().as_str();
        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2, description = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(role.role_id().as_uuid())
        .bind(name)
        .bind(role.description())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(error, format!("role '{name}' already exists"), "update role")
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{}' does not exist",
                role.role_id()
            )));
        }

        self.load_role(role.role_id()).await
    }

    pub(super) async fn delete_role_impl(&self, role_id: RoleId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        Ok(())
    }

    /// Writes role grants; `replace` removes grants not listed.
    pub(super) async fn write_role_permissions_impl(
        &self,
        role_id: RoleId,
        permissions: &[String],
        replace: bool,
    ) -> AppResult<RoleDefinition> {
        let mut transaction = self.begin().await?;

        let role_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM roles WHERE id = $1)
            "#,
        )
        .bind(role_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        if !role_exists {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        let permission_ids = resolve_permission_ids(&mut transaction, permissions).await?;

        if replace {
            sqlx::query(
                r#"
                DELETE FROM role_permissions
                WHERE role_id = $1
                "#,
            )
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear role permissions: {error}"))
            })?;
        }

        insert_role_permissions(&mut transaction, role_id, &permission_ids).await?;
        commit(transaction).await?;

        self.load_role(role_id).await
    }

    async fn load_role(&self, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.find_role_impl(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}

async fn insert_role_permissions(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: RoleId,
    permission_ids: &[uuid::Uuid],
) -> AppResult<()> {
    for permission_id in permission_ids {
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission_id) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_id)
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to persist role grants: {error}")))?;
    }

    Ok(())
}
