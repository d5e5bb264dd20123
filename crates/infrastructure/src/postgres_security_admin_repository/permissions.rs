use super::*;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_permissions_impl(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name
            FROM permissions
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(permission_from_row).collect()
    }

    pub(super) async fn find_permission_impl(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name
            FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(permission_from_row)
        .transpose()
    }

    pub(super) async fn find_permission_by_name_impl(
        &self,
        name: &str,
    ) -> AppResult<Option<Permission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, name
            FROM permissions
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(permission_from_row)
        .transpose()
    }

    pub(super) async fn create_permission_impl(&self, permission: Permission) -> AppResult<()> {
        let name = permission.name().as_str();
        sqlx::query(
            r#"
            INSERT INTO permissions (id, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(permission.permission_id().as_uuid())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                format!("permission '{name}' already exists"),
                "create permission",
            )
        })?;

        Ok(())
    }

    pub(super) async fn update_permission_impl(&self, permission: Permission) -> AppResult<()> {
        let name = permission.name().as_str();
        let rows_affected = sqlx::query(
            r#"
            UPDATE permissions
            SET name = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(permission.permission_id().as_uuid())
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                format!("permission '{name}' already exists"),
                "update permission",
            )
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{}' does not exist",
                permission.permission_id()
            )));
        }

        Ok(())
    }

    pub(super) async fn delete_permission_impl(&self, permission_id: PermissionId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM permissions
            WHERE id = $1
            "#,
        )
        .bind(permission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete permission: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "permission '{permission_id}' does not exist"
            )));
        }

        Ok(())
    }
}
