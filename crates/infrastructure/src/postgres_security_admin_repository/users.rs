use super::*;

const USER_SELECT: &str = r#"
    SELECT
        users.id AS user_id,
        users.name,
        users.email,
        roles.name AS role_name
    FROM users
    LEFT JOIN user_roles
        ON user_roles.user_id = users.id
    LEFT JOIN roles
        ON roles.id = user_roles.role_id
"#;

impl PostgresSecurityAdminRepository {
    pub(super) async fn list_users_impl(&self) -> AppResult<Vec<UserAccount>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_SELECT} ORDER BY users.email, roles.name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        Ok(aggregate_users(rows))
    }

    pub(super) async fn find_user_impl(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "{USER_SELECT} WHERE users.id = $1 ORDER BY roles.name"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        Ok(aggregate_users(rows).into_iter().next())
    }

    pub(super) async fn create_user_impl(&self, user: User) -> AppResult<UserAccount> {
        let email = user.email().as_str();
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.user_id().as_uuid())
        .bind(user.name().as_str())
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                format!("a user with email '{email}' already exists"),
                "create user",
            )
        })?;

        self.load_user(user.user_id()).await
    }

    pub(super) async fn update_user_impl(&self, user: User) -> AppResult<UserAccount> {
        let email = user.email().as_str();
        let rows_affected = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user.user_id().as_uuid())
        .bind(user.name().as_str())
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            map_unique_violation(
                error,
                format!("a user with email '{email}' already exists"),
                "update user",
            )
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "user '{}' does not exist",
                user.user_id()
            )));
        }

        self.load_user(user.user_id()).await
    }

    pub(super) async fn delete_user_impl(&self, user_id: UserId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        Ok(())
    }

    pub(super) async fn sync_user_roles_impl(
        &self,
        user_id: UserId,
        role_ids: &[RoleId],
    ) -> AppResult<UserAccount> {
        let mut transaction = self.begin().await?;

        let user_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve user: {error}")))?;

        if !user_exists {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        let requested: BTreeSet<uuid::Uuid> = role_ids.iter().map(RoleId::as_uuid).collect();
        let requested_ids: Vec<uuid::Uuid> = requested.iter().copied().collect();
        let found: Vec<uuid::Uuid> = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM roles
            WHERE id = ANY($1)
            "#,
        )
        .bind(requested_ids)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve roles: {error}")))?;

        if let Some(missing) = requested.iter().find(|role_id| !found.contains(*role_id)) {
            return Err(AppError::Validation(format!("unknown role '{missing}'")));
        }

        sqlx::query(
            r#"
            DELETE FROM user_roles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear user roles: {error}")))?;

        for role_id in &requested {
            sqlx::query(
                r#"
                INSERT INTO user_roles (user_id, role_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(user_id.as_uuid())
            .bind(role_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to assign role: {error}")))?;
        }

        commit(transaction).await?;
        self.load_user(user_id).await
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.find_user_impl(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }
}
