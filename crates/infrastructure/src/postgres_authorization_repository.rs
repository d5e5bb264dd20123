use async_trait::async_trait;

use aula_application::AuthorizationRepository;
use aula_core::{AppError, AppResult};
use aula_domain::{Principal, RoleGrants, UserId};

use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed repository resolving a user's role graph.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleGrantRow {
    role_id: uuid::Uuid,
    role_name: String,
    permission: Option<String>,
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>> {
        let user_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve user: {error}")))?;

        if !user_exists {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, RoleGrantRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                permissions.name AS permission
            FROM user_roles
            INNER JOIN roles
                ON roles.id = user_roles.role_id
            LEFT JOIN role_permissions
                ON role_permissions.role_id = roles.id
            LEFT JOIN permissions
                ON permissions.id = role_permissions.permission_id
            WHERE user_roles.user_id = $1
            ORDER BY roles.name, roles.id, permissions.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load role grants: {error}")))?;

        Ok(Some(Principal::new(user_id, group_role_grants(rows))))
    }
}

fn group_role_grants(rows: Vec<RoleGrantRow>) -> Vec<RoleGrants> {
    let mut grouped: Vec<(uuid::Uuid, RoleGrants)> = Vec::new();

    for row in rows {
        let position = match grouped.iter().position(|(role_id, _)| *role_id == row.role_id) {
            Some(position) => position,
            None => {
                grouped.push((
                    row.role_id,
                    RoleGrants {
                        role_name: row.role_name,
                        permissions: Vec::new(),
                    },
                ));
                grouped.len() - 1
            }
        };

        if let Some(permission) = row.permission {
            grouped[position].1.permissions.push(permission);
        }
    }

    grouped.into_iter().map(|(_, grants)| grants).collect()
}
