use async_trait::async_trait;
use aula_application::{
    AuthorizationRepository, RoleDefinition, SecurityAdminRepository, UserAccount,
};
use aula_core::{AppError, AppResult};
use aula_domain::{AccessGraph, Permission, PermissionId, Principal, Role, RoleId, User, UserId};
use tokio::sync::RwLock;

/// In-memory permission, role and user store backed by an [`AccessGraph`].
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    graph: RwLock<AccessGraph>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(AccessGraph::new()),
        }
    }

    /// Creates a repository over an already populated graph.
    #[must_use]
    pub fn with_graph(graph: AccessGraph) -> Self {
        Self {
            graph: RwLock::new(graph),
        }
    }
}

fn role_definition(graph: &AccessGraph, role_id: RoleId) -> AppResult<RoleDefinition> {
    let role = graph
        .role(role_id)
        .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
    let permissions = graph
        .role_permissions(role_id)?
        .into_iter()
        .map(|permission| String::from(permission.name().clone()))
        .collect();

    Ok(RoleDefinition {
        role_id,
        name: role.name().as_str().to_owned(),
        description: role.description().map(ToOwned::to_owned),
        permissions,
    })
}

fn user_account(graph: &AccessGraph, user_id: UserId) -> AppResult<UserAccount> {
    let user = graph
        .user(user_id)
        .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))?;
    let roles = graph
        .user_roles(user_id)?
        .into_iter()
        .map(|role| String::from(role.name().clone()))
        .collect();

    Ok(UserAccount {
        user_id,
        name: user.name().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        roles,
    })
}

#[async_trait]
impl AuthorizationRepository for InMemoryAccessRepository {
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>> {
        Ok(self.graph.read().await.principal(user_id))
    }
}

#[async_trait]
impl SecurityAdminRepository for InMemoryAccessRepository {
    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        Ok(self.graph.read().await.permissions())
    }

    async fn find_permission(&self, permission_id: PermissionId) -> AppResult<Option<Permission>> {
        Ok(self.graph.read().await.permission(permission_id).cloned())
    }

    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<Permission>> {
        Ok(self.graph.read().await.permission_by_name(name).cloned())
    }

    async fn create_permission(&self, permission: Permission) -> AppResult<()> {
        self.graph.write().await.insert_permission(permission)
    }

    async fn update_permission(&self, permission: Permission) -> AppResult<()> {
        self.graph
            .write()
            .await
            .rename_permission(permission.permission_id(), permission.name().as_str())
            .map(|_| ())
    }

    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()> {
        self.graph
            .write()
            .await
            .remove_permission(permission_id)
            .map(|_| ())
    }

    async fn list_roles(&self) -> AppResult<Vec<RoleDefinition>> {
        let graph = self.graph.read().await;
        graph
            .roles()
            .iter()
            .map(|role| role_definition(&graph, role.role_id()))
            .collect()
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDefinition>> {
        let graph = self.graph.read().await;
        if graph.role(role_id).is_none() {
            return Ok(None);
        }

        role_definition(&graph, role_id).map(Some)
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleDefinition>> {
        let graph = self.graph.read().await;
        let Some(role_id) = graph.role_by_name(name).map(Role::role_id) else {
            return Ok(None);
        };

        role_definition(&graph, role_id).map(Some)
    }

    async fn create_role(&self, role: Role, permissions: &[String]) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.write().await;
        let role_id = role.role_id();

        // Resolve grants first so an unknown name leaves no half-created role.
        let mut staged = graph.clone();
        staged.insert_role(role)?;
        staged.sync_role_permissions(role_id, permissions)?;
        *graph = staged;

        role_definition(&graph, role_id)
    }

    async fn update_role(&self, role: Role) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.write().await;
        let role_id = role.role_id();
        graph.update_role(role)?;
        role_definition(&graph, role_id)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.graph.write().await.remove_role(role_id).map(|_| ())
    }

    async fn sync_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.write().await;
        graph.sync_role_permissions(role_id, permissions)?;
        role_definition(&graph, role_id)
    }

    async fn grant_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> AppResult<RoleDefinition> {
        let mut graph = self.graph.write().await;
        graph.grant_permissions(role_id, permissions)?;
        role_definition(&graph, role_id)
    }

    async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        let graph = self.graph.read().await;
        graph
            .users()
            .iter()
            .map(|user| user_account(&graph, user.user_id()))
            .collect()
    }

    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let graph = self.graph.read().await;
        if graph.user(user_id).is_none() {
            return Ok(None);
        }

        user_account(&graph, user_id).map(Some)
    }

    async fn create_user(&self, user: User) -> AppResult<UserAccount> {
        let mut graph = self.graph.write().await;
        let user_id = user.user_id();
        graph.insert_user(user)?;
        user_account(&graph, user_id)
    }

    async fn update_user(&self, user: User) -> AppResult<UserAccount> {
        let mut graph = self.graph.write().await;
        let user_id = user.user_id();
        graph.update_user(user)?;
        user_account(&graph, user_id)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<()> {
        self.graph.write().await.remove_user(user_id).map(|_| ())
    }

    async fn sync_user_roles(&self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<UserAccount> {
        let mut graph = self.graph.write().await;
        graph.sync_user_roles(user_id, role_ids)?;
        user_account(&graph, user_id)
    }
}
