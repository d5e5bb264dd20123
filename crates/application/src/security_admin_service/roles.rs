use super::*;

use crate::security_admin_ports::{CreateRoleInput, UpdateRoleInput};

impl SecurityAdminService {
    /// Lists roles with their grants.
    pub async fn list_roles(&self, actor: &UserIdentity) -> AppResult<Vec<RoleDefinition>> {
        self.require(actor, Ability::ManageRoles).await?;
        self.repository.list_roles().await
    }

    /// Returns one role with its grants.
    pub async fn get_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.require(actor, Ability::ManageRoles).await?;
        self.load_role(role_id).await
    }

    /// Creates a role with its initial grants.
    pub async fn create_role(
        &self,
        actor: &UserIdentity,
        input: CreateRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.require(actor, Ability::ManageRoles).await?;

        let role = Role::new(RoleId::new(), input.name, input.description)?;
        let created = self
            .repository
            .create_role(role, &input.permissions)
            .await?;
        info!(subject = actor.subject(), role = %created.name, "role created");

        Ok(created)
    }

    /// Updates a role's name or description.
    pub async fn update_role(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<RoleDefinition> {
        self.require(actor, Ability::ManageRoles).await?;

        let existing = self.load_role(role_id).await?;
        let role = Role::new(
            role_id,
            input.name.unwrap_or(existing.name),
            input.description.or(existing.description),
        )?;
        let updated = self.repository.update_role(role).await?;
        info!(subject = actor.subject(), role = %updated.name, "role updated");

        Ok(updated)
    }

    /// Deletes a role and removes it from every user.
    pub async fn delete_role(&self, actor: &UserIdentity, role_id: RoleId) -> AppResult<()> {
        self.require(actor, Ability::ManageRoles).await?;

        let role = self.load_role(role_id).await?;
        self.repository.delete_role(role_id).await?;
        info!(subject = actor.subject(), role = %role.name, "role deleted");

        Ok(())
    }

    /// Returns the permission names granted to a role.
    pub async fn role_permissions(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
    ) -> AppResult<Vec<String>> {
        self.require(actor, Ability::ManageRoles).await?;
        Ok(self.load_role(role_id).await?.permissions)
    }

    /// Replaces a role's grants.
    pub async fn sync_role_permissions(
        &self,
        actor: &UserIdentity,
        role_id: RoleId,
        permissions: Vec<String>,
    ) -> AppResult<RoleDefinition> {
        self.require(actor, Ability::ManageRoles).await?;

        self.load_role(role_id).await?;
        let role = self
            .repository
            .sync_role_permissions(role_id, &permissions)
            .await?;
        info!(
            subject = actor.subject(),
            role = %role.name,
            permissions = role.permissions.len(),
            "role permissions synced"
        );

        Ok(role)
    }

    async fn load_role(&self, role_id: RoleId) -> AppResult<RoleDefinition> {
        self.repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))
    }
}
