use super::*;

impl SecurityAdminService {
    /// Lists permissions.
    pub async fn list_permissions(&self, actor: &UserIdentity) -> AppResult<Vec<Permission>> {
        self.require(actor, Ability::ManagePermissions).await?;
        self.repository.list_permissions().await
    }

    /// Returns one permission.
    pub async fn get_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
    ) -> AppResult<Permission> {
        self.require(actor, Ability::ManagePermissions).await?;
        self.load_permission(permission_id).await
    }

    /// Creates a permission.
    pub async fn create_permission(
        &self,
        actor: &UserIdentity,
        name: &str,
    ) -> AppResult<Permission> {
        self.require(actor, Ability::ManagePermissions).await?;

        let permission = Permission::new(PermissionId::new(), name)?;
        self.repository.create_permission(permission.clone()).await?;
        info!(
            subject = actor.subject(),
            permission = permission.name().as_str(),
            "permission created"
        );

        Ok(permission)
    }

    /// Renames a permission, keeping its role grants.
    pub async fn rename_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
        name: &str,
    ) -> AppResult<Permission> {
        self.require(actor, Ability::ManagePermissions).await?;

        self.load_permission(permission_id).await?;
        let permission = Permission::new(permission_id, name)?;
        self.repository.update_permission(permission.clone()).await?;
        info!(
            subject = actor.subject(),
            permission_id = %permission_id,
            permission = permission.name().as_str(),
            "permission renamed"
        );

        Ok(permission)
    }

    /// Deletes a permission and revokes it from every role.
    pub async fn delete_permission(
        &self,
        actor: &UserIdentity,
        permission_id: PermissionId,
    ) -> AppResult<()> {
        self.require(actor, Ability::ManagePermissions).await?;

        let permission = self.load_permission(permission_id).await?;
        self.repository.delete_permission(permission_id).await?;
        info!(
            subject = actor.subject(),
            permission = permission.name().as_str(),
            "permission deleted"
        );

        Ok(())
    }

    async fn load_permission(&self, permission_id: PermissionId) -> AppResult<Permission> {
        self.repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("permission '{permission_id}' does not exist"))
            })
    }
}
