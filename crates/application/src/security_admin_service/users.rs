use super::*;

use crate::security_admin_ports::{CreateUserInput, UpdateUserInput};

impl SecurityAdminService {
    /// Lists user accounts.
    pub async fn list_users(&self, actor: &UserIdentity) -> AppResult<Vec<UserAccount>> {
        self.require(actor, Ability::ManageUsers).await?;
        self.repository.list_users().await
    }

    /// Returns one user account.
    pub async fn get_user(&self, actor: &UserIdentity, user_id: UserId) -> AppResult<UserAccount> {
        self.require(actor, Ability::ManageUsers).await?;
        self.load_user(user_id).await
    }

    /// Creates a user without roles.
    pub async fn create_user(
        &self,
        actor: &UserIdentity,
        input: CreateUserInput,
    ) -> AppResult<UserAccount> {
        self.require(actor, Ability::ManageUsers).await?;

        let user = User::new(UserId::new(), input.name, input.email)?;
        let created = self.repository.create_user(user).await?;
        info!(subject = actor.subject(), user_id = %created.user_id, "user created");

        Ok(created)
    }

    /// Updates a user's name or email.
    pub async fn update_user(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<UserAccount> {
        self.require(actor, Ability::ManageUsers).await?;

        let existing = self.load_user(user_id).await?;
        let user = User::new(
            user_id,
            input.name.unwrap_or(existing.name),
            input.email.unwrap_or(existing.email),
        )?;
        let updated = self.repository.update_user(user).await?;
        info!(subject = actor.subject(), user_id = %user_id, "user updated");

        Ok(updated)
    }

    /// Deletes a user. Actors cannot delete themselves.
    pub async fn delete_user(&self, actor: &UserIdentity, user_id: UserId) -> AppResult<()> {
        self.require(actor, Ability::ManageUsers).await?;

        if actor.subject() == user_id.to_string() {
            return Err(AppError::Conflict(
                "users cannot delete their own account".to_owned(),
            ));
        }

        self.load_user(user_id).await?;
        self.repository.delete_user(user_id).await?;
        info!(subject = actor.subject(), user_id = %user_id, "user deleted");

        Ok(())
    }

    /// Replaces the roles assigned to a user.
    pub async fn sync_user_roles(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role_ids: Vec<RoleId>,
    ) -> AppResult<UserAccount> {
        self.require(actor, Ability::ManageUsers).await?;

        self.load_user(user_id).await?;
        let user = self.repository.sync_user_roles(user_id, &role_ids).await?;
        info!(
            subject = actor.subject(),
            user_id = %user_id,
            roles = user.roles.len(),
            "user roles synced"
        );

        Ok(user)
    }

    /// Returns a user's effective permissions.
    pub async fn user_permissions(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
    ) -> AppResult<BTreeSet<String>> {
        self.require(actor, Ability::ManageUsers).await?;

        self.load_user(user_id).await?;
        self.authorization_service
            .effective_permissions(&user_id.to_string())
            .await
    }

    async fn load_user(&self, user_id: UserId) -> AppResult<UserAccount> {
        self.repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }
}
