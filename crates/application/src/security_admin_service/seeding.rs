use super::*;

use crate::security_admin_ports::CreateUserInput;

/// Name of the role that receives the default administrative grants.
pub const ADMINISTRATOR_ROLE_NAME: &str = "Administrator";

const ADMINISTRATOR_ROLE_DESCRIPTION: &str = "Full administrative access";

impl SecurityAdminService {
    /// Ensures every default ability exists as a permission and that the
    /// administrator role exists holding the administrative ones.
    ///
    /// Existing grants are never removed, so running it again is a no-op.
    /// Returns the number of permissions created.
    pub async fn seed_default_permissions(&self) -> AppResult<usize> {
        let mut created = 0;
        for ability in Ability::all() {
            if self
                .repository
                .find_permission_by_name(ability.as_str())
                .await?
                .is_some()
            {
                continue;
            }

            self.repository
                .create_permission(Permission::new(PermissionId::new(), ability.as_str())?)
                .await?;
            created += 1;
        }

        let grants: Vec<String> = Ability::administrative()
            .map(|ability| ability.as_str().to_owned())
            .collect();
        match self
            .repository
            .find_role_by_name(ADMINISTRATOR_ROLE_NAME)
            .await?
        {
            Some(role) => {
                self.repository
                    .grant_role_permissions(role.role_id, &grants)
                    .await?;
            }
            None => {
                let role = Role::new(
                    RoleId::new(),
                    ADMINISTRATOR_ROLE_NAME,
                    Some(ADMINISTRATOR_ROLE_DESCRIPTION.to_owned()),
                )?;
                self.repository.create_role(role, &grants).await?;
                info!(role = ADMINISTRATOR_ROLE_NAME, "administrator role created");
            }
        }

        info!(
            created,
            role = ADMINISTRATOR_ROLE_NAME,
            "default permissions seeded and granted"
        );

        Ok(created)
    }

    /// Ensures a user with the given email exists and holds the
    /// administrator role, keeping any roles it already has.
    ///
    /// Seeds the default permissions first when the administrator role is
    /// missing. An existing account keeps its stored name.
    pub async fn seed_administrator(&self, input: CreateUserInput) -> AppResult<UserAccount> {
        let administrator = match self
            .repository
            .find_role_by_name(ADMINISTRATOR_ROLE_NAME)
            .await?
        {
            Some(role) => role,
            None => {
                self.seed_default_permissions().await?;
                self.repository
                    .find_role_by_name(ADMINISTRATOR_ROLE_NAME)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal("administrator role was not seeded".to_owned())
                    })?
            }
        };

        let candidate = User::new(UserId::new(), input.name, input.email)?;
        let existing = self
            .repository
            .list_users()
            .await?
            .into_iter()
            .find(|account| account.email == candidate.email().as_str());
        let account = match existing {
            Some(account) => account,
            None => {
                let created = self.repository.create_user(candidate).await?;
                info!(user_id = %created.user_id, "administrator user created");
                created
            }
        };

        if account.roles.contains(&administrator.name) {
            return Ok(account);
        }

        let mut role_ids: Vec<RoleId> = self
            .repository
            .list_roles()
            .await?
            .into_iter()
            .filter(|role| account.roles.contains(&role.name))
            .map(|role| role.role_id)
            .collect();
        role_ids.push(administrator.role_id);

        let synced = self
            .repository
            .sync_user_roles(account.user_id, &role_ids)
            .await?;
        info!(
            user_id = %synced.user_id,
            role = ADMINISTRATOR_ROLE_NAME,
            "administrator role attached"
        );

        Ok(synced)
    }
}
