use std::collections::BTreeSet;
use std::sync::Arc;

use aula_core::{AppError, AppResult, UserIdentity};
use aula_domain::{Ability, Permission, PermissionId, Role, RoleId, User, UserId};
use tracing::info;

use crate::AuthorizationService;
use crate::security_admin_ports::{RoleDefinition, SecurityAdminRepository, UserAccount};

mod permissions;
mod roles;
mod seeding;
mod users;

pub use seeding::ADMINISTRATOR_ROLE_NAME;

/// Application service for permission, role and user administration.
#[derive(Clone)]
pub struct SecurityAdminService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn SecurityAdminRepository>,
}

impl SecurityAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn SecurityAdminRepository>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
        }
    }

    /// Returns the caller's own effective permissions.
    pub async fn my_permissions(&self, actor: &UserIdentity) -> AppResult<BTreeSet<String>> {
        self.authorization_service
            .effective_permissions(actor.subject())
            .await
    }

    async fn require(&self, actor: &UserIdentity, ability: Ability) -> AppResult<()> {
        self.authorization_service
            .require_ability(actor, ability)
            .await
    }
}

#[cfg(test)]
mod tests;
