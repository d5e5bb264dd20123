use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use aula_core::{AppError, AppResult, UserIdentity};
use aula_domain::{Ability, Principal, UserId, can, effective_permissions};
use tracing::{debug, warn};

/// Repository port resolving a user's role graph.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Returns the user with its roles and their permission names, if the
    /// user exists.
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>>;
}

/// Application service for ability checks.
///
/// Effective permissions are recomputed from the repository on every call.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthorizationRepository>) -> Self {
        Self { repository }
    }

    /// Returns the sorted union of permission names held by the subject.
    ///
    /// Unknown subjects hold nothing.
    pub async fn effective_permissions(&self, subject: &str) -> AppResult<BTreeSet<String>> {
        Ok(self
            .resolve_principal(subject)
            .await?
            .map(|principal| effective_permissions(&principal))
            .unwrap_or_default())
    }

    /// Returns whether the subject holds the named ability.
    pub async fn can(&self, subject: &str, ability: &str) -> AppResult<bool> {
        let principal = self.resolve_principal(subject).await?;
        Ok(can(principal.as_ref(), ability))
    }

    /// Ensures the actor holds the ability, failing with `Forbidden` otherwise.
    pub async fn require_ability(&self, actor: &UserIdentity, ability: Ability) -> AppResult<()> {
        if self.can(actor.subject(), ability.as_str()).await? {
            return Ok(());
        }

        warn!(
            subject = actor.subject(),
            ability = ability.as_str(),
            "ability check denied"
        );
        Err(AppError::Forbidden(format!(
            "subject '{}' is missing ability '{}'",
            actor.subject(),
            ability.as_str()
        )))
    }

    async fn resolve_principal(&self, subject: &str) -> AppResult<Option<Principal>> {
        let Ok(user_id) = UserId::from_str(subject) else {
            debug!(subject, "subject is not a user id, resolving as unknown");
            return Ok(None);
        };

        self.repository.find_principal(user_id).await
    }
}
