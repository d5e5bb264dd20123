use std::sync::Arc;

use aula_core::{AppError, AppResult, UserIdentity};
use aula_domain::{Ability, FormDefinition, FormId, FormSubmission, SubmissionId, UserId};

use crate::AuthorizationService;
use crate::form_ports::{FormRepository, FormSubmissionRepository};

mod definitions;
mod submissions;

/// Application service for custom forms and their submissions.
#[derive(Clone)]
pub struct FormService {
    authorization_service: AuthorizationService,
    form_repository: Arc<dyn FormRepository>,
    submission_repository: Arc<dyn FormSubmissionRepository>,
}

impl FormService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        form_repository: Arc<dyn FormRepository>,
        submission_repository: Arc<dyn FormSubmissionRepository>,
    ) -> Self {
        Self {
            authorization_service,
            form_repository,
            submission_repository,
        }
    }

    async fn require_form_manage_ability(&self, actor: &UserIdentity) -> AppResult<()> {
        self.authorization_service
            .require_ability(actor, Ability::ManageForms)
            .await
    }

    async fn require_submission_manage_ability(&self, actor: &UserIdentity) -> AppResult<()> {
        self.authorization_service
            .require_ability(actor, Ability::ManageFormSubmissions)
            .await
    }

    async fn load_form(&self, form_id: FormId) -> AppResult<FormDefinition> {
        self.form_repository
            .find_form(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("form '{form_id}' does not exist")))
    }

    async fn load_submission(&self, submission_id: SubmissionId) -> AppResult<FormSubmission> {
        self.submission_repository
            .find_submission(submission_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("form submission '{submission_id}' does not exist"))
            })
    }
}

fn actor_user_id(actor: &UserIdentity) -> Option<UserId> {
    actor.subject().parse().ok()
}
