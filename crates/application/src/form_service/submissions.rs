use chrono::Utc;
use tracing::{debug, info};

use super::*;

use crate::form_ports::{SubmissionListQuery, SubmitFormInput};

impl FormService {
    /// Validates a payload against the form's compiled schema and stores it.
    ///
    /// Missing and inactive forms are reported as not found before any
    /// field is checked.
    pub async fn submit(
        &self,
        actor: &UserIdentity,
        input: SubmitFormInput,
    ) -> AppResult<FormSubmission> {
        self.require_submission_manage_ability(actor).await?;

        let form = self
            .form_repository
            .find_form(input.form_id)
            .await?
            .filter(FormDefinition::is_active)
            .ok_or_else(|| AppError::NotFound("form not found or is inactive".to_owned()))?;

        let normalized = form.compiled().validate(&input.payload).map_err(|errors| {
            debug!(
                form_id = %form.form_id(),
                fields = errors.len(),
                "form submission rejected"
            );
            AppError::InvalidPayload(errors)
        })?;

        let submission = FormSubmission::new(
            SubmissionId::new(),
            form.form_id(),
            normalized.into_map(),
            Utc::now(),
            input.source_address,
            input.attachment_media_id,
        );

        self.submission_repository
            .create_submission(submission.clone())
            .await?;
        info!(
            form_id = %form.form_id(),
            submission_id = %submission.submission_id(),
            "form submission accepted"
        );

        Ok(submission)
    }

    /// Lists submissions, optionally for one form.
    pub async fn list_submissions(
        &self,
        actor: &UserIdentity,
        query: SubmissionListQuery,
    ) -> AppResult<Vec<FormSubmission>> {
        self.require_submission_manage_ability(actor).await?;
        self.submission_repository.list_submissions(query).await
    }

    /// Returns one submission.
    pub async fn get_submission(
        &self,
        actor: &UserIdentity,
        submission_id: SubmissionId,
    ) -> AppResult<FormSubmission> {
        self.require_submission_manage_ability(actor).await?;
        self.load_submission(submission_id).await
    }

    /// Deletes one submission.
    pub async fn delete_submission(
        &self,
        actor: &UserIdentity,
        submission_id: SubmissionId,
    ) -> AppResult<()> {
        self.require_submission_manage_ability(actor).await?;

        self.load_submission(submission_id).await?;
        self.submission_repository
            .delete_submission(submission_id)
            .await
    }
}
