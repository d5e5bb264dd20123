use async_trait::async_trait;

use aula_core::AppResult;
use aula_domain::{FormDefinition, FormId, FormSubmission, SubmissionId};

use super::inputs::SubmissionListQuery;

/// Repository port for form definitions.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Lists forms ordered by name.
    async fn list_forms(&self) -> AppResult<Vec<FormDefinition>>;

    /// Returns one form by id.
    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDefinition>>;

    /// Stores a new form. Fails with `Conflict` when the code is taken.
    async fn create_form(&self, form: FormDefinition) -> AppResult<()>;

    /// Replaces a stored form. Fails with `Conflict` when the code is taken.
    async fn update_form(&self, form: FormDefinition) -> AppResult<()>;

    /// Deletes a form together with its submissions.
    async fn delete_form(&self, form_id: FormId) -> AppResult<()>;
}

/// Repository port for accepted submissions.
#[async_trait]
pub trait FormSubmissionRepository: Send + Sync {
    /// Stores an accepted submission.
    async fn create_submission(&self, submission: FormSubmission) -> AppResult<()>;

    /// Lists submissions, newest first.
    async fn list_submissions(&self, query: SubmissionListQuery)
    -> AppResult<Vec<FormSubmission>>;

    /// Returns one submission by id.
    async fn find_submission(
        &self,
        submission_id: SubmissionId,
    ) -> AppResult<Option<FormSubmission>>;

    /// Deletes one submission.
    async fn delete_submission(&self, submission_id: SubmissionId) -> AppResult<()>;
}
