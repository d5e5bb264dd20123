use std::collections::HashMap;

use async_trait::async_trait;
use aula_application::{FormRepository, FormSubmissionRepository, SubmissionListQuery};
use aula_core::{AppError, AppResult};
use aula_domain::{FormDefinition, FormId, FormSubmission, SubmissionId};
use tokio::sync::RwLock;

/// In-memory form and submission repository.
#[derive(Debug, Default)]
pub struct InMemoryFormRepository {
    forms: RwLock<HashMap<FormId, FormDefinition>>,
    submissions: RwLock<HashMap<SubmissionId, FormSubmission>>,
}

impl InMemoryFormRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forms: RwLock::new(HashMap::new()),
            submissions: RwLock::new(HashMap::new()),
        }
    }
}

fn ensure_code_available(
    forms: &HashMap<FormId, FormDefinition>,
    form: &FormDefinition,
) -> AppResult<()> {
    let taken = forms
        .values()
        .any(|stored| stored.form_id() != form.form_id() && stored.code() == form.code());
    if taken {
        return Err(AppError::Conflict(format!(
            "form code '{}' already exists",
            form.code().as_str()
        )));
    }

    Ok(())
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn list_forms(&self) -> AppResult<Vec<FormDefinition>> {
        let mut forms: Vec<FormDefinition> = self.forms.read().await.values().cloned().collect();
        forms.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(forms)
    }

    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDefinition>> {
        Ok(self.forms.read().await.get(&form_id).cloned())
    }

    async fn create_form(&self, form: FormDefinition) -> AppResult<()> {
        let mut forms = self.forms.write().await;
        if forms.contains_key(&form.form_id()) {
            return Err(AppError::Conflict(format!(
                "form '{}' already exists",
                form.form_id()
            )));
        }
        ensure_code_available(&forms, &form)?;

        forms.insert(form.form_id(), form);
        Ok(())
    }

    async fn update_form(&self, form: FormDefinition) -> AppResult<()> {
        let mut forms = self.forms.write().await;
        if !forms.contains_key(&form.form_id()) {
            return Err(AppError::NotFound(format!(
                "form '{}' does not exist",
                form.form_id()
            )));
        }
        ensure_code_available(&forms, &form)?;

        forms.insert(form.form_id(), form);
        Ok(())
    }

    async fn delete_form(&self, form_id: FormId) -> AppResult<()> {
        if self.forms.write().await.remove(&form_id).is_none() {
            return Err(AppError::NotFound(format!("form '{form_id}' does not exist")));
        }

        self.submissions
            .write()
            .await
            .retain(|_, submission| submission.form_id() != form_id);
        Ok(())
    }
}

#[async_trait]
impl FormSubmissionRepository for InMemoryFormRepository {
    async fn create_submission(&self, submission: FormSubmission) -> AppResult<()> {
        if !self.forms.read().await.contains_key(&submission.form_id()) {
            return Err(AppError::NotFound(format!(
                "form '{}' does not exist",
                submission.form_id()
            )));
        }

        self.submissions
            .write()
            .await
            .insert(submission.submission_id(), submission);
        Ok(())
    }

    async fn list_submissions(
        &self,
        query: SubmissionListQuery,
    ) -> AppResult<Vec<FormSubmission>> {
        let mut submissions: Vec<FormSubmission> = self
            .submissions
            .read()
            .await
            .values()
            .filter(|submission| {
                query
                    .form_id
                    .is_none_or(|form_id| submission.form_id() == form_id)
            })
            .cloned()
            .collect();
        submissions.sort_by_key(|submission| std::cmp::Reverse(submission.submitted_at()));
        Ok(submissions)
    }

    async fn find_submission(
        &self,
        submission_id: SubmissionId,
    ) -> AppResult<Option<FormSubmission>> {
        Ok(self.submissions.read().await.get(&submission_id).cloned())
    }

    async fn delete_submission(&self, submission_id: SubmissionId) -> AppResult<()> {
        if self
            .submissions
            .write()
            .await
            .remove(&submission_id)
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "form submission '{submission_id}' does not exist"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use aula_application::{FormRepository, FormSubmissionRepository, SubmissionListQuery};
    use aula_core::{AppError, AppResult};
    use aula_domain::{FormDefinition, FormId, FormSchema, FormSubmission, SubmissionId};
    use chrono::Utc;
    use serde_json::Map;

    use super::InMemoryFormRepository;

    fn form(code: &str) -> AppResult<FormDefinition> {
        FormDefinition::new(
            FormId::new(),
            "Contact",
            code,
            true,
            FormSchema::default(),
            None,
        )
    }

    fn submission(form_id: FormId) -> FormSubmission {
        FormSubmission::new(
            SubmissionId::new(),
            form_id,
            Map::new(),
            Utc::now(),
            None,
            None,
        )
    }

    #[tokio::test]
    async fn form_codes_are_unique() -> AppResult<()> {
        let repository = InMemoryFormRepository::new();
        repository.create_form(form("contact")?).await?;

        let result = repository.create_form(form("contact")?).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_form_deletes_its_submissions() -> AppResult<()> {
        let repository = InMemoryFormRepository::new();
        let kept = form("kept")?;
        let removed = form("removed")?;
        let kept_id = kept.form_id();
        let removed_id = removed.form_id();
        repository.create_form(kept).await?;
        repository.create_form(removed).await?;
        repository.create_submission(submission(kept_id)).await?;
        repository.create_submission(submission(removed_id)).await?;

        repository.delete_form(removed_id).await?;

        let remaining = repository
            .list_submissions(SubmissionListQuery::default())
            .await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].form_id(), kept_id);
        Ok(())
    }

    #[tokio::test]
    async fn submissions_require_existing_form() {
        let repository = InMemoryFormRepository::new();

        let result = repository.create_submission(submission(FormId::new())).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
