use aula_domain::FormSchema;
use tracing::info;

use super::*;

use crate::form_ports::{CreateFormInput, UpdateFormInput};

impl FormService {
    /// Lists forms for administrative users.
    pub async fn list_forms(&self, actor: &UserIdentity) -> AppResult<Vec<FormDefinition>> {
        self.require_form_manage_ability(actor).await?;
        self.form_repository.list_forms().await
    }

    /// Returns one form.
    pub async fn get_form(&self, actor: &UserIdentity, form_id: FormId) -> AppResult<FormDefinition> {
        self.require_form_manage_ability(actor).await?;
        self.load_form(form_id).await
    }

    /// Creates a form after parsing and compiling its schema.
    pub async fn create_form(
        &self,
        actor: &UserIdentity,
        input: CreateFormInput,
    ) -> AppResult<FormDefinition> {
        self.require_form_manage_ability(actor).await?;

        let schema = FormSchema::from_json(&input.schema)?;
        let form = FormDefinition::new(
            FormId::new(),
            input.name,
            input.code,
            input.is_active.unwrap_or(true),
            schema,
            actor_user_id(actor),
        )?;

        self.form_repository.create_form(form.clone()).await?;
        info!(
            subject = actor.subject(),
            form_id = %form.form_id(),
            code = form.code().as_str(),
            "form created"
        );

        Ok(form)
    }

    /// Applies a partial update and recompiles the schema.
    pub async fn update_form(
        &self,
        actor: &UserIdentity,
        form_id: FormId,
        input: UpdateFormInput,
    ) -> AppResult<FormDefinition> {
        self.require_form_manage_ability(actor).await?;

        let existing = self.load_form(form_id).await?;
        let schema = match input.schema {
            Some(schema) => FormSchema::from_json(&schema)?,
            None => existing.schema().clone(),
        };

        let form = FormDefinition::new(
            form_id,
            input
                .name
                .unwrap_or_else(|| existing.name().as_str().to_owned()),
            input
                .code
                .unwrap_or_else(|| existing.code().as_str().to_owned()),
            input.is_active.unwrap_or(existing.is_active()),
            schema,
            existing.created_by(),
        )?;

        self.form_repository.update_form(form.clone()).await?;
        info!(subject = actor.subject(), form_id = %form_id, "form updated");

        Ok(form)
    }

    /// Deletes a form and its submissions.
    pub async fn delete_form(&self, actor: &UserIdentity, form_id: FormId) -> AppResult<()> {
        self.require_form_manage_ability(actor).await?;

        self.load_form(form_id).await?;
        self.form_repository.delete_form(form_id).await?;
        info!(subject = actor.subject(), form_id = %form_id, "form deleted");

        Ok(())
    }
}
