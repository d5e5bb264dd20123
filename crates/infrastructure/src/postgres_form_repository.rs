use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::debug;

use aula_application::{FormRepository, FormSubmissionRepository, SubmissionListQuery};
use aula_core::{AppError, AppResult};
use aula_domain::{FormDefinition, FormId, FormSchema, FormSubmission, SubmissionId, UserId};

mod submissions;


/// PostgreSQL-backed repository for custom forms and their submissions.
#[derive(Clone)]
pub struct PostgresFormRepository {
    pool: PgPool,
}

impl PostgresFormRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FormRow {
    id: uuid::Uuid,
    name: String,
    code: String,
    is_active: bool,
    schema: Value,
    created_by: Option<uuid::Uuid>,
}

#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: uuid::Uuid,
    form_id: uuid::Uuid,
    payload: Value,
    submitted_at: DateTime<Utc>,
    ip_address: Option<String>,
    attachment_media_id: Option<uuid::Uuid>,
}

fn form_from_row(row: FormRow) -> AppResult<FormDefinition> {
    let form_id = FormId::from_uuid(row.id);
    let schema = FormSchema::from_json(&row.schema).map_err(|error| {
        AppError::Internal(format!("invalid stored schema for form '{form_id}': {error}"))
    })?;

    FormDefinition::new(
        form_id,
        row.name,
        row.code,
        row.is_active,
        schema,
        row.created_by.map(UserId::from_uuid),
    )
    .map_err(|error| AppError::Internal(format!("invalid stored form '{form_id}': {error}")))
}

fn map_code_violation(error: sqlx::Error, form: &FormDefinition, step: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!(
            "form code '{}' already exists",
            form.code().as_str()
        ));
    }

    AppError::Internal(format!("failed to {step}: {error}"))
}

#[async_trait]
impl FormRepository for PostgresFormRepository {
    async fn list_forms(&self) -> AppResult<Vec<FormDefinition>> {
        let rows = sqlx::query_as::<_, FormRow>(
            r#"
            SELECT id, name, code, is_active, schema, created_by
            FROM forms
            ORDER BY name, code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list forms: {error}")))?;

        rows.into_iter().map(form_from_row).collect()
    }

    async fn find_form(&self, form_id: FormId) -> AppResult<Option<FormDefinition>> {
        sqlx::query_as::<_, FormRow>(
            r#"
            SELECT id, name, code, is_active, schema, created_by
            FROM forms
            WHERE id = $1
            "#,
        )
        .bind(form_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find form: {error}")))?
        .map(form_from_row)
        .transpose()
    }

    async fn create_form(&self, form: FormDefinition) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO forms (id, name, code, is_active, schema, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(form.form_id().as_uuid())
        .bind(form.name().as_str())
        .bind(form.code().as_str())
        .bind(form.is_active())
        .bind(form.schema().to_json())
        .bind(form.created_by().map(|user_id| user_id.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|error| map_code_violation(error, &form, "create form"))?;

        debug!(form_id = %form.form_id(), "form row inserted");
        Ok(())
    }

    async fn update_form(&self, form: FormDefinition) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE forms
            SET name = $2, code = $3, is_active = $4, schema = $5, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(form.form_id().as_uuid())
        .bind(form.name().as_str())
        .bind(form.code().as_str())
        .bind(form.is_active())
        .bind(form.schema().to_json())
        .execute(&self.pool)
        .await
        .map_err(|error| map_code_violation(error, &form, "update form"))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "form '{}' does not exist",
                form.form_id()
            )));
        }

        Ok(())
    }

    async fn delete_form(&self, form_id: FormId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM forms
            WHERE id = $1
            "#,
        )
        .bind(form_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete form: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!("form '{form_id}' does not exist")));
        }

        Ok(())
    }
}

#[async_trait]
impl FormSubmissionRepository for PostgresFormRepository {
    async fn create_submission(&self, submission: FormSubmission) -> AppResult<()> {
        self.create_submission_impl(submission).await
    }

    async fn list_submissions(
        &self,
        query: SubmissionListQuery,
    ) -> AppResult<Vec<FormSubmission>> {
        self.list_submissions_impl(query).await
    }

    async fn find_submission(
        &self,
        submission_id: SubmissionId,
    ) -> AppResult<Option<FormSubmission>> {
        self.find_submission_impl(submission_id).await
    }

    async fn delete_submission(&self, submission_id: SubmissionId) -> AppResult<()> {
        self.delete_submission_impl(submission_id).await
    }
}
