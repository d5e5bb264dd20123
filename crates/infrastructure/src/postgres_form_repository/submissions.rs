use serde_json::Map;

use super::*;

impl PostgresFormRepository {
    pub(super) async fn create_submission_impl(&self, submission: FormSubmission) -> AppResult<()> {
        let insert = sqlx::query(
            r#"
            INSERT INTO form_submissions (
                id, form_id, payload, submitted_at, ip_address, attachment_media_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(submission.submission_id().as_uuid())
        .bind(submission.form_id().as_uuid())
        .bind(Value::Object(submission.payload().clone()))
        .bind(submission.submitted_at())
        .bind(submission.source_address())
        .bind(submission.attachment_media_id())
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(database_error))
                if database_error.code().as_deref() == Some("23503") =>
            {
                Err(AppError::NotFound(format!(
                    "form '{}' does not exist",
                    submission.form_id()
                )))
            }
            Err(error) => Err(AppError::Internal(format!(
                "failed to store form submission: {error}"
            ))),
        }
    }

    pub(super) async fn list_submissions_impl(
        &self,
        query: SubmissionListQuery,
    ) -> AppResult<Vec<FormSubmission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, form_id, payload, submitted_at, ip_address, attachment_media_id
            FROM form_submissions
            WHERE ($1::UUID IS NULL OR form_id = $1)
            ORDER BY submitted_at DESC, id
            "#,
        )
        .bind(query.form_id.map(|form_id| form_id.as_uuid()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list form submissions: {error}")))?;

        rows.into_iter().map(submission_from_row).collect()
    }

    pub(super) async fn find_submission_impl(
        &self,
        submission_id: SubmissionId,
    ) -> AppResult<Option<FormSubmission>> {
        sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, form_id, payload, submitted_at, ip_address, attachment_media_id
            FROM form_submissions
            WHERE id = $1
            "#,
        )
        .bind(submission_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find form submission: {error}")))?
        .map(submission_from_row)
        .transpose()
    }

    pub(super) async fn delete_submission_impl(&self, submission_id: SubmissionId) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM form_submissions
            WHERE id = $1
            "#,
        )
        .bind(submission_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete form submission: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "form submission '{submission_id}' does not exist"
            )));
        }

        Ok(())
    }
}

fn submission_from_row(row: SubmissionRow) -> AppResult<FormSubmission> {
    let payload = match row.payload {
        Value::Object(payload) => payload,
        Value::Null => Map::new(),
        _ => {
            return Err(AppError::Internal(format!(
                "stored payload of form submission '{}' is not an object",
                row.id
            )));
        }
    };

    Ok(FormSubmission::new(
        SubmissionId::from_uuid(row.id),
        FormId::from_uuid(row.form_id),
        payload,
        row.submitted_at,
        row.ip_address,
        row.attachment_media_id,
    ))
}
