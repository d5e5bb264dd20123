use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{FormId, SubmissionId};

/// Maximum stored length of a submission's source address.
pub const SOURCE_ADDRESS_MAX_LENGTH: usize = 64;

/// An accepted, immutable form submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    submission_id: SubmissionId,
    form_id: FormId,
    payload: Map<String, Value>,
    submitted_at: DateTime<Utc>,
    source_address: Option<String>,
    attachment_media_id: Option<Uuid>,
}

impl FormSubmission {
    /// Creates a submission record.
    ///
    /// The source address is trimmed, dropped when blank, and cut to
    /// [`SOURCE_ADDRESS_MAX_LENGTH`] characters.
    #[must_use]
    pub fn new(
        submission_id: SubmissionId,
        form_id: FormId,
        payload: Map<String, Value>,
        submitted_at: DateTime<Utc>,
        source_address: Option<String>,
        attachment_media_id: Option<Uuid>,
    ) -> Self {
        let source_address = source_address
            .map(|value| value.trim().chars().take(SOURCE_ADDRESS_MAX_LENGTH).collect::<String>())
            .filter(|value| !value.is_empty());

        Self {
            submission_id,
            form_id,
            payload,
            submitted_at,
            source_address,
            attachment_media_id,
        }
    }

    /// Returns the submission identifier.
    #[must_use]
    pub fn submission_id(&self) -> SubmissionId {
        self.submission_id
    }

    /// Returns the form this submission belongs to.
    #[must_use]
    pub fn form_id(&self) -> FormId {
        self.form_id
    }

    /// Returns the normalized payload.
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Returns when the submission was accepted.
    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Returns the address the submission came from, if known.
    #[must_use]
    pub fn source_address(&self) -> Option<&str> {
        self.source_address.as_deref()
    }

    /// Returns the attached media reference, if any.
    #[must_use]
    pub fn attachment_media_id(&self) -> Option<Uuid> {
        self.attachment_media_id
    }
}
