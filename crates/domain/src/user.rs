//! User domain types and validation rules.

use aula_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Maximum length of a user's display name.
pub const USER_NAME_MAX_LENGTH: usize = 255;

/// Maximum length of an email address (RFC 5321 path limit).
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// The value is trimmed and lowercased before the structural check in
    /// [`is_plausible_email`].
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        if !is_plausible_email(normalized.as_str()) {
            return Err(AppError::Validation(format!(
                "email address '{normalized}' is not valid"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Returns whether `value` has plausible email address syntax.
///
/// Requires exactly one `@`, a non-empty local part without leading, trailing
/// or doubled dots, a domain with at least two non-empty labels that do not
/// start or end with `-`, no whitespace, and at most
/// [`EMAIL_MAX_LENGTH`] bytes.
#[must_use]
pub fn is_plausible_email(value: &str) -> bool {
    if value.is_empty() || value.len() > EMAIL_MAX_LENGTH {
        return false;
    }

    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels
            .iter()
            .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

/// A back-office user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    user_id: UserId,
    name: NonEmptyString,
    email: EmailAddress,
}

impl User {
    /// Creates a validated user.
    pub fn new(user_id: UserId, name: impl Into<String>, email: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            user_id,
            name: NonEmptyString::bounded(name, USER_NAME_MAX_LENGTH, "user name")?,
            email: EmailAddress::new(email)?,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the normalized email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

#[cfg(test)]
mod tests {
    use super::{EmailAddress, User, is_plausible_email};
    use crate::UserId;

    #[test]
    fn plausible_email_accepts_common_addresses() {
        assert!(is_plausible_email("a@b.com"));
        assert!(is_plausible_email("first.last+tag@faculty.example.edu"));
    }

    #[test]
    fn plausible_email_rejects_malformed_addresses() {
        for value in [
            "not-an-email",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            "user@example..com",
            "user name@example.com",
            ".user@example.com",
            "user@-example.com",
        ] {
            assert!(!is_plausible_email(value), "accepted '{value}'");
        }
    }

    #[test]
    fn email_address_is_normalized() {
        let email = EmailAddress::new("  Dean@University.EDU ");
        assert!(email.is_ok());
        assert_eq!(
            email.map(String::from).unwrap_or_default(),
            "dean@university.edu"
        );
    }

    #[test]
    fn user_rejects_blank_name() {
        let user = User::new(UserId::new(), "  ", "dean@university.edu");
        assert!(user.is_err());
    }
}
