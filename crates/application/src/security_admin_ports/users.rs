use aula_domain::UserId;

/// User account projection with assigned role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized unique email.
    pub email: String,
    /// Names of assigned roles, sorted.
    pub roles: Vec<String>,
}

/// Input payload for creating users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
}

/// Partial user update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// New display name.
    pub name: Option<String>,
    /// New unique email.
    pub email: Option<String>,
}
