use aula_domain::RoleId;

/// Role definition returned to callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Names of granted permissions, sorted.
    pub permissions: Vec<String>,
}

/// Input payload for creating roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Permission names granted on creation.
    pub permissions: Vec<String>,
}

/// Partial role update. Absent values keep their current state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New unique name.
    pub name: Option<String>,
    /// New description. `Some("")` clears it.
    pub description: Option<String>,
}
