use std::collections::BTreeSet;

use aula_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{PermissionId, RoleId, UserId};

/// Maximum length of role and permission names.
pub const SECURITY_NAME_MAX_LENGTH: usize = 255;

/// Abilities gating the manageable resources of the site.
///
/// Abilities are checked by name, so permissions outside this catalogue are
/// still honoured; the catalogue drives seeding and service gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    /// Allows managing user accounts and their roles.
    ManageUsers,
    /// Allows editing one's own profile.
    ManageOwnProfile,
    /// Allows managing permissions.
    ManagePermissions,
    /// Allows managing roles and their grants.
    ManageRoles,
    /// Allows managing media.
    ManageMedia,
    /// Allows managing categories.
    ManageCategories,
    /// Allows managing tags.
    ManageTags,
    /// Allows managing publications.
    ManagePublications,
    /// Allows managing events.
    ManageEvents,
    /// Allows managing faculties.
    ManageFaculties,
    /// Allows managing academic programs.
    ManagePrograms,
    /// Allows managing people.
    ManagePeople,
    /// Allows managing custom forms.
    ManageForms,
    /// Allows managing form submissions.
    ManageFormSubmissions,
}

impl Ability {
    /// Returns the permission name backing this ability.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "manageUsers",
            Self::ManageOwnProfile => "manageOwnProfile",
            Self::ManagePermissions => "managePermissions",
            Self::ManageRoles => "manageRoles",
            Self::ManageMedia => "manageMedia",
            Self::ManageCategories => "manageCategories",
            Self::ManageTags => "manageTags",
            Self::ManagePublications => "managePublications",
            Self::ManageEvents => "manageEvents",
            Self::ManageFaculties => "manageFaculties",
            Self::ManagePrograms => "managePrograms",
            Self::ManagePeople => "managePeople",
            Self::ManageForms => "manageForms",
            Self::ManageFormSubmissions => "manageFormSubmissions",
        }
    }

    /// Returns all known abilities.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Ability] = &[
            Ability::ManageUsers,
            Ability::ManageOwnProfile,
            Ability::ManagePermissions,
            Ability::ManageRoles,
            Ability::ManageMedia,
            Ability::ManageCategories,
            Ability::ManageTags,
            Ability::ManagePublications,
            Ability::ManageEvents,
            Ability::ManageFaculties,
            Ability::ManagePrograms,
            Ability::ManagePeople,
            Ability::ManageForms,
            Ability::ManageFormSubmissions,
        ];

        ALL
    }

    /// Abilities granted to the administrator role by default.
    pub fn administrative() -> impl Iterator<Item = Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|ability| *ability != Self::ManageOwnProfile)
    }
}

/// Atomic capability that can be granted to roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    permission_id: PermissionId,
    name: NonEmptyString,
}

impl Permission {
    /// Creates a validated permission.
    pub fn new(permission_id: PermissionId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            permission_id,
            name: validated_name(name, "permission name")?,
        })
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn permission_id(&self) -> PermissionId {
        self.permission_id
    }

    /// Returns the unique permission name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }
}

/// Named bundle of permissions assignable to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    role_id: RoleId,
    name: NonEmptyString,
    description: Option<String>,
}

impl Role {
    /// Creates a validated role. Blank descriptions are dropped.
    pub fn new(
        role_id: RoleId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            role_id,
            name: validated_name(name, "role name")?,
            description: description
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn validated_name(value: impl Into<String>, label: &str) -> AppResult<NonEmptyString> {
    let value = value.into();
    NonEmptyString::bounded(value.trim(), SECURITY_NAME_MAX_LENGTH, label)
}

/// One role held by a principal, with the permission names it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrants {
    /// Role name.
    pub role_name: String,
    /// Names of permissions granted by the role.
    pub permissions: Vec<String>,
}

/// A user with its role graph resolved for authorization checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    roles: Vec<RoleGrants>,
}

impl Principal {
    /// Creates a principal from a user and its resolved roles.
    #[must_use]
    pub fn new(user_id: UserId, roles: Vec<RoleGrants>) -> Self {
        Self { user_id, roles }
    }

    /// Returns the principal's user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the resolved roles.
    #[must_use]
    pub fn roles(&self) -> &[RoleGrants] {
        &self.roles
    }
}

/// Returns the union of permission names across all of the principal's roles.
#[must_use]
pub fn effective_permissions(principal: &Principal) -> BTreeSet<String> {
    principal
        .roles
        .iter()
        .flat_map(|role| role.permissions.iter().cloned())
        .collect()
}

/// Returns whether the principal holds `ability` through any of its roles.
///
/// An absent principal holds nothing.
#[must_use]
pub fn can(principal: Option<&Principal>, ability: &str) -> bool {
    principal
        .map(|principal| {
            principal
                .roles
                .iter()
                .any(|role| role.permissions.iter().any(|name| name == ability))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{Ability, Permission, Principal, Role, RoleGrants, can, effective_permissions};
    use crate::{PermissionId, RoleId, UserId};

    fn grants(role_name: &str, permissions: &[&str]) -> RoleGrants {
        RoleGrants {
            role_name: role_name.to_owned(),
            permissions: permissions.iter().map(|name| (*name).to_owned()).collect(),
        }
    }

    #[test]
    fn effective_permissions_collapse_duplicates() {
        let principal = Principal::new(
            UserId::new(),
            vec![grants("A", &["p1", "p2"]), grants("B", &["p2", "p3"])],
        );

        let expected: BTreeSet<String> = ["p1", "p2", "p3"]
            .into_iter()
            .map(ToOwned::to_owned)
            .collect();
        assert_eq!(effective_permissions(&principal), expected);
    }

    #[test]
    fn can_requires_membership_in_effective_set() {
        let principal = Principal::new(
            UserId::new(),
            vec![grants("A", &["p1", "p2"]), grants("B", &["p2", "p3"])],
        );

        assert!(can(Some(&principal), "p3"));
        assert!(!can(Some(&principal), "p4"));
    }

    #[test]
    fn can_fails_closed_without_principal() {
        assert!(!can(None, "manageEvents"));
    }

    #[test]
    fn principal_without_roles_has_no_permissions() {
        let principal = Principal::new(UserId::new(), Vec::new());
        assert!(effective_permissions(&principal).is_empty());
        assert!(!can(Some(&principal), "manageForms"));
    }

    #[test]
    fn ability_storage_values_are_unique() {
        let names: BTreeSet<&str> = Ability::all().iter().map(Ability::as_str).collect();
        assert_eq!(names.len(), Ability::all().len());
    }

    #[test]
    fn administrative_abilities_exclude_own_profile() {
        assert!(Ability::administrative().all(|ability| ability != Ability::ManageOwnProfile));
        assert_eq!(Ability::administrative().count(), Ability::all().len() - 1);
    }

    #[test]
    fn role_and_permission_names_are_trimmed_and_bounded() {
        let role = Role::new(RoleId::new(), "  Editor ", Some("  ".to_owned()));
        assert!(role.is_ok());
        let role = role.ok();
        assert_eq!(role.as_ref().map(|role| role.name().as_str()), Some("Editor"));
        assert_eq!(role.as_ref().and_then(Role::description), None);

        assert!(Permission::new(PermissionId::new(), "x".repeat(256)).is_err());
        assert!(Permission::new(PermissionId::new(), "").is_err());
    }
}
