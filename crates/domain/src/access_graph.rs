//! Arena-backed role/permission/user graph.
//!
//! Nodes live in per-kind arenas addressed by index. Removing a node leaves a
//! tombstone so indices held by other nodes never shift; edges pointing at a
//! removed node are detached eagerly. Id and name tables map external keys
//! onto arena slots.

use std::collections::{BTreeSet, HashMap};

use aula_core::{AppError, AppResult};

use crate::security::{Principal, RoleGrants};
use crate::{Permission, PermissionId, Role, RoleId, User, UserId};

#[derive(Debug, Clone)]
struct RoleNode {
    role: Role,
    permissions: BTreeSet<usize>,
}

#[derive(Debug, Clone)]
struct UserNode {
    user: User,
    roles: BTreeSet<usize>,
}

/// In-memory access graph of permissions, roles and users.
#[derive(Debug, Clone, Default)]
pub struct AccessGraph {
    permissions: Vec<Option<Permission>>,
    roles: Vec<Option<RoleNode>>,
    users: Vec<Option<UserNode>>,
    permission_ids: HashMap<PermissionId, usize>,
    permission_names: HashMap<String, usize>,
    role_ids: HashMap<RoleId, usize>,
    role_names: HashMap<String, usize>,
    user_ids: HashMap<UserId, usize>,
    user_emails: HashMap<String, usize>,
}

impl AccessGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns live permissions ordered by name.
    #[must_use]
    pub fn permissions(&self) -> Vec<Permission> {
        let mut permissions: Vec<Permission> = self.permissions.iter().flatten().cloned().collect();
        permissions.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        permissions
    }

    /// Finds a permission by id.
    #[must_use]
    pub fn permission(&self, permission_id: PermissionId) -> Option<&Permission> {
        self.permission_ids
            .get(&permission_id)
            .and_then(|index| self.permissions[*index].as_ref())
    }

    /// Finds a permission by its unique name.
    #[must_use]
    pub fn permission_by_name(&self, name: &str) -> Option<&Permission> {
        self.permission_names
            .get(name)
            .and_then(|index| self.permissions[*index].as_ref())
    }

    /// Adds a permission, rejecting duplicate ids and names.
    pub fn insert_permission(&mut self, permission: Permission) -> AppResult<()> {
        let name = permission.name().as_str().to_owned();
        if self.permission_ids.contains_key(&permission.permission_id())
            || self.permission_names.contains_key(&name)
        {
            return Err(AppError::Conflict(format!(
                "permission '{name}' already exists"
            )));
        }

        let index = self.permissions.len();
        self.permission_ids.insert(permission.permission_id(), index);
        self.permission_names.insert(name, index);
        self.permissions.push(Some(permission));
        Ok(())
    }

    /// Renames a permission, keeping its role grants.
    pub fn rename_permission(
        &mut self,
        permission_id: PermissionId,
        name: impl Into<String>,
    ) -> AppResult<Permission> {
        let index = self.permission_index(permission_id)?;
        let renamed = Permission::new(permission_id, name)?;
        let new_name = renamed.name().as_str().to_owned();

        if let Some(existing) = self.permission_names.get(&new_name)
            && *existing != index
        {
            return Err(AppError::Conflict(format!(
                "permission '{new_name}' already exists"
            )));
        }

        if let Some(previous) = self.permissions[index].replace(renamed.clone()) {
            self.permission_names.remove(previous.name().as_str());
        }
        self.permission_names.insert(new_name, index);
        Ok(renamed)
    }

    /// Removes a permission and detaches it from every role.
    pub fn remove_permission(&mut self, permission_id: PermissionId) -> AppResult<Permission> {
        let index = self.permission_index(permission_id)?;
        let removed = self.permissions[index]
            .take()
            .ok_or_else(|| permission_not_found(permission_id))?;

        self.permission_ids.remove(&permission_id);
        self.permission_names.remove(removed.name().as_str());
        for role in self.roles.iter_mut().flatten() {
            role.permissions.remove(&index);
        }
        Ok(removed)
    }

    /// Returns live roles ordered by name.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .roles
            .iter()
            .flatten()
            .map(|node| node.role.clone())
            .collect();
        roles.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        roles
    }

    /// Finds a role by id.
    #[must_use]
    pub fn role(&self, role_id: RoleId) -> Option<&Role> {
        self.role_ids
            .get(&role_id)
            .and_then(|index| self.roles[*index].as_ref())
            .map(|node| &node.role)
    }

    /// Finds a role by its unique name.
    #[must_use]
    pub fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.role_names
            .get(name)
            .and_then(|index| self.roles[*index].as_ref())
            .map(|node| &node.role)
    }

    /// Adds a role without grants, rejecting duplicate ids and names.
    pub fn insert_role(&mut self, role: Role) -> AppResult<()> {
        let name = role.name().as_str().to_owned();
        if self.role_ids.contains_key(&role.role_id()) || self.role_names.contains_key(&name) {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        let index = self.roles.len();
        self.role_ids.insert(role.role_id(), index);
        self.role_names.insert(name, index);
        self.roles.push(Some(RoleNode {
            role,
            permissions: BTreeSet::new(),
        }));
        Ok(())
    }

    /// Replaces a role's name and description, keeping its edges.
    pub fn update_role(&mut self, role: Role) -> AppResult<()> {
        let index = self.role_index(role.role_id())?;
        let new_name = role.name().as_str().to_owned();

        if let Some(existing) = self.role_names.get(&new_name)
            && *existing != index
        {
            return Err(AppError::Conflict(format!("role '{new_name}' already exists")));
        }

        let node = self.roles[index]
            .as_mut()
            .ok_or_else(|| role_not_found(role.role_id()))?;
        let previous_name = node.role.name().as_str().to_owned();
        node.role = role;

        self.role_names.remove(&previous_name);
        self.role_names.insert(new_name, index);
        Ok(())
    }

    /// Removes a role and detaches it from every user.
    pub fn remove_role(&mut self, role_id: RoleId) -> AppResult<Role> {
        let index = self.role_index(role_id)?;
        let removed = self.roles[index]
            .take()
            .ok_or_else(|| role_not_found(role_id))?;

        self.role_ids.remove(&role_id);
        self.role_names.remove(removed.role.name().as_str());
        for user in self.users.iter_mut().flatten() {
            user.roles.remove(&index);
        }
        Ok(removed.role)
    }

    /// Returns the permissions granted to a role, ordered by name.
    pub fn role_permissions(&self, role_id: RoleId) -> AppResult<Vec<Permission>> {
        let node = self.role_node(role_id)?;
        let mut permissions: Vec<Permission> = node
            .permissions
            .iter()
            .filter_map(|index| self.permissions[*index].clone())
            .collect();
        permissions.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(permissions)
    }

    /// Adds grants to a role, keeping the ones it already has.
    pub fn grant_permissions(&mut self, role_id: RoleId, names: &[String]) -> AppResult<()> {
        let indices = self.permission_indices(names)?;
        let index = self.role_index(role_id)?;
        if let Some(node) = self.roles[index].as_mut() {
            node.permissions.extend(indices);
        }
        Ok(())
    }

    /// Removes one grant from a role. Revoking an absent grant is a no-op.
    pub fn revoke_permission(&mut self, role_id: RoleId, name: &str) -> AppResult<()> {
        let role_index = self.role_index(role_id)?;
        let Some(permission_index) = self.permission_names.get(name).copied() else {
            return Ok(());
        };

        if let Some(node) = self.roles[role_index].as_mut() {
            node.permissions.remove(&permission_index);
        }
        Ok(())
    }

    /// Replaces a role's grants with exactly `names`.
    pub fn sync_role_permissions(&mut self, role_id: RoleId, names: &[String]) -> AppResult<()> {
        let indices = self.permission_indices(names)?;
        let index = self.role_index(role_id)?;
        if let Some(node) = self.roles[index].as_mut() {
            node.permissions = indices;
        }
        Ok(())
    }

    /// Returns live users ordered by email.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .flatten()
            .map(|node| node.user.clone())
            .collect();
        users.sort_by(|left, right| left.email().as_str().cmp(right.email().as_str()));
        users
    }

    /// Finds a user by id.
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.user_ids
            .get(&user_id)
            .and_then(|index| self.users[*index].as_ref())
            .map(|node| &node.user)
    }

    /// Adds a user without roles, rejecting duplicate ids and emails.
    pub fn insert_user(&mut self, user: User) -> AppResult<()> {
        let email = user.email().as_str().to_owned();
        if self.user_ids.contains_key(&user.user_id()) || self.user_emails.contains_key(&email) {
            return Err(AppError::Conflict(format!(
                "a user with email '{email}' already exists"
            )));
        }

        let index = self.users.len();
        self.user_ids.insert(user.user_id(), index);
        self.user_emails.insert(email, index);
        self.users.push(Some(UserNode {
            user,
            roles: BTreeSet::new(),
        }));
        Ok(())
    }

    /// Replaces a user's name and email, keeping its roles.
    pub fn update_user(&mut self, user: User) -> AppResult<()> {
        let index = self.user_index(user.user_id())?;
        let new_email = user.email().as_str().to_owned();

        if let Some(existing) = self.user_emails.get(&new_email)
            && *existing != index
        {
            return Err(AppError::Conflict(format!(
                "a user with email '{new_email}' already exists"
            )));
        }

        let node = self.users[index]
            .as_mut()
            .ok_or_else(|| user_not_found(user.user_id()))?;
        let previous_email = node.user.email().as_str().to_owned();
        node.user = user;

        self.user_emails.remove(&previous_email);
        self.user_emails.insert(new_email, index);
        Ok(())
    }

    /// Removes a user and its role edges.
    pub fn remove_user(&mut self, user_id: UserId) -> AppResult<User> {
        let index = self.user_index(user_id)?;
        let removed = self.users[index]
            .take()
            .ok_or_else(|| user_not_found(user_id))?;

        self.user_ids.remove(&user_id);
        self.user_emails.remove(removed.user.email().as_str());
        Ok(removed.user)
    }

    /// Returns the roles held by a user, ordered by name.
    pub fn user_roles(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let index = self.user_index(user_id)?;
        let mut roles: Vec<Role> = self.users[index]
            .iter()
            .flat_map(|node| node.roles.iter())
            .filter_map(|role_index| self.roles[*role_index].as_ref())
            .map(|node| node.role.clone())
            .collect();
        roles.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(roles)
    }

    /// Replaces a user's roles with exactly `role_ids`.
    pub fn sync_user_roles(&mut self, user_id: UserId, role_ids: &[RoleId]) -> AppResult<()> {
        let roles = role_ids
            .iter()
            .map(|role_id| {
                self.role_ids.get(role_id).copied().ok_or_else(|| {
                    AppError::Validation(format!("unknown role '{role_id}'"))
                })
            })
            .collect::<AppResult<BTreeSet<_>>>()?;

        let index = self.user_index(user_id)?;
        if let Some(node) = self.users[index].as_mut() {
            node.roles = roles;
        }
        Ok(())
    }

    /// Resolves a user's roles and their permission names.
    ///
    /// Returns `None` for unknown users.
    #[must_use]
    pub fn principal(&self, user_id: UserId) -> Option<Principal> {
        let node = self
            .user_ids
            .get(&user_id)
            .and_then(|index| self.users[*index].as_ref())?;

        let roles = node
            .roles
            .iter()
            .filter_map(|role_index| self.roles[*role_index].as_ref())
            .map(|role| RoleGrants {
                role_name: role.role.name().as_str().to_owned(),
                permissions: role
                    .permissions
                    .iter()
                    .filter_map(|index| self.permissions[*index].as_ref())
                    .map(|permission| permission.name().as_str().to_owned())
                    .collect(),
            })
            .collect();

        Some(Principal::new(user_id, roles))
    }

    fn permission_index(&self, permission_id: PermissionId) -> AppResult<usize> {
        self.permission_ids
            .get(&permission_id)
            .copied()
            .ok_or_else(|| permission_not_found(permission_id))
    }

    fn permission_indices(&self, names: &[String]) -> AppResult<BTreeSet<usize>> {
        names
            .iter()
            .map(|name| {
                self.permission_names.get(name.as_str()).copied().ok_or_else(|| {
                    AppError::Validation(format!("unknown permission '{name}'"))
                })
            })
            .collect()
    }

    fn role_index(&self, role_id: RoleId) -> AppResult<usize> {
        self.role_ids
            .get(&role_id)
            .copied()
            .ok_or_else(|| role_not_found(role_id))
    }

    fn role_node(&self, role_id: RoleId) -> AppResult<&RoleNode> {
        let index = self.role_index(role_id)?;
        self.roles[index]
            .as_ref()
            .ok_or_else(|| role_not_found(role_id))
    }

    fn user_index(&self, user_id: UserId) -> AppResult<usize> {
        self.user_ids
            .get(&user_id)
            .copied()
            .ok_or_else(|| user_not_found(user_id))
    }
}

fn permission_not_found(permission_id: PermissionId) -> AppError {
    AppError::NotFound(format!("permission '{permission_id}' does not exist"))
}

fn role_not_found(role_id: RoleId) -> AppError {
    AppError::NotFound(format!("role '{role_id}' does not exist"))
}

fn user_not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user '{user_id}' does not exist"))
}
