mod repositories;
mod roles;
mod users;

pub use repositories::SecurityAdminRepository;
pub use roles::{CreateRoleInput, RoleDefinition, UpdateRoleInput};
pub use users::{CreateUserInput, UpdateUserInput, UserAccount};
