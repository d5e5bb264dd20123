//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod form_ports;
mod form_service;
mod security_admin_ports;
mod security_admin_service;

pub use authorization_service::{AuthorizationRepository, AuthorizationService};
pub use form_ports::{
    CreateFormInput, FormRepository, FormSubmissionRepository, SubmissionListQuery,
    SubmitFormInput, UpdateFormInput,
};
pub use form_service::FormService;
pub use security_admin_ports::{
    CreateRoleInput, CreateUserInput, RoleDefinition, SecurityAdminRepository, UpdateRoleInput,
    UpdateUserInput, UserAccount,
};
pub use security_admin_service::{ADMINISTRATOR_ROLE_NAME, SecurityAdminService};
