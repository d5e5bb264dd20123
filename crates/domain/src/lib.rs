//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access_graph;
mod form;
pub mod form_compiler;
mod identifiers;
mod security;
mod submission;
mod user;

pub use access_graph::AccessGraph;
pub use form::{
    FORM_CODE_MAX_LENGTH, FORM_NAME_MAX_LENGTH, FieldSpec, FieldType, FormDefinition, FormSchema,
};
pub use form_compiler::{CompiledForm, FieldValidator, NormalizedPayload};
pub use identifiers::{FormId, PermissionId, RoleId, SubmissionId, UserId};
pub use security::{
    Ability, Permission, Principal, Role, RoleGrants, SECURITY_NAME_MAX_LENGTH, can,
    effective_permissions,
};
pub use submission::{FormSubmission, SOURCE_ADDRESS_MAX_LENGTH};
pub use user::{EMAIL_MAX_LENGTH, EmailAddress, USER_NAME_MAX_LENGTH, User, is_plausible_email};
