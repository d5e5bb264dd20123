//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_repository;
mod in_memory_form_repository;
mod postgres_authorization_repository;
mod postgres_form_repository;
mod postgres_security_admin_repository;

pub use in_memory_access_repository::InMemoryAccessRepository;
pub use in_memory_form_repository::InMemoryFormRepository;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
pub use postgres_form_repository::PostgresFormRepository;
pub use postgres_security_admin_repository::PostgresSecurityAdminRepository;
