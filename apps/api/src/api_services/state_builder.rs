use std::sync::Arc;

use aula_application::{AuthorizationService, FormService, SecurityAdminService};
use aula_infrastructure::{
    PostgresAuthorizationRepository, PostgresFormRepository, PostgresSecurityAdminRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let authorization_service =
        AuthorizationService::new(Arc::new(PostgresAuthorizationRepository::new(pool.clone())));
    let form_repository = Arc::new(PostgresFormRepository::new(pool.clone()));

    AppState {
        form_service: FormService::new(
            authorization_service.clone(),
            form_repository.clone(),
            form_repository,
        ),
        security_admin_service: SecurityAdminService::new(
            authorization_service,
            Arc::new(PostgresSecurityAdminRepository::new(pool)),
        ),
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
    }
}
