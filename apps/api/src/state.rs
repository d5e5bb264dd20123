use aula_application::{FormService, SecurityAdminService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub form_service: FormService,
    pub security_admin_service: SecurityAdminService,
    pub frontend_url: String,
    pub bootstrap_token: String,
}
