use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use aula_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let cors_layer = cors::build_cors_layer(app_state.frontend_url.as_str())?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes())
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route(
            "/api/me/permissions",
            get(handlers::security::my_permissions_handler),
        )
        .route(
            "/api/forms",
            get(handlers::forms::list_forms_handler).post(handlers::forms::create_form_handler),
        )
        .route(
            "/api/forms/{form_id}",
            get(handlers::forms::get_form_handler)
                .put(handlers::forms::update_form_handler)
                .delete(handlers::forms::delete_form_handler),
        )
        .route(
            "/api/form-submissions",
            get(handlers::submissions::list_submissions_handler)
                .post(handlers::submissions::submit_form_handler),
        )
        .route(
            "/api/form-submissions/{submission_id}",
            get(handlers::submissions::get_submission_handler)
                .delete(handlers::submissions::delete_submission_handler),
        )
        .route(
            "/api/permissions",
            get(handlers::security::list_permissions_handler)
                .post(handlers::security::create_permission_handler),
        )
        .route(
            "/api/permissions/{permission_id}",
            get(handlers::security::get_permission_handler)
                .put(handlers::security::rename_permission_handler)
                .delete(handlers::security::delete_permission_handler),
        )
        .route(
            "/api/roles",
            get(handlers::security::list_roles_handler)
                .post(handlers::security::create_role_handler),
        )
        .route(
            "/api/roles/{role_id}",
            get(handlers::security::get_role_handler)
                .put(handlers::security::update_role_handler)
                .delete(handlers::security::delete_role_handler),
        )
        .route(
            "/api/roles/{role_id}/permissions",
            get(handlers::security::list_role_permissions_handler)
                .put(handlers::security::sync_role_permissions_handler),
        )
        .route(
            "/api/users",
            get(handlers::security::list_users_handler)
                .post(handlers::security::create_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            get(handlers::security::get_user_handler)
                .put(handlers::security::update_user_handler)
                .delete(handlers::security::delete_user_handler),
        )
        .route(
            "/api/users/{user_id}/roles",
            put(handlers::security::sync_user_roles_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            get(handlers::security::user_permissions_handler),
        )
        .route_layer(from_fn(middleware::require_auth))
}
