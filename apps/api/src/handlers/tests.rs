use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use aula_application::{AuthorizationService, FormService, SecurityAdminService};
use aula_core::{AppResult, UserIdentity};
use aula_domain::{AccessGraph, Ability, Permission, PermissionId, Role, RoleId, User, UserId};
use aula_infrastructure::{InMemoryAccessRepository, InMemoryFormRepository};
use serde_json::{Map, Value, json};

use crate::dto::{
    CreateFormRequest, SubmissionListParams, SubmitFormRequest, SyncUserRolesRequest,
    UpdateFormRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::submissions::source_address;
use super::{forms, security, submissions};

fn state_with(graph: AccessGraph) -> AppState {
    let access_repository = Arc::new(InMemoryAccessRepository::with_graph(graph));
    let authorization_service = AuthorizationService::new(access_repository.clone());
    let form_repository = Arc::new(InMemoryFormRepository::new());

    AppState {
        form_service: FormService::new(
            authorization_service.clone(),
            form_repository.clone(),
            form_repository,
        ),
        security_admin_service: SecurityAdminService::new(
            authorization_service,
            access_repository,
        ),
        frontend_url: "http://localhost:3000".to_owned(),
        bootstrap_token: "bootstrap".to_owned(),
    }
}

/// Builds a graph holding every default permission and one user whose
/// single role grants `abilities`.
fn graph_with_actor(abilities: &[Ability]) -> AppResult<(AccessGraph, UserIdentity)> {
    let mut graph = AccessGraph::new();
    for ability in Ability::all() {
        graph.insert_permission(Permission::new(PermissionId::new(), ability.as_str())?)?;
    }

    let role_id = RoleId::new();
    graph.insert_role(Role::new(role_id, "Staff", None)?)?;
    let names: Vec<String> = abilities
        .iter()
        .map(|ability| ability.as_str().to_owned())
        .collect();
    graph.grant_permissions(role_id, &names)?;

    let user_id = UserId::new();
    graph.insert_user(User::new(user_id, "Ada", "ada@example.edu")?)?;
    graph.sync_user_roles(user_id, &[role_id])?;

    let subject = user_id.to_string();
    Ok((graph, UserIdentity::new(subject.clone(), subject, None)))
}

fn status_of<T: IntoResponse>(result: ApiResult<T>) -> StatusCode {
    match result {
        Ok(response) => response.into_response().status(),
        Err(error) => error.into_response().status(),
    }
}

async fn body_of<T: IntoResponse>(result: ApiResult<T>) -> Value {
    let response = match result {
        Ok(response) => response.into_response(),
        Err(error) => error.into_response(),
    };
    let bytes = match axum::body::to_bytes(response.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => panic!("failed to read response body: {error}"),
    };
    match serde_json::from_slice(&bytes) {
        Ok(body) => body,
        Err(error) => panic!("response body is not json: {error}"),
    }
}

async fn create_contact_form(state: &AppState, actor: &UserIdentity, active: bool) -> String {
    let created = forms::create_form_handler(
        State(state.clone()),
        Extension(actor.clone()),
        Json(CreateFormRequest {
            name: "Contact".to_owned(),
            code: "contact".to_owned(),
            is_active: Some(active),
            schema: Some(json!({
                "fields": [
                    {"name": "email", "type": "email", "required": true},
                    {"name": "note", "type": "string", "max": 20}
                ]
            })),
        }),
    )
    .await;

    match created {
        Ok((status, Json(form))) => {
            assert_eq!(status, StatusCode::CREATED);
            form.form_id
        }
        Err(error) => panic!("form creation failed: {:?}", error.0),
    }
}

fn submission(form_id: &str, payload: Value) -> SubmitFormRequest {
    SubmitFormRequest {
        form_id: form_id.to_owned(),
        payload: payload.as_object().cloned().unwrap_or_else(Map::new),
        attachment_media_id: None,
    }
}

#[tokio::test]
async fn invalid_submission_is_unprocessable() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageForms, Ability::ManageFormSubmissions])?;
    let state = state_with(graph);
    let form_id = create_contact_form(&state, &actor, true).await;

    let result = submissions::submit_form_handler(
        State(state),
        Extension(actor),
        HeaderMap::new(),
        Json(submission(form_id.as_str(), json!({"note": "hi"}))),
    )
    .await;

    assert_eq!(
        body_of(result).await,
        json!({
            "message": "the submitted payload is invalid",
            "errors": {"email": ["missing_field"]}
        })
    );
    Ok(())
}

#[tokio::test]
async fn valid_submission_is_created_with_source_address() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageForms, Ability::ManageFormSubmissions])?;
    let state = state_with(graph);
    let form_id = create_contact_form(&state, &actor, true).await;
    let mut headers = HeaderMap::new();
    headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));

    let result = submissions::submit_form_handler(
        State(state.clone()),
        Extension(actor.clone()),
        headers,
        Json(submission(
            form_id.as_str(),
            json!({"email": "x@y.com", "note": "hi"}),
        )),
    )
    .await;

    let Ok((status, Json(stored))) = result else {
        panic!("valid submission was rejected");
    };
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stored.source_address.as_deref(), Some("198.51.100.4"));
    assert_eq!(stored.payload.get("note"), Some(&Value::from("hi")));

    let listed = submissions::list_submissions_handler(
        State(state),
        Extension(actor),
        Query(SubmissionListParams {
            form_id: Some(form_id),
        }),
    )
    .await;
    let Ok(Json(listed)) = listed else {
        panic!("listing submissions failed");
    };
    assert_eq!(listed.len(), 1);
    Ok(())
}

#[tokio::test]
async fn inactive_form_is_not_found() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageForms, Ability::ManageFormSubmissions])?;
    let state = state_with(graph);
    let form_id = create_contact_form(&state, &actor, false).await;

    let result = submissions::submit_form_handler(
        State(state),
        Extension(actor),
        HeaderMap::new(),
        Json(submission(form_id.as_str(), json!({"email": "x@y.com"}))),
    )
    .await;

    assert_eq!(status_of(result), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn missing_ability_is_forbidden() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageEvents])?;
    let state = state_with(graph);

    let forms = forms::list_forms_handler(State(state.clone()), Extension(actor.clone())).await;
    assert_eq!(status_of(forms), StatusCode::FORBIDDEN);

    let users = security::list_users_handler(State(state), Extension(actor)).await;
    assert_eq!(status_of(users), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn duplicate_form_code_conflicts() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageForms])?;
    let state = state_with(graph);
    let form_id = create_contact_form(&state, &actor, true).await;

    let second = forms::create_form_handler(
        State(state.clone()),
        Extension(actor.clone()),
        Json(CreateFormRequest {
            name: "Other".to_owned(),
            code: "other".to_owned(),
            is_active: None,
            schema: None,
        }),
    )
    .await;
    assert_eq!(status_of(second), StatusCode::CREATED);

    let renamed = forms::update_form_handler(
        State(state),
        Extension(actor),
        Path(form_id),
        Json(UpdateFormRequest {
            code: Some("other".to_owned()),
            ..UpdateFormRequest::default()
        }),
    )
    .await;
    assert_eq!(status_of(renamed), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn malformed_identifiers_are_bad_requests() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageForms])?;
    let state = state_with(graph);

    let result = forms::get_form_handler(
        State(state),
        Extension(actor),
        Path("not-a-uuid".to_owned()),
    )
    .await;

    assert_eq!(status_of(result), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn user_role_sync_reports_effective_permissions() -> AppResult<()> {
    let (mut graph, actor) = graph_with_actor(&[Ability::ManageUsers])?;
    let editors = RoleId::new();
    graph.insert_role(Role::new(editors, "Editors", None)?)?;
    graph.grant_permissions(editors, &["manageForms".to_owned()])?;
    let target = UserId::new();
    graph.insert_user(User::new(target, "Grace", "grace@example.edu")?)?;
    let state = state_with(graph);

    let synced = security::sync_user_roles_handler(
        State(state.clone()),
        Extension(actor.clone()),
        Path(target.to_string()),
        Json(SyncUserRolesRequest {
            role_ids: vec![editors.to_string()],
        }),
    )
    .await;
    let Ok(Json(account)) = synced else {
        panic!("role sync failed");
    };
    assert_eq!(account.roles, vec!["Editors".to_owned()]);

    let permissions = security::user_permissions_handler(
        State(state),
        Extension(actor),
        Path(target.to_string()),
    )
    .await;
    let Ok(Json(permissions)) = permissions else {
        panic!("permission lookup failed");
    };
    assert_eq!(permissions.permissions, vec!["manageForms".to_owned()]);
    Ok(())
}

#[tokio::test]
async fn my_permissions_needs_no_ability() -> AppResult<()> {
    let (graph, actor) = graph_with_actor(&[Ability::ManageTags, Ability::ManageEvents])?;
    let state = state_with(graph);

    let result = security::my_permissions_handler(State(state), Extension(actor)).await;
    let Ok(Json(response)) = result else {
        panic!("my permissions failed");
    };
    assert_eq!(
        response.permissions,
        vec!["manageEvents".to_owned(), "manageTags".to_owned()]
    );
    Ok(())
}

#[test]
fn source_address_prefers_first_forwarded_hop() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
    );
    headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
    assert_eq!(source_address(&headers).as_deref(), Some("203.0.113.9"));

    let mut headers = HeaderMap::new();
    headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
    assert_eq!(source_address(&headers).as_deref(), Some("10.0.0.2"));

    assert_eq!(source_address(&HeaderMap::new()), None);
}
