use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::access::{AccessError, Caller};
use super::domain::{ProfileFilter, ProfileId, ProfileUpdate, RegistrationForm};
use super::repository::{AccountRepository, ProfileRepository};
use super::service::{MemberService, MemberServiceError};
use crate::store::RepositoryError;
use crate::workflows::enrollment::EnrollmentRepository;

/// Sign-up and profile endpoints.
pub fn member_router<S>(service: Arc<MemberService<S>>) -> Router
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/accounts", post(register_handler::<S>))
        .route("/api/v1/profiles", get(list_handler::<S>))
        .route(
            "/api/v1/profiles/me",
            get(own_profile_handler::<S>).put(update_own_handler::<S>),
        )
        .route("/api/v1/profiles/:profile_id", get(detail_handler::<S>))
        .with_state(service)
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<MemberService<S>>>,
    Json(form): Json<RegistrationForm>,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    match service.register(form) {
        Ok(registration) => (StatusCode::CREATED, Json(registration)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<MemberService<S>>>,
    caller: Caller,
    Query(filter): Query<ProfileFilter>,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.list_profiles(&actor, &filter));

    match result {
        Ok(profiles) => (StatusCode::OK, Json(profiles)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn own_profile_handler<S>(
    State(service): State<Arc<MemberService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.own_profile(&actor));

    match result {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_own_handler<S>(
    State(service): State<Arc<MemberService<S>>>,
    caller: Caller,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.update_own_profile(&actor, update));

    match result {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<MemberService<S>>>,
    caller: Caller,
    Path(profile_id): Path<u64>,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.profile_detail(&actor, ProfileId(profile_id)));

    match result {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: MemberServiceError) -> Response {
    let status = match &error {
        MemberServiceError::Access(AccessError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        MemberServiceError::Access(_) => StatusCode::FORBIDDEN,
        MemberServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MemberServiceError::EmailInUse(_)
        | MemberServiceError::UsernameTaken(_)
        | MemberServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        MemberServiceError::ProfileNotFound(_)
        | MemberServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        MemberServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
