use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::EnrollmentRecord;
use super::issuance::IssuanceError;
use super::repository::EnrollmentRepository;
use super::service::{AdministratorProfileEdit, EnrollmentService, EnrollmentServiceError};
use crate::store::RepositoryError;
use crate::workflows::members::access::{AccessError, Caller};
use crate::workflows::members::repository::{AccountRepository, ProfileRepository};
use crate::workflows::members::ProfileId;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueRequest {
    /// Defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<EnrollmentRecord>,
    pub available: Vec<EnrollmentRecord>,
}

/// Administrator endpoints for the enrollment pool.
pub fn enrollment_router<S>(service: Arc<EnrollmentService<S>>) -> Router
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/enrollment/pool",
            get(pool_handler::<S>).post(issue_handler::<S>),
        )
        .route(
            "/api/v1/enrollment/profiles/:profile_id",
            put(edit_profile_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn pool_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.available(&actor));

    match result {
        Ok(available) => {
            let view = PoolView {
                issued: None,
                available,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn issue_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    caller: Caller,
    request: Option<Json<IssueRequest>>,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let year = request.and_then(|Json(body)| body.year);
    let result = service.caller(caller).and_then(|actor| {
        let issued = match year {
            Some(year) => service.issue_for_year(&actor, year)?,
            None => service.issue(&actor)?,
        };
        let available = service.available(&actor)?;
        Ok(PoolView {
            issued: Some(issued),
            available,
        })
    });

    match result {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn edit_profile_handler<S>(
    State(service): State<Arc<EnrollmentService<S>>>,
    caller: Caller,
    Path(profile_id): Path<u64>,
    Json(edit): Json<AdministratorProfileEdit>,
) -> Response
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.edit_profile(&actor, ProfileId(profile_id), edit));

    match result {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: EnrollmentServiceError) -> Response {
    let status = match &error {
        EnrollmentServiceError::Access(AccessError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        EnrollmentServiceError::Access(_) => StatusCode::FORBIDDEN,
        EnrollmentServiceError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        EnrollmentServiceError::Assignment(_) | EnrollmentServiceError::Validation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EnrollmentServiceError::Issuance(IssuanceError::InvalidYear(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EnrollmentServiceError::Issuance(IssuanceError::CapacityExceeded { .. })
        | EnrollmentServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EnrollmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EnrollmentServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
