use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use super::domain::{ExerciseDraft, ExerciseId, ProgramDraft, ProgramFilter, ProgramId};
use super::repository::TrainingRepository;
use super::service::{TrainingService, TrainingServiceError};
use crate::store::RepositoryError;
use crate::workflows::members::access::{AccessError, Caller};
use crate::workflows::members::repository::AccountRepository;

/// Exercise catalog and training program endpoints.
pub fn training_router<S>(service: Arc<TrainingService<S>>) -> Router
where
    S: AccountRepository + TrainingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/exercises",
            get(list_exercises_handler::<S>).post(create_exercise_handler::<S>),
        )
        .route(
            "/api/v1/exercises/:exercise_id",
            put(update_exercise_handler::<S>).delete(delete_exercise_handler::<S>),
        )
        .route(
            "/api/v1/programs",
            get(list_programs_handler::<S>).post(create_program_handler::<S>),
        )
        .route(
            "/api/v1/programs/:program_id",
            put(update_program_handler::<S>).delete(delete_program_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn list_exercises_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service.caller(caller).and_then(|_| service.exercises());
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_exercise_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Json(draft): Json<ExerciseDraft>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.create_exercise(&actor, draft));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn update_exercise_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Path(exercise_id): Path<u64>,
    Json(draft): Json<ExerciseDraft>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.update_exercise(&actor, ExerciseId(exercise_id), draft));
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_exercise_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Path(exercise_id): Path<u64>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.delete_exercise(&actor, ExerciseId(exercise_id)));
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_programs_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Query(filter): Query<ProgramFilter>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.programs(&actor, &filter));
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_program_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Json(draft): Json<ProgramDraft>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.create_program(&actor, draft));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn update_program_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Path(program_id): Path<u64>,
    Json(draft): Json<ProgramDraft>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.update_program(&actor, ProgramId(program_id), draft));
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_program_handler<S>(
    State(service): State<Arc<TrainingService<S>>>,
    caller: Caller,
    Path(program_id): Path<u64>,
) -> Response
where
    S: AccountRepository + TrainingRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.delete_program(&actor, ProgramId(program_id)));
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, TrainingServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TrainingServiceError) -> Response {
    let status = match &error {
        TrainingServiceError::Access(AccessError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        TrainingServiceError::Access(_) => StatusCode::FORBIDDEN,
        TrainingServiceError::Validation(_) | TrainingServiceError::OwnerNotFound(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TrainingServiceError::ExerciseNotFound(_)
        | TrainingServiceError::ProgramNotFound(_)
        | TrainingServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        TrainingServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        TrainingServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
