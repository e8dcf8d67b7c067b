use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde_json::json;

use super::domain::{EventDraft, EventId};
use super::repository::CalendarRepository;
use super::service::{CalendarService, CalendarServiceError};
use crate::store::RepositoryError;
use crate::workflows::members::access::{AccessError, Caller};
use crate::workflows::members::repository::AccountRepository;

/// Event management plus the calendar widget and dashboard read models.
pub fn calendar_router<S>(service: Arc<CalendarService<S>>) -> Router
where
    S: AccountRepository + CalendarRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/events",
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            "/api/v1/events/:event_id",
            get(detail_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .route("/api/v1/calendar/feed", get(feed_handler::<S>))
        .route("/api/v1/calendar/today", get(today_handler::<S>))
        .route("/api/v1/calendar/summary", get(summary_handler::<S>))
        .route("/api/v1/calendar/year-chart", get(year_chart_handler::<S>))
        .with_state(service)
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|viewer| service.events(Some(&viewer)));
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
    Json(draft): Json<EventDraft>,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.create_event(&actor, draft));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn detail_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
    Path(event_id): Path<u64>,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .viewer(caller)
        .and_then(|viewer| service.event(viewer.as_ref(), EventId(event_id)));
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
    Path(event_id): Path<u64>,
    Json(draft): Json<EventDraft>,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.update_event(&actor, EventId(event_id), draft));
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
    Path(event_id): Path<u64>,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|actor| service.delete_event(&actor, EventId(event_id)));
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn feed_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .viewer(caller)
        .and_then(|viewer| service.feed(viewer.as_ref()));
    respond(StatusCode::OK, result)
}

pub(crate) async fn today_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let today = Local::now().date_naive();
    let result = service
        .viewer(caller)
        .and_then(|viewer| service.events_on(viewer.as_ref(), today));
    respond(StatusCode::OK, result)
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let today = Local::now().date_naive();
    let result = service
        .caller(caller)
        .and_then(|viewer| service.summary(&viewer, today));
    respond(StatusCode::OK, result)
}

pub(crate) async fn year_chart_handler<S>(
    State(service): State<Arc<CalendarService<S>>>,
    caller: Caller,
) -> Response
where
    S: AccountRepository + CalendarRepository + 'static,
{
    let result = service
        .caller(caller)
        .and_then(|viewer| service.year_chart(&viewer));
    respond(StatusCode::OK, result)
}

fn respond<T: serde::Serialize>(
    status: StatusCode,
    result: Result<T, CalendarServiceError>,
) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: CalendarServiceError) -> Response {
    let status = match &error {
        CalendarServiceError::Access(AccessError::Unauthenticated) => StatusCode::UNAUTHORIZED,
        CalendarServiceError::Access(_) => StatusCode::FORBIDDEN,
        CalendarServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CalendarServiceError::EventNotFound(_)
        | CalendarServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CalendarServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CalendarServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
