use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::enrollment::{EnrollmentServiceError, IssuanceError};
use crate::workflows::calendar::CalendarServiceError;
use crate::workflows::members::MemberServiceError;
use crate::workflows::training::TrainingServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Issuance(IssuanceError),
    Enrollment(EnrollmentServiceError),
    Members(MemberServiceError),
    Training(TrainingServiceError),
    Calendar(CalendarServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Issuance(err) => write!(f, "issuance error: {}", err),
            AppError::Enrollment(err) => write!(f, "enrollment error: {}", err),
            AppError::Members(err) => write!(f, "membership error: {}", err),
            AppError::Training(err) => write!(f, "training error: {}", err),
            AppError::Calendar(err) => write!(f, "calendar error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Issuance(err) => Some(err),
            AppError::Enrollment(err) => Some(err),
            AppError::Members(err) => Some(err),
            AppError::Training(err) => Some(err),
            AppError::Calendar(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Issuance(_) => StatusCode::BAD_REQUEST,
            AppError::Enrollment(_)
            | AppError::Members(_)
            | AppError::Training(_)
            | AppError::Calendar(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<IssuanceError> for AppError {
    fn from(value: IssuanceError) -> Self {
        Self::Issuance(value)
    }
}

impl From<EnrollmentServiceError> for AppError {
    fn from(value: EnrollmentServiceError) -> Self {
        Self::Enrollment(value)
    }
}

impl From<MemberServiceError> for AppError {
    fn from(value: MemberServiceError) -> Self {
        Self::Members(value)
    }
}

impl From<TrainingServiceError> for AppError {
    fn from(value: TrainingServiceError) -> Self {
        Self::Training(value)
    }
}

impl From<CalendarServiceError> for AppError {
    fn from(value: CalendarServiceError) -> Self {
        Self::Calendar(value)
    }
}
