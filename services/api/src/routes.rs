use crate::infra::{AppState, GymServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use gym_desk::workflows::calendar::calendar_router;
use gym_desk::workflows::enrollment::enrollment_router;
use gym_desk::workflows::members::member_router;
use gym_desk::workflows::training::training_router;
use serde_json::json;

pub(crate) fn with_gym_routes(services: &GymServices) -> axum::Router {
    member_router(services.members.clone())
        .merge(enrollment_router(services.enrollment.clone()))
        .merge(training_router(services.training.clone()))
        .merge(calendar_router(services.calendar.clone()))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use gym_desk::config::MembershipConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let services = GymServices::in_memory(
            MembershipConfig::with_staff_domain("staff.gym.example").expect("valid domain"),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_gym_routes(&services).layer(Extension(state))
    }

    async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let payload = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).expect("json payload")
        };
        (status, payload)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (status, payload) = send(
            app(false),
            Request::get("/ready").body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        let (status, _) = send(
            app(true),
            Request::get("/ready").body(Body::empty()).expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn merged_router_serves_every_workflow() {
        let app = app(true);

        let (status, registration) = send(
            app.clone(),
            Request::post("/api/v1/accounts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "username": "coach",
                        "email": "coach@staff.gym.example",
                        "full_name": "Head Coach",
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let admin = registration["account"]["id"]
            .as_u64()
            .expect("account id")
            .to_string();

        let (status, pool) = send(
            app.clone(),
            Request::post("/api/v1/enrollment/pool")
                .header("x-account-id", admin.as_str())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "year": 2024 }).to_string()))
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(pool["issued"]["identifier"], "20241110001");

        let (status, exercises) = send(
            app.clone(),
            Request::get("/api/v1/exercises")
                .header("x-account-id", admin.as_str())
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exercises, json!([]));

        let (status, chart) = send(
            app,
            Request::get("/api/v1/calendar/year-chart")
                .header("x-account-id", admin.as_str())
                .body(Body::empty())
                .expect("request"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(chart, json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]));
    }
}
