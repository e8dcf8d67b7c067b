//! Sign-up, profile visibility and the profile list served over HTTP.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use gym_desk::config::MembershipConfig;
use gym_desk::store::MemoryStore;
use gym_desk::workflows::members::{
    member_router, MemberService, MemberServiceError, ProfileFilter, RegistrationForm,
    ACCOUNT_HEADER,
};

fn service() -> Arc<MemberService<MemoryStore>> {
    let policy = MembershipConfig::with_staff_domain("@staff.gym.example").expect("valid domain");
    Arc::new(MemberService::new(Arc::new(MemoryStore::new()), policy))
}

fn form(username: &str, email: &str, full_name: &str) -> RegistrationForm {
    RegistrationForm {
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
    }
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[test]
fn duplicate_emails_are_rejected_ignoring_case() {
    let service = service();
    service
        .register(form("ana", "ana@mail.example", "Ana"))
        .expect("first registration");

    match service.register(form("ana2", "ANA@Mail.Example", "Ana Two")) {
        Err(MemberServiceError::EmailInUse(_)) => {}
        other => panic!("expected duplicate e-mail, got {other:?}"),
    }
}

#[test]
fn administrators_list_and_filter_every_profile() {
    let service = service();
    let admin = service
        .register(form("coach", "coach@staff.gym.example", "Head Coach"))
        .expect("administrator")
        .account;
    let ana = service
        .register(form("ana", "ana@mail.example", "Ana Souza"))
        .expect("member")
        .account;
    service
        .register(form("bia", "bia@mail.example", "Beatriz Lima"))
        .expect("member");

    let everyone = service
        .list_profiles(&admin, &ProfileFilter::default())
        .expect("admin listing");
    let names: Vec<&str> = everyone
        .iter()
        .filter_map(|profile| profile.full_name.as_deref())
        .collect();
    assert_eq!(names, vec!["Ana Souza", "Beatriz Lima", "Head Coach"]);

    let filtered = service
        .list_profiles(
            &admin,
            &ProfileFilter {
                full_name: Some("souza".to_string()),
            },
        )
        .expect("filtered listing");
    assert_eq!(filtered.len(), 1);

    let own = service
        .list_profiles(&ana, &ProfileFilter::default())
        .expect("member listing");
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].account_id, ana.id);
}

#[tokio::test]
async fn registration_route_creates_account_and_profile() {
    let router = member_router(service());

    let response = router
        .oneshot(
            Request::post("/api/v1/accounts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "username": "coach",
                        "email": "Coach@Staff.Gym.Example",
                        "full_name": "Head Coach",
                    })
                    .to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["account"]["is_staff"], true);
    assert_eq!(payload["profile"]["full_name"], "Head Coach");
    assert!(payload["profile"]["enrollment"].is_null());
}

#[tokio::test]
async fn members_cannot_read_other_profiles() {
    let service = service();
    let ana = service
        .register(form("ana", "ana@mail.example", "Ana"))
        .expect("member");
    let bia = service
        .register(form("bia", "bia@mail.example", "Bia"))
        .expect("member");
    let router = member_router(service);

    let response = router
        .oneshot(
            Request::get(format!("/api/v1/profiles/{}", bia.profile.id.0))
                .header(ACCOUNT_HEADER, ana.account.id.0.to_string())
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn own_profile_requires_a_caller() {
    let router = member_router(service());

    let response = router
        .oneshot(
            Request::get("/api/v1/profiles/me")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
