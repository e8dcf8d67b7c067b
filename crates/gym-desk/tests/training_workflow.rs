//! Exercise catalog administration and member-owned training programs.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use serde_json::json;
use tower::ServiceExt;

use gym_desk::store::MemoryStore;
use gym_desk::workflows::members::{Account, AccountId, AccountRepository, NewAccount};
use gym_desk::workflows::training::{
    training_router, ExerciseDraft, ExerciseKind, ProgramDraft, ProgramFilter, TrainingService,
    TrainingServiceError,
};
use gym_desk::workflows::members::access::AccessError;

fn account(store: &MemoryStore, username: &str, is_staff: bool) -> Account {
    store
        .insert_account(NewAccount {
            username: username.to_string(),
            email: format!("{username}@gym.example"),
            is_staff,
            joined_at: Utc::now(),
        })
        .expect("account stored")
}

fn program(exercise: gym_desk::workflows::training::ExerciseId, name: &str) -> ProgramDraft {
    ProgramDraft {
        owner: None,
        exercise,
        program_name: name.to_string(),
        muscle_group: Some("legs".to_string()),
        sets: 4,
        repetitions: 8,
        load_kg: 60,
        minutes: 0,
        video_url: None,
    }
}

fn squat() -> ExerciseDraft {
    ExerciseDraft {
        name: "Back squat".to_string(),
        kind: ExerciseKind::Strength,
    }
}

#[test]
fn only_administrators_manage_the_catalog() {
    let store = Arc::new(MemoryStore::new());
    let admin = account(&store, "coach", true);
    let member = account(&store, "ana", false);
    let service = TrainingService::new(store);

    match service.create_exercise(&member, squat()) {
        Err(TrainingServiceError::Access(AccessError::AdministratorRequired { .. })) => {}
        other => panic!("expected access error, got {other:?}"),
    }

    let created = service.create_exercise(&admin, squat()).expect("admin creates");
    let catalog = service.exercises().expect("catalog");
    assert_eq!(catalog, vec![created]);
}

#[test]
fn members_only_see_and_edit_their_own_programs() {
    let store = Arc::new(MemoryStore::new());
    let admin = account(&store, "coach", true);
    let ana = account(&store, "ana", false);
    let bia = account(&store, "bia", false);
    let service = TrainingService::new(store);
    let exercise = service.create_exercise(&admin, squat()).expect("exercise");

    let ana_program = service
        .create_program(&ana, program(exercise.id, "Leg day"))
        .expect("ana creates");
    service
        .create_program(&bia, program(exercise.id, "Bia legs"))
        .expect("bia creates");

    let visible = service
        .programs(&ana, &ProgramFilter::default())
        .expect("ana listing");
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].fields.owner, ana.id);

    let everything = service
        .programs(&admin, &ProgramFilter::default())
        .expect("admin listing");
    assert_eq!(everything.len(), 2);
    assert_eq!(everything[0].fields.program_name, "Bia legs");

    let filtered = service
        .programs(
            &admin,
            &ProgramFilter {
                program_name: Some("LEG".to_string()),
            },
        )
        .expect("filtered listing");
    assert_eq!(filtered.len(), 2);

    assert!(matches!(
        service.delete_program(&bia, ana_program.id),
        Err(TrainingServiceError::Access(AccessError::NotOwner { .. }))
    ));
}

#[test]
fn members_cannot_assign_programs_to_someone_else() {
    let store = Arc::new(MemoryStore::new());
    let admin = account(&store, "coach", true);
    let ana = account(&store, "ana", false);
    let bia = account(&store, "bia", false);
    let service = TrainingService::new(store);
    let exercise = service.create_exercise(&admin, squat()).expect("exercise");

    let mut for_bia = program(exercise.id, "Gift program");
    for_bia.owner = Some(bia.id);
    assert!(matches!(
        service.create_program(&ana, for_bia.clone()),
        Err(TrainingServiceError::Access(_))
    ));

    let assigned = service
        .create_program(&admin, for_bia)
        .expect("administrator assigns");
    assert_eq!(assigned.fields.owner, bia.id);

    let mut for_ghost = program(exercise.id, "Ghost program");
    for_ghost.owner = Some(AccountId(404));
    assert!(matches!(
        service.create_program(&admin, for_ghost),
        Err(TrainingServiceError::OwnerNotFound(AccountId(404)))
    ));
}

#[test]
fn removing_an_exercise_removes_dependent_programs() {
    let store = Arc::new(MemoryStore::new());
    let admin = account(&store, "coach", true);
    let ana = account(&store, "ana", false);
    let service = TrainingService::new(store);
    let exercise = service.create_exercise(&admin, squat()).expect("exercise");
    service
        .create_program(&ana, program(exercise.id, "Leg day"))
        .expect("program");

    service
        .delete_exercise(&admin, exercise.id)
        .expect("delete succeeds");

    assert!(service
        .programs(&ana, &ProgramFilter::default())
        .expect("listing")
        .is_empty());
}

#[tokio::test]
async fn program_route_validates_payloads() {
    let store = Arc::new(MemoryStore::new());
    let admin = account(&store, "coach", true);
    let ana = account(&store, "ana", false);
    let service = Arc::new(TrainingService::new(store));
    let exercise = service.create_exercise(&admin, squat()).expect("exercise");
    let router = training_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/programs")
                .header("x-account-id", ana.id.0.to_string())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "exercise": exercise.id.0,
                        "program_name": "Leg day",
                        "sets": 60,
                    })
                    .to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .oneshot(
            Request::post("/api/v1/programs")
                .header("x-account-id", ana.id.0.to_string())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "exercise": exercise.id.0,
                        "program_name": "Leg day",
                    })
                    .to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
}
