use std::sync::Arc;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::store::MemoryStore;
use crate::workflows::enrollment::{EnrollmentId, EnrollmentRecord, EnrollmentRepository};
use crate::workflows::enrollment::EnrollmentService;
use crate::workflows::members::{
    Account, AccountRepository, NewAccount, Profile, ProfileRepository,
};

pub(super) struct Fixture {
    pub(super) store: Arc<MemoryStore>,
    pub(super) service: EnrollmentService<MemoryStore>,
    pub(super) admin: Account,
    pub(super) member: Account,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let admin = account(&store, "coach", true);
    let member = account(&store, "ana", false);
    let service = EnrollmentService::new(store.clone());
    Fixture {
        store,
        service,
        admin,
        member,
    }
}

pub(super) fn account(store: &MemoryStore, username: &str, is_staff: bool) -> Account {
    store
        .insert_account(NewAccount {
            username: username.to_string(),
            email: format!("{username}@gym.example"),
            is_staff,
            joined_at: Utc::now(),
        })
        .expect("account stored")
}

pub(super) fn profile(store: &MemoryStore, account: &Account) -> Profile {
    store
        .insert_profile(account.id, Some(account.username.clone()), None)
        .expect("profile stored")
}

pub(super) fn id(raw: &str) -> EnrollmentId {
    EnrollmentId::new(raw).expect("valid identifier")
}

pub(super) fn seed_pool(store: &MemoryStore, identifiers: &[&str]) {
    for raw in identifiers {
        store
            .insert_entry(EnrollmentRecord::available(id(raw), Utc::now()))
            .expect("pool entry stored");
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
