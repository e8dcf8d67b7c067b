//! Storage errors shared by every repository trait, plus the in-process store
//! the API service and tests run against.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::workflows::calendar::{CalendarEvent, CalendarRepository, EventFields, EventId};
use crate::workflows::enrollment::{EnrollmentId, EnrollmentRecord, EnrollmentRepository};
use crate::workflows::members::{
    Account, AccountId, AccountRepository, NewAccount, Profile, ProfileId, ProfileRepository,
};
use crate::workflows::training::{
    Exercise, ExerciseFields, ExerciseId, ProgramFields, ProgramId, TrainingProgram,
    TrainingRepository,
};

/// Error enumeration for repository failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Default)]
struct Tables {
    next_id: u64,
    accounts: BTreeMap<AccountId, Account>,
    profiles: BTreeMap<ProfileId, Profile>,
    pool: BTreeMap<EnrollmentId, EnrollmentRecord>,
    exercises: BTreeMap<ExerciseId, Exercise>,
    programs: BTreeMap<ProgramId, TrainingProgram>,
    events: BTreeMap<EventId, CalendarEvent>,
}

impl Tables {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Mutex-guarded tables implementing every repository trait.
///
/// Ids come from one counter shared by all tables. Uniqueness rules match the
/// repository contracts: usernames and e-mails are unique ignoring case, each
/// account has at most one profile, and enrollment identifiers are unique both
/// in the pool and across profiles.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl AccountRepository for MemoryStore {
    fn insert_account(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut tables = self.lock()?;
        let duplicate = tables.accounts.values().any(|existing| {
            existing.username.eq_ignore_ascii_case(&account.username)
                || existing.email.to_lowercase() == account.email.to_lowercase()
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }

        let id = AccountId(tables.allocate());
        let stored = Account {
            id,
            username: account.username,
            email: account.email,
            is_staff: account.is_staff,
            joined_at: account.joined_at,
        };
        tables.accounts.insert(id, stored.clone());
        Ok(stored)
    }

    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.lock()?.accounts.get(&id).cloned())
    }

    fn account_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let needle = email.trim().to_lowercase();
        Ok(self
            .lock()?
            .accounts
            .values()
            .find(|account| account.email.to_lowercase() == needle)
            .cloned())
    }

    fn account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let needle = username.trim();
        Ok(self
            .lock()?
            .accounts
            .values()
            .find(|account| account.username.eq_ignore_ascii_case(needle))
            .cloned())
    }
}

impl ProfileRepository for MemoryStore {
    fn insert_profile(
        &self,
        account_id: AccountId,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<Profile, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.accounts.contains_key(&account_id) {
            return Err(RepositoryError::NotFound);
        }
        if tables
            .profiles
            .values()
            .any(|profile| profile.account_id == account_id)
        {
            return Err(RepositoryError::Conflict);
        }

        let id = ProfileId(tables.allocate());
        let profile = Profile {
            id,
            account_id,
            full_name,
            email,
            enrollment: None,
        };
        tables.profiles.insert(id, profile.clone());
        Ok(profile)
    }

    fn update_profile(&self, profile: Profile) -> Result<Profile, RepositoryError> {
        let mut tables = self.lock()?;
        let stored = tables
            .profiles
            .get(&profile.id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.enrollment.is_some() && stored.enrollment != profile.enrollment {
            return Err(RepositoryError::Conflict);
        }
        if let Some(identifier) = &profile.enrollment {
            let claimed = tables.profiles.values().any(|other| {
                other.id != profile.id && other.enrollment.as_ref() == Some(identifier)
            });
            if claimed {
                return Err(RepositoryError::Conflict);
            }
        }

        tables.profiles.insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update_contact(
        &self,
        id: ProfileId,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<Profile, RepositoryError> {
        let mut tables = self.lock()?;
        let profile = tables
            .profiles
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        profile.full_name = full_name;
        profile.email = email;
        Ok(profile.clone())
    }

    fn profile(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        Ok(self.lock()?.profiles.get(&id).cloned())
    }

    fn profile_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<Profile>, RepositoryError> {
        Ok(self
            .lock()?
            .profiles
            .values()
            .find(|profile| profile.account_id == account_id)
            .cloned())
    }

    fn profile_with_enrollment(
        &self,
        identifier: &EnrollmentId,
    ) -> Result<Option<Profile>, RepositoryError> {
        Ok(self
            .lock()?
            .profiles
            .values()
            .find(|profile| profile.enrollment.as_ref() == Some(identifier))
            .cloned())
    }

    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError> {
        Ok(self.lock()?.profiles.values().cloned().collect())
    }

    fn profile_enrollments_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<EnrollmentId>, RepositoryError> {
        Ok(self
            .lock()?
            .profiles
            .values()
            .filter_map(|profile| profile.enrollment.clone())
            .filter(|identifier| identifier.as_str().starts_with(prefix))
            .collect())
    }
}

impl EnrollmentRepository for MemoryStore {
    fn insert_entry(&self, record: EnrollmentRecord) -> Result<EnrollmentRecord, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.pool.contains_key(&record.identifier) {
            return Err(RepositoryError::Conflict);
        }
        tables.pool.insert(record.identifier.clone(), record.clone());
        Ok(record)
    }

    fn entry(&self, identifier: &EnrollmentId) -> Result<Option<EnrollmentRecord>, RepositoryError> {
        Ok(self.lock()?.pool.get(identifier).cloned())
    }

    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<EnrollmentId>, RepositoryError> {
        Ok(self
            .lock()?
            .pool
            .keys()
            .filter(|identifier| identifier.as_str().starts_with(prefix))
            .cloned()
            .collect())
    }

    fn consume_entry(&self, identifier: &EnrollmentId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        match tables.pool.get_mut(identifier) {
            Some(entry) if !entry.consumed => {
                entry.consumed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn available_entries(&self) -> Result<Vec<EnrollmentRecord>, RepositoryError> {
        let mut available: Vec<EnrollmentRecord> = self
            .lock()?
            .pool
            .values()
            .filter(|entry| !entry.consumed)
            .cloned()
            .collect();
        available.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.identifier.cmp(&left.identifier))
        });
        Ok(available)
    }
}

impl TrainingRepository for MemoryStore {
    fn insert_exercise(&self, fields: ExerciseFields) -> Result<Exercise, RepositoryError> {
        let mut tables = self.lock()?;
        let id = ExerciseId(tables.allocate());
        let exercise = Exercise { id, fields };
        tables.exercises.insert(id, exercise.clone());
        Ok(exercise)
    }

    fn update_exercise(&self, exercise: Exercise) -> Result<Exercise, RepositoryError> {
        let mut tables = self.lock()?;
        let slot = tables
            .exercises
            .get_mut(&exercise.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = exercise.clone();
        Ok(exercise)
    }

    fn delete_exercise(&self, id: ExerciseId) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables
            .exercises
            .remove(&id)
            .ok_or(RepositoryError::NotFound)?;
        tables
            .programs
            .retain(|_, program| program.fields.exercise != id);
        Ok(())
    }

    fn exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, RepositoryError> {
        Ok(self.lock()?.exercises.get(&id).cloned())
    }

    fn exercises(&self) -> Result<Vec<Exercise>, RepositoryError> {
        Ok(self.lock()?.exercises.values().cloned().collect())
    }

    fn insert_program(&self, fields: ProgramFields) -> Result<TrainingProgram, RepositoryError> {
        let mut tables = self.lock()?;
        if !tables.exercises.contains_key(&fields.exercise) {
            return Err(RepositoryError::NotFound);
        }
        let id = ProgramId(tables.allocate());
        let program = TrainingProgram { id, fields };
        tables.programs.insert(id, program.clone());
        Ok(program)
    }

    fn update_program(&self, program: TrainingProgram) -> Result<TrainingProgram, RepositoryError> {
        let mut tables = self.lock()?;
        let slot = tables
            .programs
            .get_mut(&program.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = program.clone();
        Ok(program)
    }

    fn delete_program(&self, id: ProgramId) -> Result<(), RepositoryError> {
        self.lock()?
            .programs
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn program(&self, id: ProgramId) -> Result<Option<TrainingProgram>, RepositoryError> {
        Ok(self.lock()?.programs.get(&id).cloned())
    }

    fn programs(&self) -> Result<Vec<TrainingProgram>, RepositoryError> {
        Ok(self.lock()?.programs.values().cloned().collect())
    }
}

impl CalendarRepository for MemoryStore {
    fn insert_event(
        &self,
        fields: EventFields,
        created_by: AccountId,
        at: DateTime<Utc>,
    ) -> Result<CalendarEvent, RepositoryError> {
        let mut tables = self.lock()?;
        let id = EventId(tables.allocate());
        let event = CalendarEvent {
            id,
            fields,
            created_by,
            created_at: at,
            updated_at: at,
        };
        tables.events.insert(id, event.clone());
        Ok(event)
    }

    fn update_event(&self, event: CalendarEvent) -> Result<CalendarEvent, RepositoryError> {
        let mut tables = self.lock()?;
        let slot = tables
            .events
            .get_mut(&event.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = event.clone();
        Ok(event)
    }

    fn delete_event(&self, id: EventId) -> Result<(), RepositoryError> {
        self.lock()?
            .events
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn event(&self, id: EventId) -> Result<Option<CalendarEvent>, RepositoryError> {
        Ok(self.lock()?.events.get(&id).cloned())
    }

    fn events(&self) -> Result<Vec<CalendarEvent>, RepositoryError> {
        Ok(self.lock()?.events.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            is_staff: false,
            joined_at: Utc::now(),
        }
    }

    fn identifier(raw: &str) -> EnrollmentId {
        EnrollmentId::new(raw).expect("valid identifier")
    }

    #[test]
    fn usernames_and_emails_are_unique_ignoring_case() {
        let store = MemoryStore::new();
        store
            .insert_account(new_account("ana", "ana@gym.example"))
            .expect("first account");

        assert_eq!(
            store.insert_account(new_account("ANA", "other@gym.example")),
            Err(RepositoryError::Conflict)
        );
        assert_eq!(
            store.insert_account(new_account("bia", "Ana@Gym.Example")),
            Err(RepositoryError::Conflict)
        );
        assert!(store
            .account_by_email("ANA@gym.example")
            .expect("lookup")
            .is_some());
    }

    #[test]
    fn accounts_hold_a_single_profile() {
        let store = MemoryStore::new();
        let account = store
            .insert_account(new_account("ana", "ana@gym.example"))
            .expect("account");
        store
            .insert_profile(account.id, None, None)
            .expect("first profile");
        assert_eq!(
            store.insert_profile(account.id, None, None),
            Err(RepositoryError::Conflict)
        );
        assert_eq!(
            store.insert_profile(AccountId(999), None, None),
            Err(RepositoryError::NotFound)
        );
    }

    #[test]
    fn profile_enrollments_stay_unique() {
        let store = MemoryStore::new();
        let first = store
            .insert_account(new_account("ana", "ana@gym.example"))
            .expect("account");
        let second = store
            .insert_account(new_account("bia", "bia@gym.example"))
            .expect("account");
        let mut ana = store.insert_profile(first.id, None, None).expect("profile");
        let mut bia = store.insert_profile(second.id, None, None).expect("profile");

        ana.enrollment = Some(identifier("20241110001"));
        store.update_profile(ana).expect("first claim");

        bia.enrollment = Some(identifier("20241110001"));
        assert_eq!(store.update_profile(bia), Err(RepositoryError::Conflict));
    }

    #[test]
    fn stored_enrollments_cannot_be_overwritten() {
        let store = MemoryStore::new();
        let account = store
            .insert_account(new_account("ana", "ana@gym.example"))
            .expect("account");
        let stale = store.insert_profile(account.id, None, None).expect("profile");

        let mut assigned = stale.clone();
        assigned.enrollment = Some(identifier("20241110001"));
        store.update_profile(assigned).expect("assignment");

        let mut renamed = stale.clone();
        renamed.full_name = Some("Ana".to_string());
        assert_eq!(store.update_profile(renamed), Err(RepositoryError::Conflict));

        let mut swapped = stale.clone();
        swapped.enrollment = Some(identifier("20241110002"));
        assert_eq!(store.update_profile(swapped), Err(RepositoryError::Conflict));

        let updated = store
            .update_contact(stale.id, Some("Ana".to_string()), None)
            .expect("contact update");
        assert_eq!(updated.full_name.as_deref(), Some("Ana"));
        assert_eq!(updated.enrollment, Some(identifier("20241110001")));
    }

    #[test]
    fn pool_rejects_duplicates_and_consumes_once() {
        let store = MemoryStore::new();
        let record = EnrollmentRecord::available(identifier("20241110001"), Utc::now());
        store.insert_entry(record.clone()).expect("insert");
        assert_eq!(store.insert_entry(record), Err(RepositoryError::Conflict));

        assert!(store.consume_entry(&identifier("20241110001")).expect("consume"));
        assert!(!store.consume_entry(&identifier("20241110001")).expect("consume again"));
        assert!(!store.consume_entry(&identifier("20241119999")).expect("missing"));
        assert!(store.available_entries().expect("available").is_empty());
    }

    #[test]
    fn available_entries_are_newest_first() {
        let store = MemoryStore::new();
        let earlier = Utc::now() - chrono::Duration::minutes(5);
        let later = Utc::now();
        store
            .insert_entry(EnrollmentRecord::available(identifier("20241110002"), earlier))
            .expect("insert");
        store
            .insert_entry(EnrollmentRecord::available(identifier("20241110001"), later))
            .expect("insert");

        let available: Vec<String> = store
            .available_entries()
            .expect("available")
            .into_iter()
            .map(|entry| entry.identifier.to_string())
            .collect();
        assert_eq!(available, vec!["20241110001", "20241110002"]);
    }

    #[test]
    fn deleting_an_exercise_removes_its_programs() {
        let store = MemoryStore::new();
        let squat = store
            .insert_exercise(ExerciseFields {
                name: "Squat".to_string(),
                kind: Default::default(),
            })
            .expect("exercise");
        let program = store
            .insert_program(ProgramFields {
                owner: AccountId(1),
                exercise: squat.id,
                program_name: "Legs".to_string(),
                muscle_group: "legs".to_string(),
                sets: 5,
                repetitions: 5,
                load_kg: 80,
                minutes: 0,
                video_url: None,
            })
            .expect("program");

        store.delete_exercise(squat.id).expect("delete");
        assert_eq!(store.program(program.id).expect("lookup"), None);
        assert_eq!(store.delete_exercise(squat.id), Err(RepositoryError::NotFound));
    }
}
