use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Datelike, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{EnrollmentId, EnrollmentPrefix, EnrollmentRecord};
use super::guard::{check_assignment, save_profile, AssignmentCheck, AssignmentError, GuardError};
use super::issuance::{next_identifier, IssuanceError};
use super::repository::EnrollmentRepository;
use crate::store::RepositoryError;
use crate::workflows::members::access::{require_administrator, AccessError, Caller, CallerError};
use crate::workflows::members::domain::FULL_NAME_MAX_LEN;
use crate::workflows::members::repository::{AccountRepository, ProfileRepository};
use crate::workflows::members::{Account, Profile, ProfileId};
use crate::workflows::validation::{optional_text, ValidationError};

/// Administrator edit of a member's name and enrollment.
///
/// Both fields replace the stored values; blank means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorProfileEdit {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub enrollment: Option<String>,
}

/// Issuance, pool listing and administrator reassignment of enrollment numbers.
///
/// Issuance and reassignment hold one lock across their read and write steps,
/// so two requests in this process can never compute the same next number. The
/// pool's uniqueness constraint still rejects duplicates written by anything
/// outside the lock.
pub struct EnrollmentService<S> {
    store: Arc<S>,
    serial: Mutex<()>,
}

impl<S> EnrollmentService<S>
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            serial: Mutex::new(()),
        }
    }

    pub fn caller(&self, caller: Caller) -> Result<Account, EnrollmentServiceError> {
        Ok(caller.require(&*self.store)?)
    }

    /// Issue the next enrollment number for the current year.
    pub fn issue(&self, actor: &Account) -> Result<EnrollmentRecord, EnrollmentServiceError> {
        self.issue_for_year(actor, Local::now().year())
    }

    pub fn issue_for_year(
        &self,
        actor: &Account,
        year: i32,
    ) -> Result<EnrollmentRecord, EnrollmentServiceError> {
        require_administrator(actor, "issue enrollment numbers")?;
        let prefix = EnrollmentPrefix::try_for_year(year)?;

        let _serial = self.serialize();
        let identifier = self.next_identifier(&prefix)?;
        let record = self
            .store
            .insert_entry(EnrollmentRecord::available(identifier, Utc::now()))?;

        info!(
            identifier = %record.identifier,
            %prefix,
            actor = actor.id.0,
            "enrollment issued"
        );
        Ok(record)
    }

    /// Unconsumed pool entries, newest first.
    pub fn available(
        &self,
        actor: &Account,
    ) -> Result<Vec<EnrollmentRecord>, EnrollmentServiceError> {
        require_administrator(actor, "view the enrollment pool")?;
        Ok(self.store.available_entries()?)
    }

    /// Apply an administrator edit, enforcing the enrollment lock.
    ///
    /// Nothing is written when the edit is rejected.
    pub fn edit_profile(
        &self,
        actor: &Account,
        profile_id: ProfileId,
        edit: AdministratorProfileEdit,
    ) -> Result<Profile, EnrollmentServiceError> {
        require_administrator(actor, "edit member enrollments")?;
        let full_name = optional_text("full_name", edit.full_name.as_deref(), FULL_NAME_MAX_LEN)?;
        let proposed = EnrollmentId::optional(edit.enrollment.as_deref())?;

        let _serial = self.serialize();
        let mut profile = self
            .store
            .profile(profile_id)?
            .ok_or(EnrollmentServiceError::ProfileNotFound(profile_id))?;

        let check = check_assignment(&*self.store, &profile, proposed.as_ref())?;

        profile.full_name = full_name;
        if let AssignmentCheck::Assign(identifier) = &check {
            profile.enrollment = Some(identifier.clone());
        }
        let saved = save_profile(&*self.store, profile)?;

        if let AssignmentCheck::Assign(identifier) = check {
            // The save hook already consumed the entry; this only confirms it.
            self.store.consume_entry(&identifier)?;
            info!(
                profile = saved.id.0,
                %identifier,
                actor = actor.id.0,
                "enrollment assigned"
            );
        }

        Ok(saved)
    }

    fn next_identifier(
        &self,
        prefix: &EnrollmentPrefix,
    ) -> Result<EnrollmentId, EnrollmentServiceError> {
        let prefix_text = prefix.as_string();
        let mut identifiers = self.store.profile_enrollments_with_prefix(&prefix_text)?;
        identifiers.extend(self.store.entries_with_prefix(&prefix_text)?);

        Ok(next_identifier(
            prefix,
            identifiers.iter().map(EnrollmentId::as_str),
        )?)
    }

    fn serialize(&self) -> MutexGuard<'_, ()> {
        self.serial.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnrollmentServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Issuance(#[from] IssuanceError),
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<GuardError> for EnrollmentServiceError {
    fn from(value: GuardError) -> Self {
        match value {
            GuardError::Rejected(err) => Self::Assignment(err),
            GuardError::Repository(err) => Self::Repository(err),
        }
    }
}

impl From<CallerError> for EnrollmentServiceError {
    fn from(value: CallerError) -> Self {
        match value {
            CallerError::Access(err) => Self::Access(err),
            CallerError::Repository(err) => Self::Repository(err),
        }
    }
}
