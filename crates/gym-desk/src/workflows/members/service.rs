use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::access::{is_administrator, require_owner_or_administrator, AccessError, Caller, CallerError};
use super::domain::{
    Account, NewAccount, Profile, ProfileFilter, ProfileId, ProfileUpdate, Registration,
    RegistrationForm, EMAIL_MAX_LEN, FULL_NAME_MAX_LEN, USERNAME_MAX_LEN,
};
use super::repository::{AccountRepository, ProfileRepository};
use crate::config::MembershipConfig;
use crate::store::RepositoryError;
use crate::workflows::enrollment::guard::save_contact;
use crate::workflows::enrollment::EnrollmentRepository;
use crate::workflows::validation::{
    self, contains_ignore_case, optional_text, trimmed_text, ValidationError,
};

/// Sign-up and member-facing profile operations.
pub struct MemberService<S> {
    store: Arc<S>,
    policy: MembershipConfig,
}

impl<S> MemberService<S>
where
    S: AccountRepository + ProfileRepository + EnrollmentRepository + 'static,
{
    pub fn new(store: Arc<S>, policy: MembershipConfig) -> Self {
        Self { store, policy }
    }

    pub fn caller(&self, caller: Caller) -> Result<Account, MemberServiceError> {
        Ok(caller.require(&*self.store)?)
    }

    /// Create an account and its profile.
    pub fn register(&self, form: RegistrationForm) -> Result<Registration, MemberServiceError> {
        let username = trimmed_text("username", &form.username, 1, USERNAME_MAX_LEN)?;
        let email = validation::email("email", &form.email, EMAIL_MAX_LEN)?;
        let full_name = optional_text("full_name", Some(&form.full_name), FULL_NAME_MAX_LEN)?;

        if self.store.account_by_email(&email)?.is_some() {
            return Err(MemberServiceError::EmailInUse(email));
        }
        if self.store.account_by_username(&username)?.is_some() {
            return Err(MemberServiceError::UsernameTaken(username));
        }

        let is_staff = self.policy.grants_staff(&email);
        let account = self.store.insert_account(NewAccount {
            username,
            email: email.clone(),
            is_staff,
            joined_at: Utc::now(),
        })?;
        let profile = self
            .store
            .insert_profile(account.id, full_name, Some(email))?;

        info!(
            account = account.id.0,
            profile = profile.id.0,
            is_staff,
            "account registered"
        );
        Ok(Registration { account, profile })
    }

    /// The caller's own profile, created on first access.
    pub fn own_profile(&self, actor: &Account) -> Result<Profile, MemberServiceError> {
        match self.store.profile_for_account(actor.id)? {
            Some(profile) => Ok(profile),
            None => Ok(self
                .store
                .insert_profile(actor.id, None, Some(actor.email.clone()))?),
        }
    }

    /// Replace the caller's name and e-mail. The stored enrollment is never written here.
    pub fn update_own_profile(
        &self,
        actor: &Account,
        update: ProfileUpdate,
    ) -> Result<Profile, MemberServiceError> {
        let full_name = optional_text("full_name", update.full_name.as_deref(), FULL_NAME_MAX_LEN)?;
        let email = match update.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(validation::email("email", raw, EMAIL_MAX_LEN)?),
        };

        let profile = self.own_profile(actor)?;
        Ok(save_contact(&*self.store, profile.id, full_name, email)?)
    }

    /// Administrators see every profile, members only their own.
    pub fn list_profiles(
        &self,
        actor: &Account,
        filter: &ProfileFilter,
    ) -> Result<Vec<Profile>, MemberServiceError> {
        let mut profiles = if is_administrator(actor) {
            self.store.profiles()?
        } else {
            self.store
                .profile_for_account(actor.id)?
                .into_iter()
                .collect()
        };

        if let Some(needle) = filter
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        {
            profiles.retain(|profile| {
                profile
                    .full_name
                    .as_deref()
                    .is_some_and(|name| contains_ignore_case(name, needle))
            });
        }

        profiles.sort_by_key(|profile| {
            (
                profile.full_name.is_none(),
                profile.full_name.as_deref().map(str::to_lowercase),
                profile.id,
            )
        });
        Ok(profiles)
    }

    pub fn profile_detail(
        &self,
        actor: &Account,
        profile_id: ProfileId,
    ) -> Result<Profile, MemberServiceError> {
        let profile = self
            .store
            .profile(profile_id)?
            .ok_or(MemberServiceError::ProfileNotFound(profile_id))?;
        require_owner_or_administrator(actor, profile.account_id, "profile")?;
        Ok(profile)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemberServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("e-mail {0} is already in use")]
    EmailInUse(String),
    #[error("username {0} is already taken")]
    UsernameTaken(String),
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CallerError> for MemberServiceError {
    fn from(value: CallerError) -> Self {
        match value {
            CallerError::Access(err) => Self::Access(err),
            CallerError::Repository(err) => Self::Repository(err),
        }
    }
}
