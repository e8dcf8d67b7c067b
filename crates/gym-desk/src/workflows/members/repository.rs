use super::domain::{Account, AccountId, NewAccount, Profile, ProfileId};
use crate::store::RepositoryError;
use crate::workflows::enrollment::EnrollmentId;

/// Account storage. Username and e-mail are unique, compared case-insensitively.
pub trait AccountRepository: Send + Sync {
    fn insert_account(&self, account: NewAccount) -> Result<Account, RepositoryError>;
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;
    fn account_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;
    fn account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError>;
}

/// Profile storage. One profile per account; a present enrollment identifier is
/// unique across profiles.
pub trait ProfileRepository: Send + Sync {
    fn insert_profile(
        &self,
        account_id: AccountId,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<Profile, RepositoryError>;
    /// Replace a whole profile. A stored enrollment may not change, which the
    /// store reports as [`RepositoryError::Conflict`].
    fn update_profile(&self, profile: Profile) -> Result<Profile, RepositoryError>;
    /// Change only the name and e-mail, leaving the stored enrollment as is.
    fn update_contact(
        &self,
        id: ProfileId,
        full_name: Option<String>,
        email: Option<String>,
    ) -> Result<Profile, RepositoryError>;
    fn profile(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError>;
    fn profile_for_account(&self, account_id: AccountId)
        -> Result<Option<Profile>, RepositoryError>;
    fn profile_with_enrollment(
        &self,
        identifier: &EnrollmentId,
    ) -> Result<Option<Profile>, RepositoryError>;
    fn profiles(&self) -> Result<Vec<Profile>, RepositoryError>;
    /// Enrollment identifiers attached to profiles that start with `prefix`.
    fn profile_enrollments_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<EnrollmentId>, RepositoryError>;
}
