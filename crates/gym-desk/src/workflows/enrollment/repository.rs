use super::domain::{EnrollmentId, EnrollmentRecord};
use crate::store::RepositoryError;

/// Storage for the enrollment pool.
///
/// Implementations must keep `identifier` unique and report a duplicate insert
/// as [`RepositoryError::Conflict`].
pub trait EnrollmentRepository: Send + Sync {
    fn insert_entry(&self, record: EnrollmentRecord) -> Result<EnrollmentRecord, RepositoryError>;
    fn entry(&self, identifier: &EnrollmentId) -> Result<Option<EnrollmentRecord>, RepositoryError>;
    /// Every pool identifier starting with `prefix`, consumed or not.
    fn entries_with_prefix(&self, prefix: &str) -> Result<Vec<EnrollmentId>, RepositoryError>;
    /// Flip an unconsumed entry to consumed. Returns `false` when no unconsumed
    /// entry carries `identifier`.
    fn consume_entry(&self, identifier: &EnrollmentId) -> Result<bool, RepositoryError>;
    /// Unconsumed entries, newest first.
    fn available_entries(&self) -> Result<Vec<EnrollmentRecord>, RepositoryError>;
}
