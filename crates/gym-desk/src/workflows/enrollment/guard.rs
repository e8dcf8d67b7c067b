//! Keeps the pool and the profiles consistent when an enrollment is attached.

use tracing::{info, warn};

use super::domain::EnrollmentId;
use super::repository::EnrollmentRepository;
use crate::store::RepositoryError;
use crate::workflows::members::repository::ProfileRepository;
use crate::workflows::members::{Profile, ProfileId};

/// Reasons an administrator's enrollment assignment is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("enrollment {0} is already claimed by another profile")]
    ClaimedByAnotherProfile(EnrollmentId),
    #[error("enrollment {0} was not found in the available pool or was already consumed")]
    NotAvailable(EnrollmentId),
    #[error("enrollment {current} is locked and cannot be changed")]
    Locked { current: EnrollmentId },
}

/// Outcome of a successful assignment check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentCheck {
    /// The proposed value matches what the profile already carries.
    Unchanged,
    /// The profile may take this pool entry.
    Assign(EnrollmentId),
}

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error(transparent)]
    Rejected(#[from] AssignmentError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Decide whether `profile` may carry `proposed`.
///
/// A profile that already has an enrollment may only "change" it to the same
/// value. Otherwise the value must not belong to another profile and must be an
/// unconsumed pool entry.
pub fn check_assignment<S>(
    store: &S,
    profile: &Profile,
    proposed: Option<&EnrollmentId>,
) -> Result<AssignmentCheck, GuardError>
where
    S: ProfileRepository + EnrollmentRepository + ?Sized,
{
    if profile.enrollment.as_ref() == proposed {
        return Ok(AssignmentCheck::Unchanged);
    }

    if let Some(current) = &profile.enrollment {
        warn!(profile = profile.id.0, %current, "attempt to change a locked enrollment");
        return Err(AssignmentError::Locked {
            current: current.clone(),
        }
        .into());
    }

    // The profile has no enrollment yet, so `proposed` is present here.
    let Some(proposed) = proposed else {
        return Ok(AssignmentCheck::Unchanged);
    };

    if let Some(holder) = store.profile_with_enrollment(proposed)? {
        if holder.id != profile.id {
            return Err(AssignmentError::ClaimedByAnotherProfile(proposed.clone()).into());
        }
    }

    match store.entry(proposed)? {
        Some(entry) if !entry.consumed => Ok(AssignmentCheck::Assign(proposed.clone())),
        _ => Err(AssignmentError::NotAvailable(proposed.clone()).into()),
    }
}

/// Mark the pool entry matching the profile's enrollment as consumed.
///
/// No-op when the profile has no enrollment or no unconsumed entry matches.
pub fn consume_for_profile<E>(pool: &E, profile: &Profile) -> Result<bool, RepositoryError>
where
    E: EnrollmentRepository + ?Sized,
{
    let Some(identifier) = &profile.enrollment else {
        return Ok(false);
    };

    let consumed = pool.consume_entry(identifier)?;
    if consumed {
        info!(profile = profile.id.0, %identifier, "enrollment consumed");
    }
    Ok(consumed)
}

/// Persist a profile and run the consumption hook on the stored value.
///
/// Every profile write goes through here so the pool never lags behind.
pub fn save_profile<S>(store: &S, profile: Profile) -> Result<Profile, RepositoryError>
where
    S: ProfileRepository + EnrollmentRepository + ?Sized,
{
    let saved = store.update_profile(profile)?;
    consume_for_profile(store, &saved)?;
    Ok(saved)
}

/// Update a member's name and e-mail without touching the stored enrollment,
/// then run the consumption hook on what was stored.
pub fn save_contact<S>(
    store: &S,
    id: ProfileId,
    full_name: Option<String>,
    email: Option<String>,
) -> Result<Profile, RepositoryError>
where
    S: ProfileRepository + EnrollmentRepository + ?Sized,
{
    let saved = store.update_contact(id, full_name, email)?;
    consume_for_profile(store, &saved)?;
    Ok(saved)
}
