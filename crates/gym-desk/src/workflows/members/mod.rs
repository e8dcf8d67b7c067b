//! Accounts, member profiles and the administrator predicate used by every workflow.

pub mod access;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use access::{is_administrator, AccessError, Caller, CallerError, ACCOUNT_HEADER};
pub use domain::{
    Account, AccountId, NewAccount, Profile, ProfileFilter, ProfileId, ProfileUpdate,
    Registration, RegistrationForm,
};
pub use repository::{AccountRepository, ProfileRepository};
pub use router::member_router;
pub use service::{MemberService, MemberServiceError};
