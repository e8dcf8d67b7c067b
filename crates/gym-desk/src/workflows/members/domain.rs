use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::enrollment::EnrollmentId;

pub const USERNAME_MAX_LEN: usize = 150;
pub const FULL_NAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login identity. Credentials live with the upstream authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub joined_at: DateTime<Utc>,
}

/// Validated account fields awaiting an id from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub joined_at: DateTime<Utc>,
}

/// Per-account member data. The enrollment identifier is immutable once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub account_id: AccountId,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub enrollment: Option<EnrollmentId>,
}

impl Profile {
    /// Full name when set, otherwise the account's username.
    pub fn display_name<'a>(&'a self, account: &'a Account) -> &'a str {
        self.full_name.as_deref().unwrap_or(&account.username)
    }
}

/// Sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub full_name: String,
}

/// Fields a member may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFilter {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Account and profile created together at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub account: Account,
    pub profile: Profile,
}
