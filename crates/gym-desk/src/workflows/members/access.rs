//! Role checks shared by every workflow, plus the caller extractor for HTTP routes.
//!
//! Authentication happens upstream; requests arrive with the authenticated
//! account id in the `x-account-id` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use super::domain::{Account, AccountId};
use super::repository::AccountRepository;
use crate::store::RepositoryError;

pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The single authorization predicate for administrator-only operations.
pub fn is_administrator(account: &Account) -> bool {
    account.is_staff
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("only administrators may {action}")]
    AdministratorRequired { action: &'static str },
    #[error("{resource} belongs to another account")]
    NotOwner { resource: &'static str },
}

pub fn require_administrator(account: &Account, action: &'static str) -> Result<(), AccessError> {
    if is_administrator(account) {
        Ok(())
    } else {
        warn!(account = account.id.0, action, "administrator permission denied");
        Err(AccessError::AdministratorRequired { action })
    }
}

/// Owners and administrators pass; everyone else is refused.
pub fn require_owner_or_administrator(
    account: &Account,
    owner: AccountId,
    resource: &'static str,
) -> Result<(), AccessError> {
    if is_administrator(account) || account.id == owner {
        Ok(())
    } else {
        warn!(account = account.id.0, resource, "ownership check failed");
        Err(AccessError::NotOwner { resource })
    }
}

/// Account id presented by the request, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caller(pub Option<AccountId>);

impl Caller {
    pub fn account(id: AccountId) -> Self {
        Self(Some(id))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    /// Look the caller up. Unknown ids resolve to an anonymous caller.
    pub fn resolve<A>(self, accounts: &A) -> Result<Option<Account>, RepositoryError>
    where
        A: AccountRepository + ?Sized,
    {
        match self.0 {
            Some(id) => accounts.account(id),
            None => Ok(None),
        }
    }

    pub fn require<A>(self, accounts: &A) -> Result<Account, CallerError>
    where
        A: AccountRepository + ?Sized,
    {
        self.resolve(accounts)?.ok_or(CallerError::Access(AccessError::Unauthenticated))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallerError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACCOUNT_HEADER) else {
            return Ok(Caller::anonymous());
        };

        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(|id| Caller::account(AccountId(id)))
            .ok_or_else(|| {
                let payload = json!({
                    "error": format!("{ACCOUNT_HEADER} must be a numeric account id"),
                });
                (StatusCode::BAD_REQUEST, Json(payload)).into_response()
            })
    }
}
