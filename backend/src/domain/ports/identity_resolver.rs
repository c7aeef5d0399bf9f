//! Driving port resolving bearer tokens to accounts.

use async_trait::async_trait;

use crate::domain::{Error, UserAccount};

/// Resolve a raw bearer token to the account that holds it.
///
/// Returns `Ok(None)` for unknown tokens. Implementations reject accounts
/// that may not authenticate with [`crate::domain::ErrorCode::Unauthorized`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve `token` to an account.
    async fn resolve(&self, token: &str) -> Result<Option<UserAccount>, Error>;
}
