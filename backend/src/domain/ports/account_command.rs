//! Driving port for account lifecycle operations.
//!
//! Used by the account HTTP endpoints and the admin CLI.

use async_trait::async_trait;

use crate::domain::{AccessToken, AvatarUrl, EmailAddress, Error, UserAccount, Username};

/// Driving port for account writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register an account with a Gravatar avatar derived from its email.
    async fn register(&self, username: Username, email: EmailAddress)
    -> Result<UserAccount, Error>;

    /// Mark an account's email as confirmed.
    async fn confirm_email(&self, email: &EmailAddress) -> Result<UserAccount, Error>;

    /// Issue a fresh bearer token, invalidating the previous one.
    async fn rotate_token(&self, email: &EmailAddress) -> Result<AccessToken, Error>;

    /// Replace an account's avatar.
    async fn update_avatar(
        &self,
        email: &EmailAddress,
        avatar: AvatarUrl,
    ) -> Result<UserAccount, Error>;
}
