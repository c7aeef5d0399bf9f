//! Account domain service.
//!
//! Implements [`AccountCommand`] and [`IdentityResolver`] over a
//! [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{AccountCommand, IdentityResolver, UserRepository, UserRepositoryError};
use crate::domain::{
    AccessToken, AvatarUrl, EmailAddress, Error, NewUserAccount, TokenDigest, UserAccount, UserId,
    Username,
};

fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::DuplicateEmail { email } => {
            Error::conflict(format!("an account already exists for {email}"))
        }
    }
}

fn account_not_found(email: &EmailAddress) -> Error {
    Error::not_found(format!("no account registered for {email}"))
}

/// Account service implementing [`AccountCommand`] and [`IdentityResolver`].
#[derive(Clone)]
pub struct AccountService<R> {
    user_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AccountService<R> {
    /// Create a new service backed by `user_repo`.
    pub fn new(user_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, username: Username, email: EmailAddress) -> Result<UserAccount, Error> {
        let account = NewUserAccount {
            id: UserId::random(),
            avatar: AvatarUrl::gravatar_for(&email),
            username,
            email,
            created_at: self.clock.utc(),
        };
        let created = self
            .user_repo
            .create(&account)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %created.id, "account registered");
        Ok(created)
    }

    async fn confirm_email(&self, email: &EmailAddress) -> Result<UserAccount, Error> {
        self.user_repo
            .confirm_email(email)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| account_not_found(email))
    }

    async fn rotate_token(&self, email: &EmailAddress) -> Result<AccessToken, Error> {
        let account = self
            .user_repo
            .find_by_email(email)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| account_not_found(email))?;
        let token = AccessToken::generate();
        self.user_repo
            .update_token(&account.id, Some(token.digest()))
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %account.id, "access token rotated");
        Ok(token)
    }

    async fn update_avatar(
        &self,
        email: &EmailAddress,
        avatar: AvatarUrl,
    ) -> Result<UserAccount, Error> {
        self.user_repo
            .update_avatar(email, &avatar)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| account_not_found(email))
    }
}

#[async_trait]
impl<R> IdentityResolver for AccountService<R>
where
    R: UserRepository,
{
    async fn resolve(&self, token: &str) -> Result<Option<UserAccount>, Error> {
        let raw = Zeroizing::new(token.to_owned());
        let digest = TokenDigest::of(raw.as_str());
        drop(raw);

        let Some(account) = self
            .user_repo
            .find_by_token_digest(&digest)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(None);
        };
        if !account.confirmed {
            debug!(user_id = %account.id, "rejecting token for unconfirmed account");
            return Err(Error::unauthorized("email not confirmed"));
        }
        Ok(Some(account))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
