//! Port for account persistence.

use async_trait::async_trait;

use crate::domain::{AvatarUrl, EmailAddress, NewUserAccount, TokenDigest, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied failure description.
            message: String,
        } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied failure description.
            message: String,
        } =>
            "user repository query failed: {message}",
        /// An account with the same email already exists.
        DuplicateEmail {
            /// Address that is already registered.
            email: String,
        } =>
            "an account already exists for {email}",
    }
}

/// Port for reading and writing accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Find an account by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Find the account currently holding the token with this digest.
    async fn find_by_token_digest(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Persist a new account.
    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserRepositoryError>;

    /// Store, or clear with `None`, the access token digest of an account.
    async fn update_token(
        &self,
        id: &UserId,
        digest: Option<TokenDigest>,
    ) -> Result<(), UserRepositoryError>;

    /// Mark the account's email as confirmed.
    async fn confirm_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;

    /// Replace the account's avatar.
    async fn update_avatar(
        &self,
        email: &EmailAddress,
        avatar: &AvatarUrl,
    ) -> Result<Option<UserAccount>, UserRepositoryError>;
}

/// Fixture implementation for tests that do not exercise account storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_by_token_digest(
        &self,
        _digest: &TokenDigest,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }

    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserRepositoryError> {
        Ok(UserAccount {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            avatar: Some(account.avatar.clone()),
            confirmed: false,
            created_at: account.created_at,
        })
    }

    async fn update_token(
        &self,
        _id: &UserId,
        _digest: Option<TokenDigest>,
    ) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn confirm_email(
        &self,
        _email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }

    async fn update_avatar(
        &self,
        _email: &EmailAddress,
        _avatar: &AvatarUrl,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(None)
    }
}
