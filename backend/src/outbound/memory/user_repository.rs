//! In-memory [`UserRepository`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{AvatarUrl, EmailAddress, NewUserAccount, TokenDigest, UserAccount, UserId};

use super::poisoned;

#[derive(Debug, Clone)]
struct StoredUser {
    account: UserAccount,
    token_digest: Option<TokenDigest>,
}

/// Account store keyed by id. Email uniqueness is case-insensitive.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, StoredUser>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn users(&self) -> Result<MutexGuard<'_, HashMap<UserId, StoredUser>>, UserRepositoryError> {
        self.users
            .lock()
            .map_err(|_| UserRepositoryError::query(poisoned("user")))
    }
}

fn by_email<'a>(
    users: &'a mut HashMap<UserId, StoredUser>,
    email: &EmailAddress,
) -> Option<&'a mut StoredUser> {
    let wanted = email.normalized();
    users
        .values_mut()
        .find(|stored| stored.account.email.normalized() == wanted)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        Ok(self.users()?.get(id).map(|stored| stored.account.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut users = self.users()?;
        Ok(by_email(&mut users, email).map(|stored| stored.account.clone()))
    }

    async fn find_by_token_digest(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let users = self.users()?;
        Ok(users
            .values()
            .find(|stored| stored.token_digest.as_ref() == Some(digest))
            .map(|stored| stored.account.clone()))
    }

    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserRepositoryError> {
        let mut users = self.users()?;
        if by_email(&mut users, &account.email).is_some() {
            return Err(UserRepositoryError::duplicate_email(account.email.to_string()));
        }
        let created = UserAccount {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            avatar: Some(account.avatar.clone()),
            confirmed: false,
            created_at: account.created_at,
        };
        users.insert(
            account.id,
            StoredUser {
                account: created.clone(),
                token_digest: None,
            },
        );
        Ok(created)
    }

    async fn update_token(
        &self,
        id: &UserId,
        digest: Option<TokenDigest>,
    ) -> Result<(), UserRepositoryError> {
        if let Some(stored) = self.users()?.get_mut(id) {
            stored.token_digest = digest;
        }
        Ok(())
    }

    async fn confirm_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut users = self.users()?;
        Ok(by_email(&mut users, email).map(|stored| {
            stored.account.confirmed = true;
            stored.account.clone()
        }))
    }

    async fn update_avatar(
        &self,
        email: &EmailAddress,
        avatar: &AvatarUrl,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut users = self.users()?;
        Ok(by_email(&mut users, email).map(|stored| {
            stored.account.avatar = Some(avatar.clone());
            stored.account.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::Username;

    fn new_account(email: &str) -> NewUserAccount {
        let email = EmailAddress::new(email).expect("valid email");
        NewUserAccount {
            id: UserId::random(),
            username: Username::new("ada_l").expect("valid username"),
            avatar: AvatarUrl::gravatar_for(&email),
            email,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_duplicate_email_ignoring_case() {
        let repo = InMemoryUserRepository::new();
        repo.create(&new_account("ada@example.com"))
            .await
            .expect("first create");

        let err = repo
            .create(&new_account("ADA@example.com"))
            .await
            .expect_err("duplicate");

        assert!(matches!(err, UserRepositoryError::DuplicateEmail { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn token_digest_lookup_follows_rotation() {
        let repo = InMemoryUserRepository::new();
        let account = repo
            .create(&new_account("ada@example.com"))
            .await
            .expect("create");

        repo.update_token(&account.id, Some(TokenDigest::of("first")))
            .await
            .expect("store token");
        repo.update_token(&account.id, Some(TokenDigest::of("second")))
            .await
            .expect("rotate token");

        let stale = repo
            .find_by_token_digest(&TokenDigest::of("first"))
            .await
            .expect("lookup");
        let fresh = repo
            .find_by_token_digest(&TokenDigest::of("second"))
            .await
            .expect("lookup");
        assert!(stale.is_none());
        assert_eq!(fresh.map(|found| found.id), Some(account.id));
    }

    #[rstest]
    #[tokio::test]
    async fn confirm_email_marks_account_confirmed() {
        let repo = InMemoryUserRepository::new();
        let account = repo
            .create(&new_account("ada@example.com"))
            .await
            .expect("create");
        assert!(!account.confirmed);

        let confirmed = repo
            .confirm_email(&account.email)
            .await
            .expect("confirm")
            .expect("account exists");

        assert!(confirmed.confirmed);
    }

    #[rstest]
    #[tokio::test]
    async fn updates_on_unknown_email_return_none() {
        let repo = InMemoryUserRepository::new();
        let email = EmailAddress::new("ghost@example.com").expect("valid email");
        let avatar = AvatarUrl::new("https://cdn.example.com/g.png").expect("valid avatar");

        assert!(repo.confirm_email(&email).await.expect("confirm").is_none());
        assert!(
            repo.update_avatar(&email, &avatar)
                .await
                .expect("avatar")
                .is_none()
        );
    }
}
