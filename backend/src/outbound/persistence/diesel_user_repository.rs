//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Lookups by email go through the normalised `email_key` column, which
//! carries the uniqueness constraint.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    AvatarUrl, EmailAddress, NewUserAccount, TokenDigest, UserAccount, UserId, Username,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain account.
fn row_to_account(row: UserRow) -> Result<UserAccount, UserRepositoryError> {
    let UserRow {
        id,
        username,
        email,
        avatar,
        confirmed,
        created_at,
    } = row;
    let corrupt = |err: String| UserRepositoryError::query(format!("stored user {id}: {err}"));

    Ok(UserAccount {
        id: UserId::from_uuid(id),
        username: Username::new(username).map_err(|err| corrupt(err.to_string()))?,
        email: EmailAddress::new(email).map_err(|err| corrupt(err.to_string()))?,
        avatar: avatar
            .map(AvatarUrl::new)
            .transpose()
            .map_err(|err| corrupt(err.to_string()))?,
        confirmed,
        created_at,
    })
}

type BoxedUsers = users::BoxedQuery<'static, diesel::pg::Pg>;

impl DieselUserRepository {
    async fn find_one<F>(&self, filter: F) -> Result<Option<UserAccount>, UserRepositoryError>
    where
        F: FnOnce(BoxedUsers) -> BoxedUsers + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = filter(users::table.into_boxed())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, UserRepositoryError> {
        let id = *id.as_uuid();
        self.find_one(move |query| query.filter(users::id.eq(id)))
            .await
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let key = email.normalized();
        self.find_one(move |query| query.filter(users::email_key.eq(key)))
            .await
    }

    async fn find_by_token_digest(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let digest = digest.as_ref().to_owned();
        self.find_one(move |query| query.filter(users::token_digest.eq(digest)))
            .await
    }

    async fn create(&self, account: &NewUserAccount) -> Result<UserAccount, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email_key = account.email.normalized();
        let new_row = NewUserRow {
            id: *account.id.as_uuid(),
            username: account.username.as_ref(),
            email: account.email.as_ref(),
            email_key: &email_key,
            avatar: Some(account.avatar.as_ref()),
            confirmed: false,
            created_at: account.created_at,
        };
        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserRepositoryError::duplicate_email(account.email.to_string())
                } else {
                    map_diesel_error(err)
                }
            })?;
        row_to_account(row)
    }

    async fn update_token(
        &self,
        id: &UserId,
        digest: Option<TokenDigest>,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let digest = digest.map(|value| value.as_ref().to_owned());
        diesel::update(users::table.find(*id.as_uuid()))
            .set(users::token_digest.eq(digest))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn confirm_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> =
            diesel::update(users::table.filter(users::email_key.eq(email.normalized())))
                .set(users::confirmed.eq(true))
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn update_avatar(
        &self,
        email: &EmailAddress,
        avatar: &AvatarUrl,
    ) -> Result<Option<UserAccount>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> =
            diesel::update(users::table.filter(users::email_key.eq(email.normalized())))
                .set(users::avatar.eq(Some(avatar.as_ref())))
                .returning(UserRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }
}
