//! Builders for HTTP state ports backed by PostgreSQL or memory.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::{info, warn};

use contacts::domain::ports::{
    AccountCommand, ContactRepository, ContactsCommand, ContactsQuery, IdentityResolver,
    UserRepository,
};
use contacts::domain::{
    AccessToken, AccountService, BirthdayWindowPolicy, ContactsService, EmailAddress, Error,
    ErrorCode, Username,
};
use contacts::inbound::http::state::HttpState;
use contacts::outbound::memory::{InMemoryContactRepository, InMemoryUserRepository};
use contacts::outbound::persistence::{DbPool, DieselContactRepository, DieselUserRepository};

use super::ServerConfig;

const DEV_ACCOUNT_USERNAME: &str = "devuser";

/// Wire domain services over the given repositories.
fn build_state_with<C, U>(
    contact_repo: C,
    user_repo: U,
    clock: Arc<dyn Clock>,
    policy: BirthdayWindowPolicy,
) -> HttpState
where
    C: ContactRepository + 'static,
    U: UserRepository + 'static,
{
    let contacts = Arc::new(
        ContactsService::new(Arc::new(contact_repo), clock.clone()).with_birthday_policy(policy),
    );
    let accounts = Arc::new(AccountService::new(Arc::new(user_repo), clock));
    HttpState::new(
        contacts.clone() as Arc<dyn ContactsCommand>,
        contacts as Arc<dyn ContactsQuery>,
        accounts.clone() as Arc<dyn AccountCommand>,
        accounts as Arc<dyn IdentityResolver>,
    )
}

fn build_db_state(pool: &DbPool, config: &ServerConfig) -> HttpState {
    build_state_with(
        DieselContactRepository::new(pool.clone()),
        DieselUserRepository::new(pool.clone()),
        config.clock.clone(),
        config.birthday_policy,
    )
}

fn build_memory_state(config: &ServerConfig) -> HttpState {
    build_state_with(
        InMemoryContactRepository::new(),
        InMemoryUserRepository::new(),
        config.clock.clone(),
        config.birthday_policy,
    )
}

/// Build the shared HTTP state, using the Diesel adapters when a pool is
/// configured and in-memory adapters otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => build_db_state(pool, config),
        None => {
            info!("no database configured; contacts are kept in memory");
            build_memory_state(config)
        }
    };
    web::Data::new(state)
}

/// Register, confirm, and issue a token for the in-memory dev account.
///
/// The token is logged once at `warn` so it stands out in the JSON log
/// stream; it is the only way to authenticate against an in-memory server.
pub(crate) async fn seed_dev_account(
    accounts: &dyn AccountCommand,
    email: &EmailAddress,
) -> Result<AccessToken, Error> {
    let username = Username::new(DEV_ACCOUNT_USERNAME)
        .map_err(|err| Error::internal(format!("invalid dev account username: {err}")))?;
    match accounts.register(username, email.clone()).await {
        Ok(_) => {}
        Err(err) if err.code() == ErrorCode::Conflict => {}
        Err(err) => return Err(err),
    }
    accounts.confirm_email(email).await?;
    let token = accounts.rotate_token(email).await?;
    warn!(
        email = %email,
        token = token.expose(),
        "seeded in-memory dev account; use this bearer token"
    );
    Ok(token)
}
