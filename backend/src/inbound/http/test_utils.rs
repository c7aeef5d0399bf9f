//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    ContactsCommand, ContactsQuery, IdentityResolver, MockAccountCommand, MockContactsCommand,
    MockContactsQuery,
};
use crate::domain::{AvatarUrl, EmailAddress, Error, UserAccount, UserId, Username};

use super::state::HttpState;

/// Token accepted by [`StaticIdentity`].
pub const TEST_TOKEN: &str = "test-token";

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Account returned for [`TEST_TOKEN`].
pub fn test_account() -> UserAccount {
    let email = EmailAddress::new("ada@example.com").expect("fixture email");
    UserAccount {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        username: Username::new("ada_l").expect("fixture username"),
        avatar: Some(AvatarUrl::gravatar_for(&email)),
        email,
        confirmed: true,
        created_at: Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("fixture timestamp"),
    }
}

/// Resolves [`TEST_TOKEN`] to [`test_account`]; unconfirmed accounts are
/// rejected the way the account service rejects them.
pub struct StaticIdentity {
    confirmed: bool,
}

#[async_trait]
impl IdentityResolver for StaticIdentity {
    async fn resolve(&self, token: &str) -> Result<Option<UserAccount>, Error> {
        if token != TEST_TOKEN {
            return Ok(None);
        }
        if !self.confirmed {
            return Err(Error::unauthorized("email not confirmed"));
        }
        Ok(Some(test_account()))
    }
}

/// State with the given contact ports and an account mock without
/// expectations.
pub fn state_with(
    contacts: impl ContactsCommand + 'static,
    contacts_query: impl ContactsQuery + 'static,
) -> HttpState {
    state_with_accounts(contacts, contacts_query, MockAccountCommand::new())
}

/// State with every port supplied by the caller.
pub fn state_with_accounts(
    contacts: impl ContactsCommand + 'static,
    contacts_query: impl ContactsQuery + 'static,
    accounts: MockAccountCommand,
) -> HttpState {
    HttpState::new(
        Arc::new(contacts),
        Arc::new(contacts_query),
        Arc::new(accounts),
        Arc::new(StaticIdentity { confirmed: true }),
    )
}

/// State whose identity resolver treats the account as (un)confirmed.
pub fn state_with_identity(confirmed: bool) -> HttpState {
    HttpState::new(
        Arc::new(MockContactsCommand::new()),
        Arc::new(MockContactsQuery::new()),
        Arc::new(MockAccountCommand::new()),
        Arc::new(StaticIdentity { confirmed }),
    )
}
