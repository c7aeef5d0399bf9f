//! Driving port for contact read operations.
//!
//! Inbound adapters use this port to list, fetch, search, and filter an
//! owner's contacts without depending on repository details.

use async_trait::async_trait;

use crate::domain::{Contact, ContactId, Error, Pagination, SearchToken, UserId};

/// Driving port for contact reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsQuery: Send + Sync {
    /// Page through an owner's contacts.
    async fn list(&self, owner: &UserId, page: Pagination) -> Result<Vec<Contact>, Error>;

    /// Fetch one contact; `None` when it does not exist for this owner.
    async fn get(&self, owner: &UserId, id: ContactId) -> Result<Option<Contact>, Error>;

    /// Credential search with name, surname, then email fallback. Returns an
    /// empty list when no field matches.
    async fn search(&self, owner: &UserId, token: &SearchToken) -> Result<Vec<Contact>, Error>;

    /// Contacts whose birthday falls within the configured window from now.
    async fn upcoming_birthdays(&self, owner: &UserId) -> Result<Vec<Contact>, Error>;
}
