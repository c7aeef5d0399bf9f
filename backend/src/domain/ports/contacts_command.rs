//! Driving port for contact mutations.

use async_trait::async_trait;

use crate::domain::{Contact, ContactDraft, ContactId, Error, UserId};

/// Driving port for contact writes.
///
/// Validation failures surface as [`crate::domain::ErrorCode::InvalidRequest`];
/// a missing contact is `Ok(None)` so adapters decide how to report it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    /// Validate and store a new contact.
    async fn create(&self, owner: &UserId, draft: ContactDraft) -> Result<Contact, Error>;

    /// Validate and fully replace an existing contact.
    async fn update(
        &self,
        owner: &UserId,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Option<Contact>, Error>;

    /// Delete a contact, returning the removed record.
    async fn delete(&self, owner: &UserId, id: ContactId) -> Result<Option<Contact>, Error>;
}
