//! Port for owner-scoped contact persistence.
//!
//! Every operation takes the owning [`UserId`] and must never observe or
//! mutate another owner's records. Absence is reported as `None`, not as an
//! error.

use async_trait::async_trait;

use crate::domain::{
    Contact, ContactFields, ContactId, Pagination, SearchField, SearchToken, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied failure description.
            message: String,
        } =>
            "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied failure description.
            message: String,
        } =>
            "contact repository query failed: {message}",
    }
}

/// Port for reading and writing contacts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// List an owner's contacts in primary-key order within `page`.
    async fn list(
        &self,
        owner: &UserId,
        page: Pagination,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// List every contact of an owner in primary-key order.
    async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Find one contact by id within the owner's scope.
    async fn find(
        &self,
        owner: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Persist a new contact and return it with its assigned id.
    async fn insert(
        &self,
        owner: &UserId,
        fields: &ContactFields,
    ) -> Result<Contact, ContactRepositoryError>;

    /// Overwrite every field of an existing contact. Never inserts.
    async fn replace(
        &self,
        owner: &UserId,
        id: ContactId,
        fields: &ContactFields,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Remove a contact and return the deleted record.
    async fn delete(
        &self,
        owner: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Contacts whose `field` contains `token` as a case-sensitive literal
    /// substring, in primary-key order.
    async fn find_matching(
        &self,
        owner: &UserId,
        field: SearchField,
        token: &SearchToken,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;
}

/// Fixture implementation for tests that do not exercise contact storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureContactRepository;

#[async_trait]
impl ContactRepository for FixtureContactRepository {
    async fn list(
        &self,
        _owner: &UserId,
        _page: Pagination,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self, _owner: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }

    async fn find(
        &self,
        _owner: &UserId,
        _id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn insert(
        &self,
        owner: &UserId,
        fields: &ContactFields,
    ) -> Result<Contact, ContactRepositoryError> {
        Ok(Contact::new(ContactId::new(1), *owner, fields.clone()))
    }

    async fn replace(
        &self,
        _owner: &UserId,
        _id: ContactId,
        _fields: &ContactFields,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn delete(
        &self,
        _owner: &UserId,
        _id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(None)
    }

    async fn find_matching(
        &self,
        _owner: &UserId,
        _field: SearchField,
        _token: &SearchToken,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        Ok(Vec::new())
    }
}
