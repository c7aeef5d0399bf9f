//! Contact domain service.
//!
//! Implements the contact driving ports over a [`ContactRepository`]: write
//! validation, the credential search fallback, and birthday window selection.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, ContactsCommand, ContactsQuery,
};
use crate::domain::{
    BirthdayWindow, BirthdayWindowPolicy, Contact, ContactDraft, ContactFields, ContactId, Error,
    Pagination, SearchField, SearchToken, UserId,
};

fn map_repository_error(error: ContactRepositoryError) -> Error {
    match error {
        ContactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("contact repository unavailable: {message}"))
        }
        ContactRepositoryError::Query { message } => {
            Error::internal(format!("contact repository error: {message}"))
        }
    }
}

fn validate(draft: ContactDraft) -> Result<ContactFields, Error> {
    draft
        .validate()
        .map_err(|err| Error::invalid_request(err.to_string()).with_details(err.details()))
}

/// Contact service implementing [`ContactsQuery`] and [`ContactsCommand`].
#[derive(Clone)]
pub struct ContactsService<R> {
    contact_repo: Arc<R>,
    clock: Arc<dyn Clock>,
    birthday_policy: BirthdayWindowPolicy,
}

impl<R> ContactsService<R> {
    /// Create a service using the default birthday window policy.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use contacts::domain::ContactsService;
    /// # use contacts::domain::ports::FixtureContactRepository;
    /// # use mockable::DefaultClock;
    /// let service = ContactsService::new(Arc::new(FixtureContactRepository), Arc::new(DefaultClock));
    /// ```
    pub fn new(contact_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            contact_repo,
            clock,
            birthday_policy: BirthdayWindowPolicy::default(),
        }
    }

    /// Select the birthday window policy.
    #[must_use]
    pub fn with_birthday_policy(mut self, policy: BirthdayWindowPolicy) -> Self {
        self.birthday_policy = policy;
        self
    }
}

#[async_trait]
impl<R> ContactsQuery for ContactsService<R>
where
    R: ContactRepository,
{
    async fn list(&self, owner: &UserId, page: Pagination) -> Result<Vec<Contact>, Error> {
        self.contact_repo
            .list(owner, page)
            .await
            .map_err(map_repository_error)
    }

    async fn get(&self, owner: &UserId, id: ContactId) -> Result<Option<Contact>, Error> {
        self.contact_repo
            .find(owner, id)
            .await
            .map_err(map_repository_error)
    }

    async fn search(&self, owner: &UserId, token: &SearchToken) -> Result<Vec<Contact>, Error> {
        for field in SearchField::PRIORITY {
            let hits = self
                .contact_repo
                .find_matching(owner, field, token)
                .await
                .map_err(map_repository_error)?;
            if !hits.is_empty() {
                debug!(%field, matches = hits.len(), "credential search matched");
                return Ok(hits);
            }
        }
        Ok(Vec::new())
    }

    async fn upcoming_birthdays(&self, owner: &UserId) -> Result<Vec<Contact>, Error> {
        let contacts = self
            .contact_repo
            .list_all(owner)
            .await
            .map_err(map_repository_error)?;
        let window = BirthdayWindow::new(self.birthday_policy, self.clock.utc().naive_utc());
        Ok(window.select(contacts))
    }
}

#[async_trait]
impl<R> ContactsCommand for ContactsService<R>
where
    R: ContactRepository,
{
    async fn create(&self, owner: &UserId, draft: ContactDraft) -> Result<Contact, Error> {
        let fields = validate(draft)?;
        let contact = self
            .contact_repo
            .insert(owner, &fields)
            .await
            .map_err(map_repository_error)?;
        debug!(contact_id = %contact.id(), "contact created");
        Ok(contact)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: ContactId,
        draft: ContactDraft,
    ) -> Result<Option<Contact>, Error> {
        let fields = validate(draft)?;
        self.contact_repo
            .replace(owner, id, &fields)
            .await
            .map_err(map_repository_error)
    }

    async fn delete(&self, owner: &UserId, id: ContactId) -> Result<Option<Contact>, Error> {
        self.contact_repo
            .delete(owner, id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "contacts_service_tests.rs"]
mod tests;
