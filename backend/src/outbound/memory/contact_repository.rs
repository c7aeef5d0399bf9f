//! In-memory [`ContactRepository`].

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{ContactRepository, ContactRepositoryError};
use crate::domain::{
    Contact, ContactFields, ContactId, Pagination, SearchField, SearchToken, UserId,
};

use super::poisoned;

#[derive(Debug, Default)]
struct ContactTable {
    rows: BTreeMap<ContactId, Contact>,
    last_id: i64,
}

impl ContactTable {
    fn owned_by<'a>(&'a self, owner: &'a UserId) -> impl Iterator<Item = &'a Contact> + 'a {
        self.rows
            .values()
            .filter(move |contact| contact.owner_id() == owner)
    }
}

/// Contact store keyed by id, ordered like a primary-key scan.
#[derive(Debug, Default)]
pub struct InMemoryContactRepository {
    table: Mutex<ContactTable>,
}

impl InMemoryContactRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> Result<MutexGuard<'_, ContactTable>, ContactRepositoryError> {
        self.table
            .lock()
            .map_err(|_| ContactRepositoryError::query(poisoned("contact")))
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn list(
        &self,
        owner: &UserId,
        page: Pagination,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let table = self.table()?;
        Ok(page.apply(table.owned_by(owner)).cloned().collect())
    }

    async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        let table = self.table()?;
        Ok(table.owned_by(owner).cloned().collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let table = self.table()?;
        Ok(table
            .rows
            .get(&id)
            .filter(|contact| contact.owner_id() == owner)
            .cloned())
    }

    async fn insert(
        &self,
        owner: &UserId,
        fields: &ContactFields,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut table = self.table()?;
        table.last_id += 1;
        let contact = Contact::new(ContactId::new(table.last_id), *owner, fields.clone());
        table.rows.insert(contact.id(), contact.clone());
        Ok(contact)
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: ContactId,
        fields: &ContactFields,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut table = self.table()?;
        let Some(contact) = table
            .rows
            .get_mut(&id)
            .filter(|contact| contact.owner_id() == owner)
        else {
            return Ok(None);
        };
        contact.replace_fields(fields.clone());
        Ok(Some(contact.clone()))
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut table = self.table()?;
        let owned = table
            .rows
            .get(&id)
            .is_some_and(|contact| contact.owner_id() == owner);
        Ok(if owned { table.rows.remove(&id) } else { None })
    }

    async fn find_matching(
        &self,
        owner: &UserId,
        field: SearchField,
        token: &SearchToken,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let table = self.table()?;
        Ok(table
            .owned_by(owner)
            .filter(|contact| field.matches(contact, token))
            .cloned()
            .collect())
    }
}
