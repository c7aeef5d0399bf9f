//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.
//!
//! Every statement filters on `owner_id`, so a contact id belonging to another
//! owner behaves exactly like a missing row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContactRepository, ContactRepositoryError};
use crate::domain::{
    Contact, ContactDraft, ContactFields, ContactId, Pagination, SearchField, SearchToken, UserId,
};

use super::diesel_basic_error_mapping::{
    contains_pattern, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{ContactRow, ContactUpdate, NewContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::contacts;

/// Diesel-backed implementation of the contact repository port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactRepositoryError {
    map_basic_pool_error(error, ContactRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    map_basic_diesel_error(
        error,
        ContactRepositoryError::query,
        ContactRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain contact.
fn row_to_contact(row: ContactRow) -> Result<Contact, ContactRepositoryError> {
    let ContactRow {
        id,
        owner_id,
        name,
        surname,
        email,
        phone,
        born_date,
    } = row;

    let fields = ContactDraft {
        name: Some(name),
        surname: Some(surname),
        email,
        phone: Some(phone),
        born_date,
        done: None,
    }
    .validate()
    .map_err(|err| ContactRepositoryError::query(format!("stored contact {id}: {err}")))?;

    Ok(Contact::new(
        ContactId::new(id),
        UserId::from_uuid(owner_id),
        fields,
    ))
}

fn rows_to_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, ContactRepositoryError> {
    rows.into_iter().map(row_to_contact).collect()
}

fn update_row(fields: &ContactFields) -> ContactUpdate<'_> {
    ContactUpdate {
        name: fields.name(),
        surname: fields.surname(),
        email: fields.email().as_ref(),
        phone: fields.phone(),
        born_date: fields.born_date(),
    }
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn list(
        &self,
        owner: &UserId,
        page: Pagination,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::owner_id.eq(*owner.as_uuid()))
            .order(contacts::id.asc())
            .offset(page.skip())
            .limit(page.limit())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_contacts(rows)
    }

    async fn list_all(&self, owner: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::owner_id.eq(*owner.as_uuid()))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_contacts(rows)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ContactRow> = contacts::table
            .filter(contacts::id.eq(id.get()))
            .filter(contacts::owner_id.eq(*owner.as_uuid()))
            .select(ContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn insert(
        &self,
        owner: &UserId,
        fields: &ContactFields,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewContactRow {
            owner_id: *owner.as_uuid(),
            name: fields.name(),
            surname: fields.surname(),
            email: fields.email().as_ref(),
            phone: fields.phone(),
            born_date: fields.born_date(),
        };
        let row: ContactRow = diesel::insert_into(contacts::table)
            .values(&new_row)
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_contact(row)
    }

    async fn replace(
        &self,
        owner: &UserId,
        id: ContactId,
        fields: &ContactFields,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ContactRow> = diesel::update(
            contacts::table
                .filter(contacts::id.eq(id.get()))
                .filter(contacts::owner_id.eq(*owner.as_uuid())),
        )
        .set(&update_row(fields))
        .returning(ContactRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn delete(
        &self,
        owner: &UserId,
        id: ContactId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ContactRow> = diesel::delete(
            contacts::table
                .filter(contacts::id.eq(id.get()))
                .filter(contacts::owner_id.eq(*owner.as_uuid())),
        )
        .returning(ContactRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        row.map(row_to_contact).transpose()
    }

    async fn find_matching(
        &self,
        owner: &UserId,
        field: SearchField,
        token: &SearchToken,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = contains_pattern(token.as_str());
        let query = contacts::table
            .filter(contacts::owner_id.eq(*owner.as_uuid()))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .into_boxed();
        let query = match field {
            SearchField::Name => query.filter(contacts::name.like(pattern).escape('\\')),
            SearchField::Surname => query.filter(contacts::surname.like(pattern).escape('\\')),
            SearchField::Email => query.filter(contacts::email.like(pattern).escape('\\')),
        };
        let rows: Vec<ContactRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_contacts(rows)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(email: &str) -> ContactRow {
        ContactRow {
            id: 7,
            owner_id: Uuid::nil(),
            name: "Ada".to_owned(),
            surname: "Lovelace".to_owned(),
            email: email.to_owned(),
            phone: "+441234".to_owned(),
            born_date: NaiveDate::from_ymd_opt(1815, 12, 10)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .expect("valid fixture date"),
        }
    }

    #[rstest]
    fn row_to_contact_preserves_columns() {
        let contact = row_to_contact(row("ada@example.com")).expect("valid row");

        assert_eq!(contact.id(), ContactId::new(7));
        assert_eq!(contact.owner_id(), &UserId::from_uuid(Uuid::nil()));
        assert_eq!(contact.surname(), "Lovelace");
        assert_eq!(contact.phone(), "+441234");
    }

    #[rstest]
    fn row_to_contact_rejects_corrupt_email() {
        let err = row_to_contact(row("corrupt")).expect_err("invalid stored email");
        assert!(matches!(err, ContactRepositoryError::Query { .. }));
    }
}
