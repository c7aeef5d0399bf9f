//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{contacts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub email_key: &'a str,
    pub avatar: Option<&'a str>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub born_date: NaiveDateTime,
}

/// Insertable struct for creating contacts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub owner_id: Uuid,
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub born_date: NaiveDateTime,
}

/// Changeset replacing every user-supplied contact column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts)]
pub(crate) struct ContactUpdate<'a> {
    pub name: &'a str,
    pub surname: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub born_date: NaiveDateTime,
}
