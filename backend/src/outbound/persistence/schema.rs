//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered account holders.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login handle.
        username -> Varchar,
        /// Email address as supplied at registration.
        email -> Varchar,
        /// Trimmed, lower-cased email used for lookups. Unique.
        email_key -> Varchar,
        /// Profile picture URL.
        avatar -> Nullable<Varchar>,
        /// Whether the email address has been confirmed.
        confirmed -> Bool,
        /// Hex SHA-256 digest of the current bearer token. Unique when set.
        token_digest -> Nullable<Varchar>,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Owner-scoped address book entries.
    contacts (id) {
        /// Primary key assigned by a sequence.
        id -> Int8,
        /// Owning account; cascades on account deletion.
        owner_id -> Uuid,
        name -> Varchar,
        surname -> Varchar,
        email -> Varchar,
        phone -> Varchar,
        /// Birth date and time without zone, as supplied.
        born_date -> Timestamp,
    }
}

diesel::joinable!(contacts -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(users, contacts);
