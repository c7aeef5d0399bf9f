//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Contact, ContactDraft, ContactFields: owner-scoped address book entries.
//! - BirthdayWindow: upcoming birthday selection.
//! - UserAccount: account holder owning contacts.

pub mod access_token;
pub mod account_service;
pub mod birthdays;
pub mod contact;
pub mod contacts_service;
pub mod email;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod search;
pub mod trace_id;
pub mod user;

pub use self::access_token::{AccessToken, TokenDigest};
pub use self::account_service::AccountService;
pub use self::birthdays::{
    BIRTHDAY_WINDOW_DAYS, BirthdayWindow, BirthdayWindowPolicy, UnknownBirthdayWindowPolicy,
};
pub use self::contact::{
    Contact, ContactDraft, ContactFields, ContactId, ContactValidationError, DEFAULT_NAME,
    DEFAULT_PHONE, DEFAULT_SURNAME, FIELD_MAX,
};
pub use self::contacts_service::ContactsService;
pub use self::email::{EmailAddress, EmailValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::pagination::{Pagination, PaginationError};
pub use self::search::{SearchField, SearchToken, SearchTokenError};
pub use self::trace_id::TraceId;
pub use self::user::{
    AvatarUrl, NewUserAccount, UserAccount, UserId, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use contacts::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such contact"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
