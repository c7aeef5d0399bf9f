//! Contact records owned by a single user.
//!
//! A [`ContactDraft`] is the unvalidated write payload shared by create and
//! update. [`ContactDraft::validate`] applies defaults and length limits and
//! yields [`ContactFields`], the value every repository write receives.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::email::{EmailAddress, EmailValidationError};
use super::user::UserId;

/// Default `name` applied when a write omits it.
pub const DEFAULT_NAME: &str = "Default";
/// Default `surname` applied when a write omits it.
pub const DEFAULT_SURNAME: &str = "Contact";
/// Default `phone` applied when a write omits it.
pub const DEFAULT_PHONE: &str = "+421000000000";
/// Maximum length of `name`, `surname`, and `phone`.
pub const FIELD_MAX: usize = 50;

/// Store-assigned contact identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(i64);

impl ContactId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation failures for contact writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    /// A free-text field exceeded [`FIELD_MAX`] characters.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field name.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
    },
    /// The email address was rejected.
    #[error(transparent)]
    Email(#[from] EmailValidationError),
}

impl ContactValidationError {
    /// Field the failure refers to.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::TooLong { field, .. } => *field,
            Self::Email(_) => "email",
        }
    }

    /// Stable machine-readable failure code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TooLong { .. } => "too_long",
            Self::Email(_) => "invalid_email",
        }
    }

    /// Structured details for error payloads.
    pub fn details(&self) -> Value {
        json!({
            "field": self.field(),
            "code": self.code(),
        })
    }
}

/// Unvalidated contact payload used by create and update.
///
/// `done` is accepted for compatibility with existing clients and is not
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    /// Given name; defaults to [`DEFAULT_NAME`].
    pub name: Option<String>,
    /// Family name; defaults to [`DEFAULT_SURNAME`].
    pub surname: Option<String>,
    /// Email address, required.
    pub email: String,
    /// Phone number; defaults to [`DEFAULT_PHONE`].
    pub phone: Option<String>,
    /// Birth date. The time of day is retained as supplied.
    pub born_date: NaiveDateTime,
    /// Legacy completion flag with no behaviour.
    pub done: Option<bool>,
}

impl ContactDraft {
    /// Apply defaults and validate every field.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use contacts::domain::ContactDraft;
    ///
    /// let born = NaiveDate::from_ymd_opt(1990, 4, 27)
    ///     .and_then(|d| d.and_hms_opt(0, 0, 0))
    ///     .expect("valid date");
    /// let fields = ContactDraft {
    ///     name: None,
    ///     surname: Some("Lovelace".into()),
    ///     email: "ada@example.com".into(),
    ///     phone: None,
    ///     born_date: born,
    ///     done: None,
    /// }
    /// .validate()
    /// .expect("valid draft");
    /// assert_eq!(fields.name(), "Default");
    /// assert_eq!(fields.phone(), "+421000000000");
    /// ```
    pub fn validate(self) -> Result<ContactFields, ContactValidationError> {
        let Self {
            name,
            surname,
            email,
            phone,
            born_date,
            done: _,
        } = self;

        Ok(ContactFields {
            name: bounded("name", name, DEFAULT_NAME)?,
            surname: bounded("surname", surname, DEFAULT_SURNAME)?,
            email: EmailAddress::new(email)?,
            phone: bounded("phone", phone, DEFAULT_PHONE)?,
            born_date,
        })
    }
}

fn bounded(
    field: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<String, ContactValidationError> {
    let value = value.unwrap_or_else(|| default.to_owned());
    if value.chars().count() > FIELD_MAX {
        return Err(ContactValidationError::TooLong {
            field,
            max: FIELD_MAX,
        });
    }
    Ok(value)
}

/// Validated, user-supplied contact attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFields {
    name: String,
    surname: String,
    email: EmailAddress,
    phone: String,
    born_date: NaiveDateTime,
}

impl ContactFields {
    /// Given name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family name.
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// Email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Phone number.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Birth date and time as supplied.
    pub const fn born_date(&self) -> NaiveDateTime {
        self.born_date
    }
}

/// Stored contact record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    id: ContactId,
    owner_id: UserId,
    fields: ContactFields,
}

impl Contact {
    /// Assemble a stored record. Only repositories call this.
    pub const fn new(id: ContactId, owner_id: UserId, fields: ContactFields) -> Self {
        Self {
            id,
            owner_id,
            fields,
        }
    }

    /// Store-assigned identifier.
    pub const fn id(&self) -> ContactId {
        self.id
    }

    /// Owning user.
    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// User-supplied attributes.
    pub const fn fields(&self) -> &ContactFields {
        &self.fields
    }

    /// Given name.
    pub fn name(&self) -> &str {
        self.fields.name()
    }

    /// Family name.
    pub fn surname(&self) -> &str {
        self.fields.surname()
    }

    /// Email address.
    pub fn email(&self) -> &EmailAddress {
        self.fields.email()
    }

    /// Phone number.
    pub fn phone(&self) -> &str {
        self.fields.phone()
    }

    /// Birth date and time.
    pub const fn born_date(&self) -> NaiveDateTime {
        self.fields.born_date()
    }

    /// Replace every user-supplied attribute.
    pub fn replace_fields(&mut self, fields: ContactFields) {
        self.fields = fields;
    }
}
