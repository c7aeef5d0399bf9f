//! Email address value object shared by contacts and accounts.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum accepted length of an email address.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Local part per RFC 5322 atext, domain made of dot-separated labels.
        match Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
        ) {
            Ok(regex) => regex,
            Err(error) => panic!("email regex failed to compile: {error}"),
        }
    })
}

/// Validation errors returned by [`EmailAddress::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was empty.
    #[error("email must not be empty")]
    Empty,
    /// The address exceeded [`EMAIL_MAX`] characters.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The address is not syntactically valid.
    #[error("email must be a valid address")]
    Malformed,
}

/// Syntactically valid email address, stored exactly as supplied.
///
/// # Examples
/// ```
/// use contacts::domain::EmailAddress;
///
/// let email = EmailAddress::new("ada@example.com").expect("valid email");
/// assert_eq!(email.as_ref(), "ada@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn new(value: impl Into<String>) -> Result<Self, EmailValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&value) {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(value))
    }

    /// Lower-cased, trimmed form used for hashing and account lookups.
    pub fn normalized(&self) -> String {
        self.0.trim().to_lowercase()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
