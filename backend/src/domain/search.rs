//! Credential search over an owner's contacts.
//!
//! A token is matched as a literal, case-sensitive substring against one field
//! at a time in [`SearchField::PRIORITY`] order. The first field producing any
//! match wins; later fields are not consulted.

use std::fmt;

use super::contact::Contact;

/// Contact attribute a credential search can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    /// Given name.
    Name,
    /// Family name.
    Surname,
    /// Email address.
    Email,
}

impl SearchField {
    /// Evaluation order for the fallback search.
    pub const PRIORITY: [Self; 3] = [Self::Name, Self::Surname, Self::Email];

    /// Value of this field on `contact`.
    pub fn value_of(self, contact: &Contact) -> &str {
        match self {
            Self::Name => contact.name(),
            Self::Surname => contact.surname(),
            Self::Email => contact.email().as_ref(),
        }
    }

    /// Whether `contact` matches `token` on this field.
    pub fn matches(self, contact: &Contact, token: &SearchToken) -> bool {
        self.value_of(contact).contains(token.as_str())
    }

    /// Stable lowercase name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for [`SearchToken::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchTokenError {
    /// The token was empty.
    #[error("search token must not be empty")]
    Empty,
}

/// Non-empty literal substring to search for.
///
/// Wildcard characters carry no special meaning. Length is not bounded; a
/// token longer than every field simply matches nothing.
///
/// # Examples
/// ```
/// use contacts::domain::SearchToken;
///
/// assert!(SearchToken::new("ada").is_ok());
/// assert!(SearchToken::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchToken(String);

impl SearchToken {
    /// Validate a raw token.
    pub fn new(raw: impl Into<String>) -> Result<Self, SearchTokenError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SearchTokenError::Empty);
        }
        Ok(Self(raw))
    }

    /// Raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
