//! Account holders who own contacts.
//!
//! Contact operations only need the stable [`UserId`]; the remaining
//! attributes back the account endpoints and the admin CLI.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;
use uuid::Uuid;

use super::email::EmailAddress;

/// Validation errors raised by user value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was shorter than [`USERNAME_MIN`].
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum permitted length.
        min: usize,
    },
    /// The username was longer than [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The username contained unsupported characters.
    #[error("username may only contain letters, numbers, dots, hyphens, or underscores")]
    UsernameInvalidCharacters,
    /// The avatar was not an absolute http(s) URL.
    #[error("avatar must be an absolute http or https URL")]
    InvalidAvatarUrl,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 5;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 16;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        match Regex::new(r"^[A-Za-z0-9._-]+$") {
            Ok(regex) => regex,
            Err(error) => panic!("username regex failed to compile: {error}"),
        }
    })
}

/// Login handle chosen at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let length = value.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&value) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Absolute http(s) URL of a profile picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Validate and construct an avatar URL.
    ///
    /// # Examples
    /// ```
    /// use contacts::domain::AvatarUrl;
    ///
    /// assert!(AvatarUrl::new("https://cdn.example.com/a.png").is_ok());
    /// assert!(AvatarUrl::new("ftp://cdn.example.com/a.png").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let parsed = Url::parse(&value).map_err(|_| UserValidationError::InvalidAvatarUrl)?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(UserValidationError::InvalidAvatarUrl);
        }
        Ok(Self(value))
    }

    /// Gravatar identicon for `email`, keyed by the SHA-256 of the normalised
    /// address.
    pub fn gravatar_for(email: &EmailAddress) -> Self {
        let digest = hex::encode(Sha256::digest(email.normalized().as_bytes()));
        Self(format!("https://www.gravatar.com/avatar/{digest}?d=identicon"))
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AvatarUrl> for String {
    fn from(value: AvatarUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for AvatarUrl {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered account as stored by the user repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Stable owner key for contacts.
    pub id: UserId,
    /// Login handle.
    pub username: Username,
    /// Unique account email.
    pub email: EmailAddress,
    /// Profile picture, if any.
    pub avatar: Option<AvatarUrl>,
    /// Whether the email address has been confirmed.
    pub confirmed: bool,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Registration payload passed to the user repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserAccount {
    /// Identifier assigned by the caller.
    pub id: UserId,
    /// Login handle.
    pub username: Username,
    /// Unique account email.
    pub email: EmailAddress,
    /// Profile picture; repositories store it verbatim.
    pub avatar: AvatarUrl,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}
