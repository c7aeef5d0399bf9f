//! Opaque bearer tokens and the digests stored in their place.
//!
//! Raw tokens are shown to the account holder once and never persisted; the
//! user repository only sees the SHA-256 digest.

use std::fmt;

use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Freshly issued bearer token. The raw value is wiped on drop.
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Issue a new random token.
    pub fn generate() -> Self {
        Self(Zeroizing::new(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        )))
    }

    /// Expose the raw token for delivery to the account holder.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored by the user repository.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest::of(self.expose())
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Hex-encoded SHA-256 digest of a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Hash a raw bearer token.
    ///
    /// # Examples
    /// ```
    /// use contacts::domain::TokenDigest;
    ///
    /// let digest = TokenDigest::of("secret");
    /// assert_eq!(digest.as_ref().len(), 64);
    /// assert_eq!(digest, TokenDigest::of("secret"));
    /// ```
    pub fn of(raw: &str) -> Self {
        Self(hex::encode(Sha256::digest(raw.as_bytes())))
    }

    /// Rehydrate a digest previously produced by [`TokenDigest::of`].
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl AsRef<str> for TokenDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
