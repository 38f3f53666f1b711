//! Bearer credential forwarded to the record store.

use std::fmt;

use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Errors returned by [`Credential::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The credential was empty or only whitespace.
    #[error("a bearer credential is required")]
    Empty,
}

/// Caller-supplied bearer token used to authenticate store requests.
///
/// The token is passed through untouched; no login flow is performed. The
/// `Debug` representation never reveals the token.
///
/// # Examples
///
/// ```
/// use hop_core::Credential;
///
/// # fn main() -> Result<(), hop_core::CredentialError> {
/// let credential = Credential::new("abc123")?;
/// assert_eq!(credential.authorization_header(), "Bearer abc123");
///
/// let prefixed = Credential::new("Bearer abc123")?;
/// assert_eq!(prefixed.authorization_header(), "Bearer abc123");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Validates and constructs a [`Credential`].
    ///
    /// A leading `Bearer ` prefix is accepted and stripped.
    pub fn new(token: impl AsRef<str>) -> Result<Self, CredentialError> {
        let trimmed = token.as_ref().trim();
        let bare = trimmed.strip_prefix(BEARER_PREFIX).unwrap_or(trimmed).trim();
        if bare.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self {
            token: bare.to_owned(),
        })
    }

    /// Value for the HTTP `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.token)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .finish()
    }
}
