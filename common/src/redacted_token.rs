//! The Fizzy API token, kept out of logs and serialized output.

use crate::{ErrorLocation, RedactError};

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

const BEARER_PREFIX: &str = "Bearer ";

/// A bearer token whose value only leaves this type through
/// [`RedactedToken::bearer`] or [`RedactedToken::as_str`].
#[derive(Clone, Default)]
pub struct RedactedToken {
    inner: String,
}

impl RedactedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: token.into(),
        }
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.inner)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Shows whether a token is present, never what it is.
impl fmt::Debug for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inner.is_empty() {
            f.write_str("RedactedToken(<none>)")
        } else {
            f.write_str("RedactedToken([REDACTED])")
        }
    }
}

impl fmt::Display for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED TOKEN]")
    }
}

impl Drop for RedactedToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for RedactedToken {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::TokenSerialization {
            message: String::from("API token cannot be serialized; pass bearer() to the request instead"),
            location: ErrorLocation::caller(),
        }))
    }
}
