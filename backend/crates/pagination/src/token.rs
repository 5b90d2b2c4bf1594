//! Continuation token encoding.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors raised while encoding or decoding a continuation token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token was empty.
    #[error("continuation token must not be empty")]
    Empty,
    /// The token was not valid base64.
    #[error("continuation token is not valid base64: {message}")]
    Encoding {
        /// Decoder diagnostic.
        message: String,
    },
    /// The token payload did not match the expected key shape.
    #[error("continuation token payload is invalid: {message}")]
    Payload {
        /// Serializer diagnostic.
        message: String,
    },
}

/// Opaque marker for the position after the last record of a page.
///
/// # Examples
/// ```
/// use pagination::ContinuationToken;
///
/// let token = ContinuationToken::encode(&("2026-01-01T00:00:00Z", 7_u32))
///     .expect("key serializes");
/// let key: (String, u32) = token.decode().expect("key decodes");
/// assert_eq!(key.1, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Encode an adapter-defined key into an opaque token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Payload`] when the key cannot be serialized.
    pub fn encode<K: Serialize>(key: &K) -> Result<Self, TokenError> {
        let json = serde_json::to_vec(key).map_err(|err| TokenError::Payload {
            message: err.to_string(),
        })?;
        Ok(Self(URL_SAFE_NO_PAD.encode(json)))
    }

    /// Decode the token back into the adapter-defined key.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Encoding`] for malformed base64 and
    /// [`TokenError::Payload`] when the payload does not match `K`.
    pub fn decode<K: DeserializeOwned>(&self) -> Result<K, TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(|err| TokenError::Encoding {
                message: err.to_string(),
            })?;
        serde_json::from_slice(&bytes).map_err(|err| TokenError::Payload {
            message: err.to_string(),
        })
    }

    /// Borrow the encoded form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContinuationToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for ContinuationToken {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(TokenError::Empty);
        }
        URL_SAFE_NO_PAD
            .decode(value.as_bytes())
            .map_err(|err| TokenError::Encoding {
                message: err.to_string(),
            })?;
        Ok(Self(value))
    }
}

impl From<ContinuationToken> for String {
    fn from(value: ContinuationToken) -> Self {
        value.0
    }
}
