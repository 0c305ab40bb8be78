//! Cache key derivation.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;

use rd_core::BoundingBox;

/// Lower-case hex SHA-1 digest of a normalised bounding box.
///
/// Boxes that agree to five decimal places on all four sides share a key.
/// The key doubles as the session id handed back by graph loads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

impl CacheKey {
    pub const LEN: usize = 40;

    /// Accept an existing key, e.g. a session id sent back by a client.
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyError> {
        let raw = value.into();
        if raw.len() != Self::LEN {
            return Err(CacheKeyError::WrongLength(raw.len()));
        }
        if !raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(CacheKeyError::NotHex);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Key for `bbox`: SHA-1 over its canonical `north,south,east,west` string.
pub fn key_of(bbox: &BoundingBox) -> CacheKey {
    let digest = Sha1::digest(bbox.canonical_string().as_bytes());
    CacheKey(hex::encode(digest))
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for CacheKey {
    type Error = CacheKeyError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        CacheKey::new(value)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Validation errors returned when constructing a [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyError {
    #[error("cache key must be {} characters, got {0}", CacheKey::LEN)]
    WrongLength(usize),

    #[error("cache key must be lower-case hexadecimal")]
    NotHex,
}
