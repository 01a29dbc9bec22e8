//! Cache Item Module
//!
//! Defines the item stored in and returned by memcached, together with the
//! expiration encoding rules of the memcached protocol.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 250;

/// Expiration values above this many seconds are absolute Unix timestamps
pub const RELATIVE_EXPIRATION_LIMIT: u32 = 60 * 60 * 24 * 30;

// == Item ==
/// A single memcached entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    /// The item key, at most 250 bytes
    pub key: String,
    /// The stored value
    pub value: Vec<u8>,
    /// Opaque server-side flags
    pub flags: u32,
    /// 0 = never, <= 30 days = relative seconds, otherwise Unix time
    pub expiration: u32,
    /// CAS token issued by the server on Get, consumed by CompareAndSwap
    pub cas_id: Option<u64>,
}

impl Item {
    // == Constructor ==
    /// Creates an item with no flags and no expiration.
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Sets the opaque flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the raw expiration value (relative seconds or Unix time).
    pub fn with_expiration(mut self, expiration: u32) -> Self {
        self.expiration = expiration;
        self
    }

    /// Sets the CAS token, as returned by a previous Get.
    pub fn with_cas_id(mut self, cas_id: u64) -> Self {
        self.cas_id = Some(cas_id);
        self
    }

    // == Expires At ==
    /// Expires the item at an absolute instant.
    ///
    /// Instants within the relative window are sent as relative seconds, later
    /// ones as a Unix timestamp. An instant that is not in the future is
    /// encoded as one second, never as zero ("never expires").
    pub fn expires_at(self, at: DateTime<Utc>) -> Self {
        let expiration = encode_expiration(at, Utc::now());
        self.with_expiration(expiration)
    }

    // == Value As Text ==
    /// Returns the value decoded as UTF-8, replacing invalid sequences.
    pub fn value_str(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    /// Returns a copy with the fields that do not identify a call zeroed.
    pub(crate) fn normalized(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            flags: 0,
            expiration: 0,
            cas_id: None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item{{Key: {}, Value: {}}}", self.key, self.value_str())
    }
}

// == Utility Functions ==
/// Encodes `at` as a memcached expiration value relative to `now`.
pub fn encode_expiration(at: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let delta = (at - now).num_seconds();
    if delta <= 0 {
        return 1;
    }
    if delta <= i64::from(RELATIVE_EXPIRATION_LIMIT) {
        return delta as u32;
    }
    u32::try_from(at.timestamp()).unwrap_or(u32::MAX)
}

/// Checks a key against the memcached key rules.
///
/// Returns an error message if the key is invalid, None if valid.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    if key.bytes().any(|b| b <= b' ' || b == 0x7f) {
        return Some(format!("key {:?} contains whitespace or control characters", key));
    }
    None
}
