//! Error types for the cache client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type shared by the real client and the mock client.
///
/// The type is `Clone` so a recorded mock outcome can be replayed verbatim
/// any number of times.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The key has no current value on the server
    #[error("memcache: cache miss")]
    CacheMiss,

    /// An Add/Replace/CompareAndSwap precondition was not met
    #[error("memcache: item not stored")]
    NotStored,

    /// The value was modified between Get and CompareAndSwap
    #[error("memcache: compare-and-swap conflict")]
    CasConflict,

    /// Key is empty, too long, or contains whitespace/control characters
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// Item cannot be sent as requested (e.g. CAS without a cas id)
    #[error("malformed item: {0}")]
    MalformedItem(String),

    /// A server address the client cannot use as given
    #[error("unsupported server: {0}")]
    UnsupportedServer(String),

    /// The builder was asked for a real client without any server
    #[error("no servers configured")]
    NoServers,

    /// Any other failure reported by the underlying memcache library
    #[error("backend error: {0}")]
    Backend(String),

    /// No mock was registered for the call signature
    #[error("mock not found")]
    MockNotFound,
}

impl CacheError {
    // == Is Miss ==
    /// Returns true for a genuine cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::CacheMiss)
    }
}

// == Backend Conversion ==
impl From<memcache::MemcacheError> for CacheError {
    fn from(err: memcache::MemcacheError) -> Self {
        use memcache::{CommandError, MemcacheError};

        match err {
            MemcacheError::CommandError(CommandError::KeyNotFound) => CacheError::CacheMiss,
            MemcacheError::CommandError(CommandError::KeyExists) => CacheError::CasConflict,
            // Binary protocol status 0x05 (NOT_STORED) has no named variant
            MemcacheError::CommandError(CommandError::Unknown(0x05)) => CacheError::NotStored,
            other => CacheError::Backend(other.to_string()),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache client.
pub type Result<T> = std::result::Result<T, CacheError>;
