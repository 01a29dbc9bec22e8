//! Client Module
//!
//! The cache-operation surface shared by the real memcached facade and the
//! mock client, plus the builder that picks one of them.

mod builder;
mod memcached;

use std::collections::HashMap;

use crate::error::Result;
use crate::item::Item;

pub use self::builder::ClientBuilder;
pub use self::memcached::MemcacheClient;

// == Client Trait ==
/// Operations of a memcached client.
///
/// Keys must be at most 250 bytes long.
pub trait Client: Send + Sync {
    /// Deletes all items in the cache.
    fn flush_all(&self) -> Result<()>;

    /// Gets the item for the given key. `CacheMiss` is returned when the key
    /// has no value.
    fn get(&self, key: &str) -> Result<Item>;

    /// Updates the expiry for the given key. `seconds` is either relative
    /// (up to 30 days) or a Unix timestamp; zero means no expiration.
    /// `CacheMiss` is returned if the key is not in the cache.
    fn touch(&self, key: &str, seconds: u32) -> Result<()>;

    /// Batch version of Get. The map may have fewer entries than `keys`
    /// because of cache misses.
    fn get_multi(&self, keys: &[&str]) -> Result<HashMap<String, Item>>;

    /// Writes the item unconditionally.
    fn set(&self, item: &Item) -> Result<()>;

    /// Writes the item only if no value exists for its key, otherwise
    /// `NotStored`.
    fn add(&self, item: &Item) -> Result<()>;

    /// Writes the item only if the server already holds its key.
    fn replace(&self, item: &Item) -> Result<()>;

    /// Writes an item previously returned by Get if it was neither modified
    /// nor evicted since. Both modification and eviction are reported as
    /// `CasConflict`.
    fn compare_and_swap(&self, item: &Item) -> Result<()>;

    /// Deletes the item. `CacheMiss` if it did not exist.
    fn delete(&self, key: &str) -> Result<()>;

    /// Deletes all items in the cache.
    fn delete_all(&self) -> Result<()>;

    /// Checks that every server is alive.
    fn ping(&self) -> Result<()>;

    /// Atomically increments a decimal counter; wraps on 64-bit overflow.
    fn increment(&self, key: &str, delta: u64) -> Result<u64>;

    /// Atomically decrements a decimal counter; saturates at zero.
    fn decrement(&self, key: &str, delta: u64) -> Result<u64>;

    /// Returns true if an item with the given key exists.
    ///
    /// A cache miss is `Ok(false)`; any other error propagates.
    fn exists(&self, key: &str) -> Result<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(err) if err.is_miss() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
