//! Memcached Client Module
//!
//! Real client facade delegating to the `memcache` crate. Connection pooling,
//! hashing across servers and the wire protocol all live in that crate.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use memcache::ToMemcacheValue;
use tracing::info;

use crate::client::Client;
use crate::error::{CacheError, Result};
use crate::item::{validate_key, Item};

/// Scheme expected by the `memcache` crate for server urls
const URL_SCHEME: &str = "memcache://";

// == Memcache Client ==
/// Client backed by live memcached servers.
pub struct MemcacheClient {
    backend: memcache::Client,
}

impl MemcacheClient {
    // == Connect ==
    /// Connects to `servers` with a pool of `pool_size` connections each.
    ///
    /// Addresses without a scheme are treated as `memcache://host:port`.
    /// Only the binary protocol is accepted: over ASCII the backend reports
    /// a failed Add/Replace as success.
    pub fn connect(servers: &[String], timeout: Duration, pool_size: u32) -> Result<Self> {
        if servers.is_empty() {
            return Err(CacheError::NoServers);
        }
        let urls = servers
            .iter()
            .map(|s| server_url(s))
            .collect::<Result<Vec<String>>>()?;

        let backend = memcache::Client::with_pool_size(urls.clone(), pool_size)?;
        backend.set_read_timeout(Some(timeout))?;
        backend.set_write_timeout(Some(timeout))?;

        info!(
            "Memcache client connected: servers={:?}, timeout={:?}, pool_size={}",
            urls, timeout, pool_size
        );
        Ok(Self { backend })
    }
}

/// Prefixes the memcache scheme when the address has none and rejects
/// addresses selecting the ASCII protocol.
pub(crate) fn server_url(server: &str) -> Result<String> {
    let url = if server.contains("://") {
        server.to_string()
    } else {
        format!("{}{}", URL_SCHEME, server)
    };

    let ascii = url
        .split_once('?')
        .map(|(_, query)| {
            query
                .split('&')
                .any(|param| param.eq_ignore_ascii_case("protocol=ascii"))
        })
        .unwrap_or(false);
    if ascii {
        return Err(CacheError::UnsupportedServer(format!(
            "{}: ascii protocol cannot report not-stored writes",
            server
        )));
    }
    Ok(url)
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(msg) => Err(CacheError::MalformedKey(msg)),
        None => Ok(()),
    }
}

/// Add/Replace report a failed precondition as NotStored whatever the
/// backend status was.
fn store_error(err: memcache::MemcacheError) -> CacheError {
    match CacheError::from(err) {
        CacheError::CacheMiss | CacheError::CasConflict => CacheError::NotStored,
        other => other,
    }
}

fn bool_to_miss(found: bool) -> Result<()> {
    if found {
        Ok(())
    } else {
        Err(CacheError::CacheMiss)
    }
}

// == Payload ==
/// Item value written together with its flags.
struct Payload<'a> {
    value: &'a [u8],
    flags: u32,
}

impl<'a> From<&'a Item> for Payload<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            value: &item.value,
            flags: item.flags,
        }
    }
}

impl<W: Write> ToMemcacheValue<W> for Payload<'_> {
    fn get_flags(&self) -> u32 {
        self.flags
    }

    fn get_length(&self) -> usize {
        self.value.len()
    }

    fn write_to(&self, stream: &mut W) -> io::Result<()> {
        stream.write_all(self.value)
    }
}

type Fetched = (Vec<u8>, u32, Option<u64>);

fn fetched_item(key: String, (value, flags, cas_id): Fetched) -> Item {
    Item {
        key,
        value,
        flags,
        expiration: 0,
        cas_id,
    }
}

impl Client for MemcacheClient {
    fn flush_all(&self) -> Result<()> {
        Ok(self.backend.flush()?)
    }

    fn get(&self, key: &str) -> Result<Item> {
        check_key(key)?;
        let fetched: Option<Fetched> = self.backend.get(key)?;
        fetched
            .map(|f| fetched_item(key.to_string(), f))
            .ok_or(CacheError::CacheMiss)
    }

    fn touch(&self, key: &str, seconds: u32) -> Result<()> {
        check_key(key)?;
        bool_to_miss(self.backend.touch(key, seconds)?)
    }

    fn get_multi(&self, keys: &[&str]) -> Result<HashMap<String, Item>> {
        for key in keys {
            check_key(key)?;
        }
        let fetched: HashMap<String, Fetched> = self.backend.gets(keys)?;
        Ok(fetched
            .into_iter()
            .map(|(key, f)| (key.clone(), fetched_item(key, f)))
            .collect())
    }

    fn set(&self, item: &Item) -> Result<()> {
        check_key(&item.key)?;
        Ok(self
            .backend
            .set(&item.key, Payload::from(item), item.expiration)?)
    }

    fn add(&self, item: &Item) -> Result<()> {
        check_key(&item.key)?;
        self.backend
            .add(&item.key, Payload::from(item), item.expiration)
            .map_err(store_error)
    }

    fn replace(&self, item: &Item) -> Result<()> {
        check_key(&item.key)?;
        self.backend
            .replace(&item.key, Payload::from(item), item.expiration)
            .map_err(store_error)
    }

    fn compare_and_swap(&self, item: &Item) -> Result<()> {
        check_key(&item.key)?;
        let cas_id = item.cas_id.ok_or_else(|| {
            CacheError::MalformedItem(format!("item {} has no cas id", item.key))
        })?;

        let swapped = self
            .backend
            .cas(&item.key, Payload::from(item), item.expiration, cas_id)?;
        if swapped {
            Ok(())
        } else {
            Err(CacheError::CasConflict)
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        bool_to_miss(self.backend.delete(key)?)
    }

    fn delete_all(&self) -> Result<()> {
        Ok(self.backend.flush()?)
    }

    fn ping(&self) -> Result<()> {
        self.backend.version()?;
        Ok(())
    }

    fn increment(&self, key: &str, delta: u64) -> Result<u64> {
        check_key(key)?;
        Ok(self.backend.increment(key, delta)?)
    }

    fn decrement(&self, key: &str, delta: u64) -> Result<u64> {
        check_key(key)?;
        Ok(self.backend.decrement(key, delta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_adds_scheme() {
        assert_eq!(
            server_url("localhost:11211"),
            Ok("memcache://localhost:11211".to_string())
        );
        assert_eq!(
            server_url("memcache://cache:11211?tcp_nodelay=true"),
            Ok("memcache://cache:11211?tcp_nodelay=true".to_string())
        );
    }

    #[test]
    fn test_server_url_rejects_ascii_protocol() {
        assert!(matches!(
            server_url("memcache://cache:11211?protocol=ascii"),
            Err(CacheError::UnsupportedServer(_))
        ));
        assert!(matches!(
            server_url("cache:11211?tcp_nodelay=true&protocol=ASCII"),
            Err(CacheError::UnsupportedServer(_))
        ));
        assert!(server_url("cache:11211?protocol=binary").is_ok());
    }

    #[test]
    fn test_connect_rejects_ascii_before_dialing() {
        let servers = vec!["memcache://127.0.0.1:1?protocol=ascii".to_string()];
        let result = MemcacheClient::connect(&servers, Duration::from_secs(1), 1);
        assert!(matches!(result, Err(CacheError::UnsupportedServer(_))));
    }

    #[test]
    fn test_store_error_maps_missing_key_to_not_stored() {
        let err = memcache::MemcacheError::CommandError(memcache::CommandError::KeyNotFound);
        assert_eq!(store_error(err), CacheError::NotStored);
    }

    #[test]
    fn test_connect_without_servers() {
        let result = MemcacheClient::connect(&[], Duration::from_secs(1), 1);
        assert!(matches!(result, Err(CacheError::NoServers)));
    }

    #[test]
    fn test_store_error_maps_to_not_stored() {
        let err = memcache::MemcacheError::CommandError(memcache::CommandError::KeyExists);
        assert_eq!(store_error(err), CacheError::NotStored);
    }

    #[test]
    fn test_payload_carries_flags() {
        let item = Item::new("k", "hello").with_flags(5);
        let payload = Payload::from(&item);

        let mut out = Vec::new();
        ToMemcacheValue::<Vec<u8>>::write_to(&payload, &mut out).unwrap();

        assert_eq!(ToMemcacheValue::<Vec<u8>>::get_flags(&payload), 5);
        assert_eq!(ToMemcacheValue::<Vec<u8>>::get_length(&payload), 5);
        assert_eq!(out, b"hello".to_vec());
    }

    #[test]
    fn test_bool_to_miss() {
        assert_eq!(bool_to_miss(true), Ok(()));
        assert_eq!(bool_to_miss(false), Err(CacheError::CacheMiss));
    }
}
