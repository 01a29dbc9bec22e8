//! Mini Memcache - A thin memcached client facade
//!
//! Re-exposes the standard cache operations through the [`Client`] trait and
//! provides a deterministic record/replay mock server for tests.

pub mod client;
pub mod config;
pub mod error;
pub mod item;
pub mod mock;

pub use client::{Client, ClientBuilder, MemcacheClient};
pub use config::Config;
pub use error::{CacheError, Result};
pub use item::Item;
pub use mock::{Arg, MockClient, MockRecord, MockReturn, MockServer, Operation};
