//! Mock Client Module
//!
//! Implements every cache operation by replaying the record registered for
//! the call signature.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::client::Client;
use crate::error::{CacheError, Result};
use crate::item::Item;
use crate::mock::{Arg, MockReturn, MockServer, Operation};

// == Mock Client ==
/// Client that answers from a [`MockServer`] registry.
///
/// Unregistered calls fail with [`CacheError::MockNotFound`]. A record whose
/// return value has the wrong shape for the operation is a setup defect and
/// panics.
#[derive(Debug, Clone)]
pub struct MockClient {
    server: MockServer,
}

impl MockClient {
    pub(crate) fn new(server: MockServer) -> Self {
        Self { server }
    }

    // == Replay ==
    fn replay(&self, op: Operation, args: Vec<Arg>) -> Result<MockReturn> {
        match self.server.lookup(op, &args) {
            Some(record) => {
                debug!(operation = %op, "Replaying mock");
                record.outcome()
            }
            None => {
                warn!(operation = %op, ?args, "No mock registered for call");
                Err(CacheError::MockNotFound)
            }
        }
    }

    /// Replays an operation that carries no value.
    fn replay_unit(&self, op: Operation, args: Vec<Arg>) -> Result<()> {
        self.replay(op, args).map(|_| ())
    }

    fn replay_counter(&self, op: Operation, args: Vec<Arg>) -> Result<u64> {
        match self.replay(op, args)? {
            MockReturn::Counter(value) => Ok(value),
            other => mismatch(op, "Counter", &other),
        }
    }
}

/// Reports a record whose return value does not fit the operation.
fn mismatch(op: Operation, expected: &str, found: &MockReturn) -> ! {
    panic!(
        "mock for {} must return {}, found {}",
        op,
        expected,
        found.kind()
    )
}

impl Client for MockClient {
    fn flush_all(&self) -> Result<()> {
        self.replay_unit(Operation::FlushAll, vec![])
    }

    fn get(&self, key: &str) -> Result<Item> {
        match self.replay(Operation::Get, vec![key.into()])? {
            MockReturn::Item(item) => Ok(item),
            other => mismatch(Operation::Get, "Item", &other),
        }
    }

    fn touch(&self, key: &str, seconds: u32) -> Result<()> {
        self.replay_unit(Operation::Touch, vec![key.into(), Arg::Seconds(seconds)])
    }

    fn get_multi(&self, keys: &[&str]) -> Result<HashMap<String, Item>> {
        match self.replay(Operation::GetMulti, vec![keys.into()])? {
            MockReturn::Items(items) => Ok(items),
            other => mismatch(Operation::GetMulti, "Items", &other),
        }
    }

    fn set(&self, item: &Item) -> Result<()> {
        self.replay_unit(Operation::Set, vec![item.into()])
    }

    fn add(&self, item: &Item) -> Result<()> {
        self.replay_unit(Operation::Add, vec![item.into()])
    }

    fn replace(&self, item: &Item) -> Result<()> {
        self.replay_unit(Operation::Replace, vec![item.into()])
    }

    fn compare_and_swap(&self, item: &Item) -> Result<()> {
        self.replay_unit(Operation::CompareAndSwap, vec![item.into()])
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.replay_unit(Operation::Delete, vec![key.into()])
    }

    fn delete_all(&self) -> Result<()> {
        self.replay_unit(Operation::DeleteAll, vec![])
    }

    fn ping(&self) -> Result<()> {
        self.replay_unit(Operation::Ping, vec![])
    }

    fn increment(&self, key: &str, delta: u64) -> Result<u64> {
        self.replay_counter(Operation::Increment, vec![key.into(), Arg::Delta(delta)])
    }

    fn decrement(&self, key: &str, delta: u64) -> Result<u64> {
        self.replay_counter(Operation::Decrement, vec![key.into(), Arg::Delta(delta)])
    }

    // == Exists ==
    /// An explicit Exists record wins; otherwise the answer is derived from
    /// the Get record for the same key, with a missing record or a recorded
    /// cache miss meaning `false`.
    fn exists(&self, key: &str) -> Result<bool> {
        if let Some(record) = self.server.lookup(Operation::Exists, &[key.into()]) {
            return match record.outcome()? {
                MockReturn::Bool(found) => Ok(found),
                other => mismatch(Operation::Exists, "Bool", &other),
            };
        }

        match self.server.lookup(Operation::Get, &[key.into()]) {
            None => Ok(false),
            Some(record) => match record.outcome() {
                Ok(_) => Ok(true),
                Err(err) if err.is_miss() => Ok(false),
                Err(err) => Err(err),
            },
        }
    }
}
