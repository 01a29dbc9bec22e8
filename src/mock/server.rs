//! Mock Server Module
//!
//! Process-wide registry of recorded outcomes plus the switch that makes
//! the client builder hand out the mock client.
//!
//! # Lifecycle
//! The global server is created empty on first use, cleared explicitly
//! between test cases with [`MockServer::delete_mocks`], and never persisted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, info};

use crate::mock::{mock_key, Arg, MockClient, MockRecord, Operation};

static GLOBAL: OnceLock<MockServer> = OnceLock::new();

// == Mock State ==
/// State guarded by the server lock.
#[derive(Debug, Default)]
struct MockState {
    /// Whether the builder should return the mock client
    enabled: bool,
    /// Canonical key -> recorded outcome
    mocks: HashMap<String, MockRecord>,
}

// == Mock Server ==
/// Controller for the mock registry.
///
/// Cloning yields another handle to the same registry. A single mutex guards
/// both the registry and the enabled flag, for writers and readers alike.
#[derive(Debug, Clone, Default)]
pub struct MockServer {
    state: Arc<Mutex<MockState>>,
}

impl MockServer {
    // == Constructor ==
    /// Creates an independent, disabled, empty server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide server consulted by the client builder.
    pub fn global() -> &'static MockServer {
        GLOBAL.get_or_init(MockServer::new)
    }

    // == Start / Stop ==
    /// Routes every client built from now on to the mock client.
    pub fn start(&self) {
        self.lock().enabled = true;
        info!("Mock server started");
    }

    /// Stops routing built clients to the mock client.
    pub fn stop(&self) {
        self.lock().enabled = false;
        info!("Mock server stopped");
    }

    /// Checks whether mock mode is enabled.
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    // == Add Mock ==
    /// Registers a record, replacing any record with the same call signature.
    ///
    /// `None` is ignored.
    pub fn add_mock(&self, mock: impl Into<Option<MockRecord>>) {
        let Some(mock) = mock.into() else {
            return;
        };
        let key = mock_key(mock.operation, &mock.args);

        let mut state = self.lock();
        debug!(operation = %mock.operation, key = %key, "Registering mock");
        state.mocks.insert(key, mock);
    }

    // == Delete Mocks ==
    /// Drops every registered record.
    pub fn delete_mocks(&self) {
        let mut state = self.lock();
        let removed = state.mocks.len();
        state.mocks = HashMap::new();
        info!("Deleted {} mocks", removed);
    }

    /// Returns a mock client that replays from this server's registry.
    pub fn mocked_client(&self) -> MockClient {
        MockClient::new(self.clone())
    }

    /// Returns the number of registered records.
    pub fn len(&self) -> usize {
        self.lock().mocks.len()
    }

    /// Returns true if no record is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().mocks.is_empty()
    }

    // == Lookup ==
    /// Finds the record registered for a call signature.
    pub(crate) fn lookup(&self, op: Operation, args: &[Arg]) -> Option<MockRecord> {
        let key = mock_key(op, args);
        self.lock().mocks.get(&key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Every critical section is a single flag or map write, so the state
        // is consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;
    use crate::item::Item;
    use crate::mock::MockReturn;

    #[test]
    fn test_new_server_is_disabled_and_empty() {
        let server = MockServer::new();
        assert!(!server.is_enabled());
        assert!(server.is_empty());
    }

    #[test]
    fn test_start_stop_idempotent() {
        let server = MockServer::new();

        server.start();
        server.start();
        assert!(server.is_enabled());

        server.stop();
        server.stop();
        assert!(!server.is_enabled());
    }

    #[test]
    fn test_add_mock_none_is_noop() {
        let server = MockServer::new();
        server.add_mock(None);
        assert!(server.is_empty());
    }

    #[test]
    fn test_add_mock_overwrites_same_signature() {
        let server = MockServer::new();

        server.add_mock(
            MockRecord::new(Operation::Get, vec!["k".into()])
                .returning(MockReturn::Item(Item::new("k", "first"))),
        );
        server.add_mock(
            MockRecord::new(Operation::Get, vec!["k".into()])
                .returning(MockReturn::Item(Item::new("k", "second"))),
        );

        assert_eq!(server.len(), 1);
        let record = server.lookup(Operation::Get, &["k".into()]).unwrap();
        assert_eq!(record.returns, MockReturn::Item(Item::new("k", "second")));
    }

    #[test]
    fn test_delete_mocks_resets_registry() {
        let server = MockServer::new();
        server.add_mock(MockRecord::new(Operation::Ping, vec![]));
        server.add_mock(MockRecord::new(Operation::Delete, vec!["k".into()]).failing(CacheError::CacheMiss));
        assert_eq!(server.len(), 2);

        server.delete_mocks();

        assert!(server.is_empty());
        assert!(server.lookup(Operation::Ping, &[]).is_none());
    }

    #[test]
    fn test_clones_share_registry() {
        let server = MockServer::new();
        let other = server.clone();

        other.add_mock(MockRecord::new(Operation::FlushAll, vec![]));
        other.start();

        assert!(server.is_enabled());
        assert!(server.lookup(Operation::FlushAll, &[]).is_some());
    }

    #[test]
    fn test_independent_servers_are_isolated() {
        let a = MockServer::new();
        let b = MockServer::new();

        a.add_mock(MockRecord::new(Operation::Ping, vec![]));
        a.start();

        assert!(b.is_empty());
        assert!(!b.is_enabled());
    }

    #[test]
    fn test_concurrent_registration() {
        let server = MockServer::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let server = server.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        let key = format!("key-{}-{}", i, j);
                        server.add_mock(MockRecord::new(Operation::Delete, vec![key.into()]));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(server.len(), 8 * 50);
    }

    #[test]
    fn test_global_is_singleton() {
        assert!(std::ptr::eq(MockServer::global(), MockServer::global()));
    }
}
