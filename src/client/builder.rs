//! Client Builder Module
//!
//! Decides at construction time whether callers get the mock client or a
//! real memcached client.

use std::time::Duration;

use tracing::debug;

use crate::client::{Client, MemcacheClient};
use crate::config::{Config, DEFAULT_MAX_IDLE_CONNS, DEFAULT_TIMEOUT};
use crate::error::Result;
use crate::mock::MockServer;

// == Client Builder ==
/// Builds a [`Client`].
///
/// While the mock server (the global one unless another is injected) is
/// enabled, `build` returns its mock client and never touches the network.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    timeout: Duration,
    max_idle_conns: u32,
    servers: Vec<String>,
    mock: Option<MockServer>,
}

impl ClientBuilder {
    // == Constructor ==
    /// Creates a builder with no servers and default tunables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .timeout(config.timeout)
            .max_idle_conns(config.max_idle_conns)
            .servers(config.servers.iter().cloned())
    }

    /// Sets the socket read/write timeout. Zero means [`DEFAULT_TIMEOUT`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connections kept per server. Zero means
    /// [`DEFAULT_MAX_IDLE_CONNS`].
    ///
    /// Should be higher than the expected peak of parallel requests.
    pub fn max_idle_conns(mut self, max_idle_conns: u32) -> Self {
        self.max_idle_conns = max_idle_conns;
        self
    }

    /// Uses the given servers with equal weight. A server listed several
    /// times gets a proportional share of keys.
    pub fn servers<I, S>(mut self, servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.servers = servers.into_iter().map(Into::into).collect();
        self
    }

    /// Consults `server` instead of the global mock server.
    pub fn mock_server(mut self, server: MockServer) -> Self {
        self.mock = Some(server);
        self
    }

    // == Build ==
    /// Builds the client.
    pub fn build(&self) -> Result<Box<dyn Client>> {
        let mock = self
            .mock
            .clone()
            .unwrap_or_else(|| MockServer::global().clone());
        if mock.is_enabled() {
            debug!("Mock server enabled, building mock client");
            return Ok(Box::new(mock.mocked_client()));
        }

        let client = MemcacheClient::connect(
            &self.servers,
            self.effective_timeout(),
            self.effective_max_idle_conns(),
        )?;
        Ok(Box::new(client))
    }

    fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }

    fn effective_max_idle_conns(&self) -> u32 {
        if self.max_idle_conns == 0 {
            DEFAULT_MAX_IDLE_CONNS
        } else {
            self.max_idle_conns
        }
    }
}
