//! Mock Module
//!
//! Deterministic record/replay stand-in for a memcached server.
//!
//! Test code registers (operation, arguments) -> outcome records on a
//! [`MockServer`], starts it, and every client built afterwards replays those
//! records instead of talking to the network.

mod client;
mod key;
mod record;
mod server;


// Re-export public types
pub use client::MockClient;
pub use key::mock_key;
pub use record::{Arg, MockRecord, MockReturn, Operation};
pub use server::MockServer;
