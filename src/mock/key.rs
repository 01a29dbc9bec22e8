//! Call-Key Canonicalizer
//!
//! Turns an operation and its arguments into the fixed-length key used by
//! the mock registry.
//!
//! key = SHA-256 hex digest of (operation tag ++ cleaned JSON of each arg)

use sha2::{Digest, Sha256};

use crate::mock::{Arg, Operation};

/// Computes the registry key for a call signature.
///
/// Items are compared by key and value only; their flags, expiration and
/// CAS token are zeroed before serialization. Passing no arguments and
/// passing an empty slice yield the same key.
pub fn mock_key(op: Operation, args: &[Arg]) -> String {
    let mut signature = String::from(op.as_str());

    for arg in args {
        let normalized = match arg {
            Arg::Item(item) => Arg::Item(item.normalized()),
            other => other.clone(),
        };
        let encoded = serde_json::to_vec(&normalized)
            .expect("mock arguments always serialize to JSON");
        signature.push_str(&clean_value(&encoded));
    }

    let mut hasher = Sha256::new();
    hasher.update(signature.as_bytes());
    hex::encode(hasher.finalize())
}

// == Clean Value ==
/// Strips formatting-only bytes: surrounding whitespace plus embedded
/// newlines, carriage returns and tabs.
fn clean_value(encoded: &[u8]) -> String {
    let text = String::from_utf8_lossy(encoded);
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t'))
        .collect()
}
