//! Mock Record Module
//!
//! Types describing one recorded call: the operation, its arguments and the
//! outcome replayed by the mock client.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::CacheError;
use crate::item::Item;

// == Operation ==
/// One cache verb of the client surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FlushAll,
    Get,
    GetMulti,
    Set,
    Add,
    Replace,
    CompareAndSwap,
    Delete,
    Increment,
    Decrement,
    Exists,
    Touch,
    DeleteAll,
    Ping,
}

impl Operation {
    /// Returns the tag text used as the start of a call signature.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FlushAll => "FlushAll",
            Operation::Get => "Get",
            Operation::GetMulti => "GetMulti",
            Operation::Set => "Set",
            Operation::Add => "Add",
            Operation::Replace => "Replace",
            Operation::CompareAndSwap => "CompareAndSwap",
            Operation::Delete => "Delete",
            Operation::Increment => "Increment",
            Operation::Decrement => "Decrement",
            Operation::Exists => "Exists",
            Operation::Touch => "Touch",
            Operation::DeleteAll => "DeleteAll",
            Operation::Ping => "Ping",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Arg ==
/// One positional argument of a recorded call.
///
/// Variants are tagged on serialization, so `Key("5")` and `Delta(5)` never
/// produce the same signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Arg {
    Key(String),
    Keys(Vec<String>),
    Item(Item),
    Delta(u64),
    Seconds(u32),
}

impl From<&str> for Arg {
    fn from(key: &str) -> Self {
        Arg::Key(key.to_string())
    }
}

impl From<String> for Arg {
    fn from(key: String) -> Self {
        Arg::Key(key)
    }
}

impl From<Item> for Arg {
    fn from(item: Item) -> Self {
        Arg::Item(item)
    }
}

impl From<&Item> for Arg {
    fn from(item: &Item) -> Self {
        Arg::Item(item.clone())
    }
}

impl From<Vec<String>> for Arg {
    fn from(keys: Vec<String>) -> Self {
        Arg::Keys(keys)
    }
}

impl From<&[&str]> for Arg {
    fn from(keys: &[&str]) -> Self {
        Arg::Keys(keys.iter().map(|k| k.to_string()).collect())
    }
}

// == Mock Return ==
/// Value replayed by a successful mocked call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockReturn {
    /// Operations that only report success or failure
    #[default]
    None,
    /// Exists
    Bool(bool),
    /// Increment and Decrement
    Counter(u64),
    /// Get
    Item(Item),
    /// GetMulti
    Items(HashMap<String, Item>),
}

impl MockReturn {
    /// Short variant name used in mismatch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            MockReturn::None => "None",
            MockReturn::Bool(_) => "Bool",
            MockReturn::Counter(_) => "Counter",
            MockReturn::Item(_) => "Item",
            MockReturn::Items(_) => "Items",
        }
    }
}

// == Mock Record ==
/// Binds an operation and its arguments to a recorded outcome.
///
/// A recorded error takes precedence over the return value.
#[derive(Debug, Clone, PartialEq)]
pub struct MockRecord {
    pub operation: Operation,
    pub args: Vec<Arg>,
    pub returns: MockReturn,
    pub error: Option<CacheError>,
}

impl MockRecord {
    // == Constructor ==
    /// Creates a record that succeeds with no value.
    pub fn new(operation: Operation, args: Vec<Arg>) -> Self {
        Self {
            operation,
            args,
            returns: MockReturn::None,
            error: None,
        }
    }

    /// Sets the value replayed on success.
    pub fn returning(mut self, returns: MockReturn) -> Self {
        self.returns = returns;
        self
    }

    /// Makes the call fail with `error`.
    pub fn failing(mut self, error: CacheError) -> Self {
        self.error = Some(error);
        self
    }

    /// Replays the outcome: the recorded error, or the recorded value.
    pub fn outcome(&self) -> Result<MockReturn, CacheError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.returns.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_tag_text() {
        assert_eq!(Operation::CompareAndSwap.as_str(), "CompareAndSwap");
        assert_eq!(Operation::GetMulti.to_string(), "GetMulti");
    }

    #[test]
    fn test_arg_conversions() {
        assert_eq!(Arg::from("k"), Arg::Key("k".to_string()));
        assert_eq!(
            Arg::from(&["a", "b"][..]),
            Arg::Keys(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Arg::from(Item::new("k", "v")), Arg::Item(Item::new("k", "v")));
    }

    #[test]
    fn test_record_outcome_success() {
        let record = MockRecord::new(Operation::Increment, vec!["n".into(), Arg::Delta(1)])
            .returning(MockReturn::Counter(2));

        assert_eq!(record.outcome(), Ok(MockReturn::Counter(2)));
    }

    #[test]
    fn test_record_error_takes_precedence() {
        let record = MockRecord::new(Operation::Get, vec!["k".into()])
            .returning(MockReturn::Item(Item::new("k", "v")))
            .failing(CacheError::CacheMiss);

        assert_eq!(record.outcome(), Err(CacheError::CacheMiss));
    }
}
