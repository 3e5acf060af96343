//! In-process transport.
//!
//! [`MemoryTransport`] keeps lists in a `HashMap` and answers probes from a
//! scripted sequence. It records every call, so tests can assert exactly
//! which requests an operation issued.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, TransportError};
use crate::options::DEFAULT_READ_TIMEOUT;
use crate::traits::Transport;

/// Transport operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PushIfExists,
    BlockingPop,
    Push,
    Unflushed,
}

/// A request recorded by [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PushIfExists { key: String, value: String },
    BlockingPop { key: String, timeout: Duration },
    Push { key: String, value: String },
    Unflushed { bound: Duration },
}

/// In-memory [`Transport`].
///
/// - Lists only accept `push_if_exists` after [`MemoryTransport::create_list`].
/// - `blocking_pop` returns queued replies from [`MemoryTransport::enqueue_reply`]
///   and `None` once they run out, as if the timeout expired.
/// - `unflushed` returns scripted counts, then zero.
#[derive(Debug)]
pub struct MemoryTransport {
    read_timeout: Duration,
    lists: HashMap<String, Vec<String>>,
    replies: HashMap<String, VecDeque<Vec<String>>>,
    unflushed: VecDeque<u64>,
    failing: HashSet<Operation>,
    calls: Vec<Call>,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(DEFAULT_READ_TIMEOUT)
    }
}

impl MemoryTransport {
    pub fn new(read_timeout: Duration) -> Self {
        Self {
            read_timeout,
            lists: HashMap::new(),
            replies: HashMap::new(),
            unflushed: VecDeque::new(),
            failing: HashSet::new(),
            calls: Vec::new(),
        }
    }

    /// Create an empty list, as the proxy does for known topics.
    pub fn create_list(&mut self, key: &str) {
        self.lists.entry(key.to_string()).or_default();
    }

    /// Queue a raw reply for the next `blocking_pop` on `key`.
    pub fn enqueue_reply<I, S>(&mut self, key: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies
            .entry(key.to_string())
            .or_default()
            .push_back(fields.into_iter().map(Into::into).collect());
    }

    /// Script the counts returned by successive `unflushed` probes.
    pub fn script_unflushed(&mut self, counts: impl IntoIterator<Item = u64>) {
        self.unflushed.extend(counts);
    }

    /// Make every subsequent call of `operation` fail.
    pub fn fail(&mut self, operation: Operation) {
        self.failing.insert(operation);
    }

    /// Contents of the list at `key`, if it exists.
    pub fn list(&self, key: &str) -> Option<&[String]> {
        self.lists.get(key).map(Vec::as_slice)
    }

    /// Every request issued so far, in order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Bounds passed to `unflushed`, in order.
    pub fn probe_bounds(&self) -> Vec<Duration> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Unflushed { bound } => Some(*bound),
                _ => None,
            })
            .collect()
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if self.failing.contains(&operation) {
            return Err(TransportError::Connection(format!(
                "{operation:?} failed: connection reset"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn push_if_exists(&mut self, key: &str, value: &str) -> Result<()> {
        self.calls.push(Call::PushIfExists {
            key: key.to_string(),
            value: value.to_string(),
        });
        self.check(Operation::PushIfExists)?;

        if let Some(list) = self.lists.get_mut(key) {
            list.push(value.to_string());
        }
        Ok(())
    }

    async fn blocking_pop(
        &mut self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<Vec<String>>> {
        self.calls.push(Call::BlockingPop {
            key: key.to_string(),
            timeout,
        });
        self.check(Operation::BlockingPop)?;

        Ok(self.replies.get_mut(key).and_then(VecDeque::pop_front))
    }

    async fn push(&mut self, key: &str, value: &str) -> Result<()> {
        self.calls.push(Call::Push {
            key: key.to_string(),
            value: value.to_string(),
        });
        self.check(Operation::Push)?;

        self.lists
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        Ok(())
    }

    async fn unflushed(&mut self, bound: Duration) -> Result<u64> {
        self.calls.push(Call::Unflushed { bound });
        self.check(Operation::Unflushed)?;

        Ok(self.unflushed.pop_front().unwrap_or(0))
    }

    fn read_timeout(&self) -> Duration {
        self.read_timeout
    }
}
