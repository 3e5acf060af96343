//! Flush timeout budget.
//!
//! A single unflushed probe can never wait longer than the transport read
//! timeout, so a flush deadline is cut into `loops` probes of one read
//! timeout each plus a final probe for the remainder:
//!
//! ```text
//! timeout = loops * read_timeout + remainder
//! ```
//!
//! All arithmetic is done in whole milliseconds, the unit the proxy's probe
//! accepts.

use std::time::Duration;

/// How [`crate::Producer::flush`] spends its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushBudget {
    /// Zero timeout: probe one read timeout at a time until nothing is unflushed.
    Unbounded { slice: Duration },
    /// `loops` probes bounded by `slice`, then one bounded by `remainder`
    /// when it is nonzero.
    Bounded {
        slice: Duration,
        loops: u64,
        remainder: Duration,
    },
}

impl FlushBudget {
    /// Split `timeout` into probes no longer than `read_timeout`.
    ///
    /// A nonzero timeout below one millisecond is rounded up to one.
    pub fn new(timeout: Duration, read_timeout: Duration) -> Self {
        let read_ms = read_timeout.as_millis().max(1);
        let slice = duration_from_millis(read_ms);

        if timeout.is_zero() {
            return FlushBudget::Unbounded { slice };
        }

        let timeout_ms = timeout.as_millis().max(1);
        FlushBudget::Bounded {
            slice,
            loops: u64::try_from(timeout_ms / read_ms).unwrap_or(u64::MAX),
            remainder: duration_from_millis(timeout_ms % read_ms),
        }
    }

    /// Upper bound on the number of probes, `None` when unbounded.
    pub fn max_probes(&self) -> Option<u64> {
        match self {
            FlushBudget::Unbounded { .. } => None,
            FlushBudget::Bounded {
                loops, remainder, ..
            } => Some(loops + u64::from(!remainder.is_zero())),
        }
    }
}

fn duration_from_millis(ms: u128) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
}
