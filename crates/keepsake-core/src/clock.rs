//! Time source port.
//!
//! Release conditions are evaluated against an injected clock, never a
//! caller-supplied timestamp, so trigger decisions stay server-trusted
//! and deterministic under test.

use chrono::{DateTime, Utc};

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current instant as epoch milliseconds, the form outer
    /// transports carry timestamps in.
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The production clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
