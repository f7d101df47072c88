//! Message console: a bounded activity log plus manual publish/subscribe.
//!
//! The run-mode sidebar shows a scrolling log of bus activity and lets the
//! user subscribe to arbitrary filters or fire one-off payloads by hand.

use crate::bus::{BusResult, MessageBus};
use std::collections::VecDeque;

/// Default number of console lines kept before the oldest are dropped.
pub const MAX_CONSOLE_LINES: usize = 100;

/// One console line. The sequence number is monotonic over the session, so
/// the UI can tell where its last render left off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEntry {
    pub seq: u64,
    pub line: String,
}

/// Bounded ring of console lines, oldest dropped first.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    entries: VecDeque<ConsoleEntry>,
    next_seq: u64,
    cap: usize,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(MAX_CONSOLE_LINES)
    }
}

impl ConsoleLog {
    /// Create a console ring with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console ring holding at most `cap` lines.
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            entries: VecDeque::with_capacity(cap),
            next_seq: 0,
            cap,
        }
    }

    /// Append a line, dropping the oldest when full.
    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() == self.cap {
            self.entries.pop_front();
        }
        self.next_seq += 1;
        self.entries.push_back(ConsoleEntry {
            seq: self.next_seq,
            line: line.into(),
        });
    }

    /// Lines currently held, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    /// Number of lines currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the console is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all lines.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Subscribe to a user-entered filter, logging the outcome.
pub fn console_subscribe(bus: &dyn MessageBus, filter: &str, log: &mut ConsoleLog) -> BusResult {
    match bus.subscribe(filter) {
        Ok(()) => {
            log.push(format!("Subscribed: {filter}"));
            Ok(())
        }
        Err(e) => {
            log.push(format!("Subscribe failed: {filter} ({e})"));
            Err(e)
        }
    }
}

/// Publish a user-entered payload, logging the outcome.
pub fn console_publish(
    bus: &dyn MessageBus,
    topic: &str,
    payload: &str,
    log: &mut ConsoleLog,
) -> BusResult {
    match bus.publish(topic, payload) {
        Ok(()) => {
            log.push(format!("Pub: {topic} -> {payload}"));
            Ok(())
        }
        Err(e) => {
            log.push(format!("Publish failed: {topic} ({e})"));
            Err(e)
        }
    }
}
