//! Message-bus client abstraction.
//!
//! The transport (broker connection, retry, reconnect) is external; this
//! trait is the surface the sync layer drives. Inbound messages travel the
//! other way: the host feeds them to the refresh path as they arrive.

use std::sync::Mutex;
use thiserror::Error;

/// Bus operation errors.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("not connected")]
    NotConnected,
    #[error("subscribe failed: {0}")]
    Subscribe(String),
    #[error("unsubscribe failed: {0}")]
    Unsubscribe(String),
    #[error("publish failed: {0}")]
    Publish(String),
}

/// Result type for bus operations.
pub type BusResult = Result<(), BusError>;

/// Client for a publish/subscribe message bus.
///
/// Calls take `&self`; implementations own whatever interior queueing or
/// locking their transport needs.
pub trait MessageBus {
    /// Subscribe to a topic filter (may contain `+` wildcards).
    fn subscribe(&self, filter: &str) -> BusResult;

    /// Remove a previously subscribed filter.
    fn unsubscribe(&self, filter: &str) -> BusResult;

    /// Publish a payload to a topic.
    fn publish(&self, topic: &str, payload: &str) -> BusResult;
}

/// One recorded bus operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Subscribe(String),
    Unsubscribe(String),
    Publish { topic: String, payload: String },
}

/// In-memory bus that records every operation and tracks the live
/// subscription set. Backs protocol and console tests; also usable as a
/// stand-in transport for offline hosts.
#[derive(Debug, Default)]
pub struct MemoryBus {
    state: Mutex<MemoryBusState>,
}

#[derive(Debug, Default)]
struct MemoryBusState {
    ops: Vec<BusOp>,
    subscriptions: Vec<String>,
}

impl MemoryBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation seen so far, in order.
    pub fn ops(&self) -> Vec<BusOp> {
        self.state.lock().unwrap().ops.clone()
    }

    /// Filters currently subscribed.
    pub fn subscriptions(&self) -> Vec<String> {
        self.state.lock().unwrap().subscriptions.clone()
    }

    /// Whether a filter is currently subscribed.
    pub fn is_subscribed(&self, filter: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .subscriptions
            .iter()
            .any(|f| f == filter)
    }

    /// Published messages seen so far.
    pub fn published(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Publish { topic, payload } => Some((topic.clone(), payload.clone())),
                _ => None,
            })
            .collect()
    }
}

impl MessageBus for MemoryBus {
    fn subscribe(&self, filter: &str) -> BusResult {
        let mut state = self.state.lock().unwrap();
        state.ops.push(BusOp::Subscribe(filter.to_string()));
        if !state.subscriptions.iter().any(|f| f == filter) {
            state.subscriptions.push(filter.to_string());
        }
        Ok(())
    }

    fn unsubscribe(&self, filter: &str) -> BusResult {
        let mut state = self.state.lock().unwrap();
        state.ops.push(BusOp::Unsubscribe(filter.to_string()));
        state.subscriptions.retain(|f| f != filter);
        Ok(())
    }

    fn publish(&self, topic: &str, payload: &str) -> BusResult {
        let mut state = self.state.lock().unwrap();
        state.ops.push(BusOp::Publish {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}
