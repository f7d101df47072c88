//! Last-value state cache keyed by topic.
//!
//! The cache remembers the most recent payload seen on each topic so that a
//! panel opened after the fact can render the last known values. It belongs
//! to a [`SyncContext`] owned by the application session and passed to call
//! sites explicitly; there is no process-global state.

use crate::topic::companion_report_topic;
use std::collections::HashMap;

/// Last-seen payload per topic. No eviction beyond a full clear, no TTL.
#[derive(Debug, Clone, Default)]
pub struct StateCache {
    entries: HashMap<String, String>,
}

impl StateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest payload for a topic, overwriting any previous one.
    pub fn put(&mut self, topic: impl Into<String>, payload: impl Into<String>) {
        self.entries.insert(topic.into(), payload.into());
    }

    /// Exact-topic lookup.
    pub fn get(&self, topic: &str) -> Option<&str> {
        self.entries.get(topic).map(String::as_str)
    }

    /// Lookup for display purposes: exact topic first, then the companion
    /// report topic when the stored topic is a command topic. Components
    /// always display report-side state even when bound to `cmd`.
    pub fn get_report(&self, topic: &str) -> Option<&str> {
        if let Some(payload) = self.get(topic) {
            return Some(payload);
        }
        let rep = companion_report_topic(topic)?;
        self.get(&rep)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached topics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session-owned synchronization state: the last-value cache plus the tag of
/// the project currently being viewed. Constructed once per application
/// session and threaded through protocol and refresh call sites.
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
    cache: StateCache,
    active_project: Option<String>,
}

impl SyncContext {
    /// Create a context with no active project and an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache of last-seen payloads.
    pub fn cache(&self) -> &StateCache {
        &self.cache
    }

    /// Mutable access to the cache.
    pub fn cache_mut(&mut self) -> &mut StateCache {
        &mut self.cache
    }

    /// Id of the project currently being viewed, if any.
    pub fn active_project(&self) -> Option<&str> {
        self.active_project.as_deref()
    }

    /// Switch the active project. The cache is cleared so values retained
    /// under another project's topic prefix can never leak into this one.
    pub fn set_active_project(&mut self, id: impl Into<String>) {
        self.cache.clear();
        self.active_project = Some(id.into());
    }

    /// Leave project view entirely, dropping cached state.
    pub fn clear_active_project(&mut self) {
        self.cache.clear();
        self.active_project = None;
    }
}
