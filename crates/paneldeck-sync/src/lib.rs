//! Paneldeck Sync Library
//!
//! Topic naming, the last-value state cache, and the full-sync protocol
//! that harvests retained values across every known project sharing one
//! message-bus connection.

pub mod alarm;
pub mod bus;
pub mod cache;
pub mod console;
pub mod project;
pub mod protocol;
pub mod topic;

pub use alarm::{Alarm, AlarmId, ManualAlarm};
pub use bus::{BusError, BusOp, BusResult, MemoryBus, MessageBus};
pub use cache::{StateCache, SyncContext};
pub use console::{ConsoleEntry, ConsoleLog, MAX_CONSOLE_LINES, console_publish, console_subscribe};
pub use project::{InMemoryProjects, ProjectDirectory, ProjectRef};
pub use protocol::{FullSync, SETTLE_WINDOW};
pub use topic::{
    ALL_KINDS, Direction, TopicAddress, WidgetKind, base_topic, companion_report_topic,
    format_topic, parse_topic, report_filter, slugify,
};
