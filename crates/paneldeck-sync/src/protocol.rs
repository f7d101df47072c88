//! Full-sync protocol.
//!
//! On connect (or resume) the panel wants every last known value the broker
//! retained, for the active project and opportunistically for every other
//! known project too. The protocol subscribes every project's report
//! wildcard, lets retained deliveries land for a settle window, then narrows
//! the subscription set back to the active project only.

use crate::alarm::{Alarm, AlarmId};
use crate::bus::MessageBus;
use crate::cache::SyncContext;
use crate::project::ProjectRef;
use crate::topic::report_filter;
use std::time::Duration;

/// How long retained deliveries are given to arrive before the
/// subscription set is narrowed.
pub const SETTLE_WINDOW: Duration = Duration::from_secs(2);

/// One in-flight full-sync pass.
///
/// Created by [`FullSync::begin`]; the host calls [`FullSync::settle`] when
/// the scheduled alarm expires. The pass is best-effort throughout: bus
/// failures are logged and skipped, never surfaced to the caller.
#[derive(Debug)]
pub struct FullSync {
    /// Active project id captured when the pass started.
    captured_active: Option<String>,
    /// (project id, report filter) for every project subscribed in step 1.
    filters: Vec<(String, String)>,
    /// Settle alarm, pending until expiry or cancellation.
    alarm: Option<AlarmId>,
    settled: bool,
}

impl FullSync {
    /// Start a pass: subscribe every known project's report filter and
    /// schedule the settle alarm.
    pub fn begin(
        ctx: &SyncContext,
        projects: &[ProjectRef],
        bus: &dyn MessageBus,
        alarm: &mut dyn Alarm,
    ) -> Self {
        let mut filters = Vec::with_capacity(projects.len());
        for project in projects {
            let filter = report_filter(project);
            if let Err(e) = bus.subscribe(&filter) {
                log::warn!("full sync: subscribe {filter} failed: {e}");
            }
            filters.push((project.id.clone(), filter));
        }
        let id = alarm.schedule(SETTLE_WINDOW);
        log::debug!(
            "full sync: {} filters subscribed, settling for {:?}",
            filters.len(),
            SETTLE_WINDOW
        );
        Self {
            captured_active: ctx.active_project().map(str::to_string),
            filters,
            alarm: Some(id),
            settled: false,
        }
    }

    /// The pending settle alarm, if the pass has not yet settled.
    pub fn alarm_id(&self) -> Option<AlarmId> {
        self.alarm
    }

    /// Whether the narrowing pass has already run (or been cancelled).
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Whether the active project changed since the pass started.
    pub fn is_stale(&self, ctx: &SyncContext) -> bool {
        self.captured_active.as_deref() != ctx.active_project()
    }

    /// Narrow the subscription set: unsubscribe every project's filter
    /// except the one that is active *now*. Comparing against the current
    /// active id (not the captured one) means a project switch during the
    /// settle window never unsubscribes the new project's filter.
    pub fn settle(&mut self, ctx: &SyncContext, bus: &dyn MessageBus) {
        if self.settled {
            return;
        }
        self.settled = true;
        self.alarm = None;
        if self.is_stale(ctx) {
            log::debug!(
                "full sync: active project changed during settle ({:?} -> {:?})",
                self.captured_active,
                ctx.active_project()
            );
        }
        for (project_id, filter) in &self.filters {
            if ctx.active_project() == Some(project_id.as_str()) {
                continue;
            }
            if let Err(e) = bus.unsubscribe(filter) {
                log::warn!("full sync: unsubscribe {filter} failed: {e}");
            }
        }
    }

    /// Abandon the pass, cancelling the pending settle alarm. The broad
    /// subscription set is left as-is for a follow-up pass to narrow.
    pub fn cancel(&mut self, alarm: &mut dyn Alarm) {
        if let Some(id) = self.alarm.take() {
            alarm.cancel(id);
        }
        self.settled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::ManualAlarm;
    use crate::bus::{BusError, BusResult, MemoryBus};

    fn projects() -> Vec<ProjectRef> {
        vec![
            ProjectRef::with_id("P1", "Plant One"),
            ProjectRef::with_id("P2", "Plant Two"),
            ProjectRef::with_id("P3", "Plant Three"),
        ]
    }

    #[test]
    fn test_subscribes_all_then_narrows_to_active() {
        let bus = MemoryBus::new();
        let mut alarm = ManualAlarm::new();
        let mut ctx = SyncContext::new();
        ctx.set_active_project("P1");

        let mut sync = FullSync::begin(&ctx, &projects(), &bus, &mut alarm);
        assert_eq!(bus.subscriptions().len(), 3);
        assert!(alarm.is_scheduled(sync.alarm_id().unwrap()));
        assert_eq!(
            alarm.delay_of(sync.alarm_id().unwrap()),
            Some(SETTLE_WINDOW)
        );

        alarm.expire(sync.alarm_id().unwrap());
        sync.settle(&ctx, &bus);
        assert_eq!(bus.subscriptions(), vec!["plant_one/P1/+/+/rep"]);
        assert!(sync.is_settled());
    }

    #[test]
    fn test_project_switch_mid_window_keeps_new_active() {
        let bus = MemoryBus::new();
        let mut alarm = ManualAlarm::new();
        let mut ctx = SyncContext::new();
        ctx.set_active_project("P1");

        let mut sync = FullSync::begin(&ctx, &projects(), &bus, &mut alarm);

        // User switches projects before the settle alarm fires.
        ctx.set_active_project("P2");
        assert!(sync.is_stale(&ctx));

        sync.settle(&ctx, &bus);
        // The new active project's filter survives the stale pass; the old
        // active project's does not.
        assert!(bus.is_subscribed("plant_two/P2/+/+/rep"));
        assert!(!bus.is_subscribed("plant_one/P1/+/+/rep"));
        assert!(!bus.is_subscribed("plant_three/P3/+/+/rep"));
    }

    #[test]
    fn test_settle_is_idempotent() {
        let bus = MemoryBus::new();
        let mut alarm = ManualAlarm::new();
        let mut ctx = SyncContext::new();
        ctx.set_active_project("P1");

        let mut sync = FullSync::begin(&ctx, &projects(), &bus, &mut alarm);
        sync.settle(&ctx, &bus);
        let ops_after_first = bus.ops().len();
        sync.settle(&ctx, &bus);
        assert_eq!(bus.ops().len(), ops_after_first);
    }

    #[test]
    fn test_cancel_releases_alarm() {
        let bus = MemoryBus::new();
        let mut alarm = ManualAlarm::new();
        let ctx = SyncContext::new();

        let mut sync = FullSync::begin(&ctx, &projects(), &bus, &mut alarm);
        let id = sync.alarm_id().unwrap();
        sync.cancel(&mut alarm);
        assert!(!alarm.is_scheduled(id));
        assert!(sync.is_settled());
        assert!(sync.alarm_id().is_none());

        // A settle call after cancellation must not narrow anything.
        sync.settle(&ctx, &bus);
        assert_eq!(bus.subscriptions().len(), 3);
    }

    /// Bus whose subscribe calls fail for filters containing a marker.
    struct FlakyBus {
        inner: MemoryBus,
        fail_marker: &'static str,
    }

    impl MessageBus for FlakyBus {
        fn subscribe(&self, filter: &str) -> BusResult {
            if filter.contains(self.fail_marker) {
                return Err(BusError::Subscribe("broker refused".to_string()));
            }
            self.inner.subscribe(filter)
        }

        fn unsubscribe(&self, filter: &str) -> BusResult {
            self.inner.unsubscribe(filter)
        }

        fn publish(&self, topic: &str, payload: &str) -> BusResult {
            self.inner.publish(topic, payload)
        }
    }

    #[test]
    fn test_subscribe_failure_does_not_abort_pass() {
        let bus = FlakyBus {
            inner: MemoryBus::new(),
            fail_marker: "/P2/",
        };
        let mut alarm = ManualAlarm::new();
        let mut ctx = SyncContext::new();
        ctx.set_active_project("P1");

        let mut sync = FullSync::begin(&ctx, &projects(), &bus, &mut alarm);
        // P2's subscribe failed; the other two went through.
        assert!(bus.inner.is_subscribed("plant_one/P1/+/+/rep"));
        assert!(bus.inner.is_subscribed("plant_three/P3/+/+/rep"));
        assert!(!bus.inner.is_subscribed("plant_two/P2/+/+/rep"));

        sync.settle(&ctx, &bus);
        assert_eq!(bus.inner.subscriptions(), vec!["plant_one/P1/+/+/rep"]);
    }
}
