// Scheduler seam - delayed callbacks standing in for network latency
use crate::domain::notification::NotificationId;
use crate::domain::operation::SimulatedOperation;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

/// What the coordinator should do once a delay expires.
#[derive(Debug, Clone, PartialEq)]
pub enum Timer {
    ExpireNotification(NotificationId),
    FiltersApplied,
    Completed(SimulatedOperation),
    AutoRefresh,
}

pub trait Scheduler: Send {
    /// Arrange for `timer` to be handed back to the coordinator after `delay`.
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId;

    /// Returns false if the timer already fired or was never scheduled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Claim a fired timer. Returns false when it was cancelled after the
    /// delay elapsed but before the coordinator got to it.
    fn take(&mut self, id: TimerId) -> bool;

    fn cancel_all(&mut self) -> usize;

    fn pending(&self) -> usize;
}

#[cfg(test)]
pub use manual::ManualScheduler;

#[cfg(test)]
mod manual {
    use super::*;
    use std::collections::BTreeMap;

    /// Virtual clock for deterministic tests. Nothing fires on its own: the
    /// test pulls due timers with `next_due` and hands them to the coordinator.
    #[derive(Debug, Default)]
    pub struct ManualScheduler {
        now: Duration,
        next_id: u64,
        pending: BTreeMap<TimerId, (Duration, Timer)>,
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> Duration {
            self.now
        }

        /// Earliest timer due at or before `until`, advancing the clock to its deadline.
        pub fn next_due(&mut self, until: Duration) -> Option<(TimerId, Timer)> {
            let (id, deadline, timer) = self
                .pending
                .iter()
                .filter(|(_, (deadline, _))| *deadline <= until)
                .min_by_key(|(id, (deadline, _))| (*deadline, **id))
                .map(|(id, (deadline, timer))| (*id, *deadline, timer.clone()))?;
            self.now = self.now.max(deadline);
            Some((id, timer))
        }

        pub fn set_now(&mut self, now: Duration) {
            self.now = self.now.max(now);
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId {
            self.next_id += 1;
            let id = TimerId(self.next_id);
            self.pending.insert(id, (self.now + delay, timer));
            id
        }

        fn cancel(&mut self, id: TimerId) -> bool {
            self.pending.remove(&id).is_some()
        }

        fn take(&mut self, id: TimerId) -> bool {
            self.pending.remove(&id).is_some()
        }

        fn cancel_all(&mut self) -> usize {
            let count = self.pending.len();
            self.pending.clear();
            count
        }

        fn pending(&self) -> usize {
            self.pending.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_fires_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let late = scheduler.schedule(Duration::from_millis(3000), Timer::AutoRefresh);
        let early = scheduler.schedule(Duration::from_millis(1000), Timer::FiltersApplied);

        let (id, timer) = scheduler.next_due(Duration::from_millis(5000)).unwrap();
        assert_eq!((id, timer), (early, Timer::FiltersApplied));
        assert!(scheduler.take(early));
        assert_eq!(scheduler.now(), Duration::from_millis(1000));

        assert!(scheduler.cancel(late));
        assert!(scheduler.next_due(Duration::from_millis(5000)).is_none());
        assert!(!scheduler.take(late));
    }
}
