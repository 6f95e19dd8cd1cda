// Tokio-backed scheduler - each delay is a sleeping task that reports back over a channel
use crate::application::scheduler::{Scheduler, Timer, TimerId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

pub type FiredTimers = mpsc::UnboundedReceiver<(TimerId, Timer)>;

/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    next_id: u64,
    fired: mpsc::UnboundedSender<(TimerId, Timer)>,
    tasks: HashMap<TimerId, AbortHandle>,
}

impl TokioScheduler {
    pub fn new() -> (Self, FiredTimers) {
        let (fired, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            fired,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let fired = self.fired.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver gone means the coordinator shut down
            let _ = fired.send((id, timer));
        });
        self.tasks.insert(id, task.abort_handle());
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.tasks.remove(&id) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    fn take(&mut self, id: TimerId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
        count
    }

    fn pending(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
