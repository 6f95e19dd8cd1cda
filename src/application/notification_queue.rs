// Notification queue - displayed notifications and their expiry timers
use crate::application::scheduler::TimerId;
use crate::domain::notification::{Notification, NotificationId, Severity};
use std::time::Duration;

/// No cap and no de-duplication: every call to `push` stacks a new entry.
#[derive(Debug)]
pub struct NotificationQueue {
    next_id: u64,
    display: Duration,
    active: Vec<(Notification, Option<TimerId>)>,
}

impl NotificationQueue {
    /// `display` is how long each notification stays on screen.
    pub fn new(display: Duration) -> Self {
        Self {
            next_id: 0,
            display,
            active: Vec::new(),
        }
    }

    pub fn display_duration(&self) -> Duration {
        self.display
    }

    pub fn push(&mut self, message: String, severity: Severity) -> Notification {
        self.next_id += 1;
        let notification = Notification::new(NotificationId(self.next_id), message, severity);
        self.active.push((notification.clone(), None));
        notification
    }

    pub fn attach_expiry(&mut self, id: NotificationId, timer: TimerId) {
        if let Some((_, slot)) = self.active.iter_mut().find(|(n, _)| n.id == id) {
            *slot = Some(timer);
        }
    }

    /// Removes the notification, returning its pending expiry timer if any.
    pub fn remove(&mut self, id: NotificationId) -> Option<(Notification, Option<TimerId>)> {
        let index = self.active.iter().position(|(n, _)| n.id == id)?;
        Some(self.active.remove(index))
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.active.iter().map(|(n, _)| n)
    }

    /// Drops every displayed notification, returning their ids in display order.
    pub fn clear(&mut self) -> Vec<NotificationId> {
        self.active.drain(..).map(|(n, _)| n.id).collect()
    }
}
