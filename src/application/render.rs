// Render seam - state changes pushed to whatever draws the dashboard
use crate::domain::drill::DrillContext;
use crate::domain::filters::FilterCriteria;
use crate::domain::notification::{Notification, NotificationId};
use crate::domain::scenario::ScenarioResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderEvent {
    ViewActivated { group: String, view: String },
    FiltersChanged { filters: FilterCriteria },
    NotificationShown { notification: Notification },
    NotificationRemoved { id: NotificationId },
    DataRefresh,
    SelectionChanged { table: String, count: usize },
    BadgeChanged { count: u32 },
    FlagsChanged { displayed: usize },
    DrillContextChanged { context: Vec<DrillContext> },
    PanelChanged { panel: String, visible: bool },
    CollaborationChanged { active: bool },
    ScenarioCalculated { result: ScenarioResult },
}

pub trait RenderSink: Send + Sync {
    fn render(&self, event: RenderEvent);
}

#[cfg(test)]
pub use recording::RecordingSink;

#[cfg(test)]
mod recording {
    use super::*;
    use crate::domain::notification::Severity;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<RenderEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<RenderEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.events.lock().unwrap().clear();
        }

        pub fn shown(&self) -> Vec<(Severity, String)> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    RenderEvent::NotificationShown { notification } => {
                        Some((notification.severity, notification.message))
                    }
                    _ => None,
                })
                .collect()
        }

        pub fn refreshes(&self) -> usize {
            self.events()
                .iter()
                .filter(|event| matches!(event, RenderEvent::DataRefresh))
                .count()
        }
    }

    impl RenderSink for RecordingSink {
        fn render(&self, event: RenderEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
