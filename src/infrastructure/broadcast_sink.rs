// Broadcast render sink - fans render events out to every connected event stream
use crate::application::render::{RenderEvent, RenderSink};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct BroadcastRenderSink {
    tx: broadcast::Sender<RenderEvent>,
}

impl BroadcastRenderSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RenderEvent> {
        self.tx.subscribe()
    }
}

impl RenderSink for BroadcastRenderSink {
    fn render(&self, event: RenderEvent) {
        tracing::trace!("Render event: {:?}", event);
        // no subscribers is fine: nobody is watching the dashboard right now
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let sink = BroadcastRenderSink::new(8);
        sink.render(RenderEvent::DataRefresh);

        let mut rx = sink.subscribe();
        sink.render(RenderEvent::BadgeChanged { count: 2 });
        assert_eq!(rx.recv().await.unwrap(), RenderEvent::BadgeChanged { count: 2 });
    }
}
