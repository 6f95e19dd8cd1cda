// Server-sent event stream of render events
use crate::application::render::RenderEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use tokio::sync::broadcast::{self, error::RecvError};

/// Turns a render-event subscription into an SSE response. Slow clients that
/// fall behind skip the missed events and are told how many they lost.
pub fn sse_from_receiver(
    mut rx: broadcast::Receiver<RenderEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(event) => yield Ok(encode(&event)),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("Event stream lagged, skipped {} events", missed);
                    yield Ok(Event::default().event("lagged").data(missed.to_string()));
                }
                Err(RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn encode(event: &RenderEvent) -> Event {
    match serde_json::to_string(event) {
        Ok(json) => Event::default().event("render").data(json),
        Err(e) => {
            tracing::error!("Render event serialization error: {}", e);
            Event::default().event("error").data(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;

    #[test]
    fn test_render_event_json_shape() {
        let json = serde_json::to_value(RenderEvent::ViewActivated {
            group: "dashboard".to_string(),
            view: "manager".to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "view_activated", "group": "dashboard", "view": "manager"})
        );
    }

    #[tokio::test]
    async fn test_lagged_subscriber_is_told_what_it_missed() {
        let (tx, rx) = broadcast::channel(1);
        tx.send(RenderEvent::DataRefresh).unwrap();
        tx.send(RenderEvent::BadgeChanged { count: 2 }).unwrap();
        drop(tx);

        let body = sse_from_receiver(rx).into_response().into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        let lagged = text.find("lagged").unwrap();
        let badge = text.find(r#"{"type":"badge_changed","count":2}"#).unwrap();
        assert!(lagged < badge);
        assert!(!text.contains("data_refresh"));
    }
}
