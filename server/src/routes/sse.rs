use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use bytes::Bytes;
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::warn;

use crate::config::SSE_KEEPALIVE_SECS;
use crate::state::AppState;

pub async fn campaign_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        // Subscribe before reading the snapshot so no mutation falls between.
        let rx = state.event_tx.subscribe();
        let (mut last_seq, data) = latest_snapshot(&state).await;
        if let Some(event) = snapshot_event(last_seq, &data) {
            yield Ok(event);
        }

        let mut stream = BroadcastStream::new(rx);
        while let Some(result) = stream.next().await {
            match result {
                Ok(event) => {
                    if event.seq <= last_seq {
                        continue;
                    }
                    last_seq = event.seq;
                    if let Some(event) = snapshot_event(event.seq, &event.json) {
                        yield Ok(event);
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(
                        skipped_events = skipped,
                        "SSE client lagged behind broadcast buffer; replaying snapshot"
                    );
                    let (seq, data) = latest_snapshot(&state).await;
                    last_seq = seq;
                    if let Some(event) = snapshot_event(seq, &data) {
                        yield Ok(event);
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEPALIVE_SECS))
            .text("keep-alive"),
    )
}

async fn latest_snapshot(state: &AppState) -> (u64, std::sync::Arc<Bytes>) {
    let snapshot = state.live_snapshot.read().await;
    (snapshot.seq, snapshot.snapshot_json.clone())
}

fn snapshot_event(seq: u64, data: &Bytes) -> Option<Event> {
    let Ok(payload) = std::str::from_utf8(data.as_ref()) else {
        warn!(seq, "snapshot payload is not valid utf-8; dropping SSE event");
        return None;
    };
    Some(
        Event::default()
            .id(seq.to_string())
            .event("snapshot")
            .data(payload),
    )
}
