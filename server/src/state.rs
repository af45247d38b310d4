use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};
use vitrine_shared::Campaign;

use crate::config::{campaigns_file, sse_broadcast_buffer};
use crate::store::StoreError;

/// Snapshot event serialized once per change and shared by every SSE client.
#[derive(Debug, Clone)]
pub struct PreSerializedEvent {
    pub seq: u64,
    pub json: Arc<Bytes>,
}

#[derive(Debug, Clone)]
pub struct LiveSnapshot {
    pub seq: u64,
    pub timestamp: String,
    pub campaigns: Vec<Campaign>,
    /// `CampaignEvent::Snapshot` body for SSE.
    pub snapshot_json: Arc<Bytes>,
    /// `CampaignFeed` body for `GET /api/campaigns`.
    pub feed_json: Arc<Bytes>,
}

impl Default for LiveSnapshot {
    fn default() -> Self {
        let timestamp = Utc::now().to_rfc3339();
        let (snapshot_json, feed_json) = serialize_payloads(0, &timestamp, &[]).unwrap_or_else(|| {
            (
                Arc::new(Bytes::from_static(
                    br#"{"type":"Snapshot","seq":0,"campaigns":[],"timestamp":""}"#,
                )),
                Arc::new(Bytes::from_static(br#"{"seq":0,"timestamp":"","campaigns":[]}"#)),
            )
        });
        Self {
            seq: 0,
            timestamp,
            campaigns: Vec::new(),
            snapshot_json,
            feed_json,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub live_snapshot: Arc<RwLock<LiveSnapshot>>,
    pub event_tx: broadcast::Sender<PreSerializedEvent>,
    pub campaigns_file: PathBuf,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_campaigns_file(campaigns_file())
    }

    pub fn with_campaigns_file(campaigns_file: PathBuf) -> Self {
        let (event_tx, _) = broadcast::channel(sse_broadcast_buffer());
        Self {
            live_snapshot: Arc::new(RwLock::new(LiveSnapshot::default())),
            event_tx,
            campaigns_file,
        }
    }

    /// Apply `edit` to a copy of the list and publish it. The write lock is
    /// held across serialize and broadcast, so subscribers see snapshots in
    /// `seq` order. A failed edit publishes nothing.
    pub async fn mutate<T, F>(&self, edit: F) -> Result<(T, u64), StoreError>
    where
        F: FnOnce(&mut Vec<Campaign>) -> Result<T, StoreError>,
    {
        let mut current = self.live_snapshot.write().await;
        let mut next = current.campaigns.clone();
        let out = edit(&mut next)?;
        let seq = self.publish_locked(&mut current, next);
        Ok((out, seq))
    }

    /// Replace the whole list, e.g. from the seed file.
    pub async fn replace(&self, campaigns: Vec<Campaign>) -> u64 {
        let mut current = self.live_snapshot.write().await;
        self.publish_locked(&mut current, campaigns)
    }

    fn publish_locked(&self, current: &mut LiveSnapshot, campaigns: Vec<Campaign>) -> u64 {
        let seq = current.seq + 1;
        let timestamp = Utc::now().to_rfc3339();
        let Some((snapshot_json, feed_json)) = serialize_payloads(seq, &timestamp, &campaigns)
        else {
            // Keep serving the last good payloads.
            return current.seq;
        };
        current.seq = seq;
        current.timestamp = timestamp;
        current.campaigns = campaigns;
        current.snapshot_json = Arc::clone(&snapshot_json);
        current.feed_json = feed_json;

        let receivers = self.event_tx.receiver_count();
        let _ = self.event_tx.send(PreSerializedEvent {
            seq,
            json: snapshot_json,
        });
        info!(
            seq,
            campaigns = current.campaigns.len(),
            receivers,
            "published campaign snapshot"
        );
        seq
    }
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum SnapshotRef<'a> {
    Snapshot {
        seq: u64,
        campaigns: &'a [Campaign],
        timestamp: &'a str,
    },
}

#[derive(Serialize)]
struct FeedRef<'a> {
    seq: u64,
    timestamp: &'a str,
    campaigns: &'a [Campaign],
}

fn serialize_payloads(
    seq: u64,
    timestamp: &str,
    campaigns: &[Campaign],
) -> Option<(Arc<Bytes>, Arc<Bytes>)> {
    let snapshot = serde_json::to_vec(&SnapshotRef::Snapshot {
        seq,
        campaigns,
        timestamp,
    });
    let feed = serde_json::to_vec(&FeedRef {
        seq,
        timestamp,
        campaigns,
    });
    match (snapshot, feed) {
        (Ok(snapshot), Ok(feed)) => Some((
            Arc::new(Bytes::from(snapshot)),
            Arc::new(Bytes::from(feed)),
        )),
        (Err(e), _) | (_, Err(e)) => {
            warn!(seq, error = %e, "failed to serialize campaign snapshot");
            None
        }
    }
}
