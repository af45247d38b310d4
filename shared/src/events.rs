use serde::{Deserialize, Serialize};

use crate::campaign::Campaign;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CampaignEvent {
    Snapshot {
        #[serde(default)]
        seq: u64,
        campaigns: Vec<Campaign>,
        timestamp: String,
    },
}

impl CampaignEvent {
    pub fn seq(&self) -> u64 {
        match self {
            Self::Snapshot { seq, .. } => *seq,
        }
    }
}

/// Body of `GET /api/campaigns`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignFeed {
    pub seq: u64,
    pub timestamp: String,
    pub campaigns: Vec<Campaign>,
}
