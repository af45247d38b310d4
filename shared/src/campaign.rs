use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{CameraPosition, Coordinates, MIN_ZOOM};
use crate::projection::in_domain;
use crate::regions;

/// One promotional/impact story tied to a Brazilian state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Campaign {
    pub id: String,
    pub client: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Must equal a region name in the boundary file for the highlight to match.
    pub region: String,
    #[serde(default)]
    pub region_label: String,
    /// `[longitude, latitude]`.
    pub coordinates: Coordinates,
    pub zoom: f64,
    #[serde(default)]
    pub impact: u64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CampaignError {
    #[error("campaign id must not be empty")]
    EmptyId,
    #[error("campaign {id}: region must not be empty")]
    EmptyRegion { id: String },
    #[error("campaign {id}: coordinates {coordinates:?} are outside the map")]
    BadCoordinates { id: String, coordinates: Coordinates },
    #[error("campaign {id}: zoom {zoom} must be above the whole-country zoom")]
    BadZoom { id: String, zoom: f64 },
    #[error("region {region:?} is not a known state and no focus was given")]
    UnknownRegion { region: String },
}

impl Campaign {
    pub fn focus(&self) -> CameraPosition {
        CameraPosition::new(self.coordinates, self.zoom)
    }

    /// Label shown on the card; falls back to the region identifier.
    pub fn display_region(&self) -> &str {
        if self.region_label.trim().is_empty() {
            &self.region
        } else {
            &self.region_label
        }
    }

    pub fn validate(&self) -> Result<(), CampaignError> {
        if self.id.trim().is_empty() {
            return Err(CampaignError::EmptyId);
        }
        if self.region.trim().is_empty() {
            return Err(CampaignError::EmptyRegion {
                id: self.id.clone(),
            });
        }
        if !in_domain(self.coordinates) {
            return Err(CampaignError::BadCoordinates {
                id: self.id.clone(),
                coordinates: self.coordinates,
            });
        }
        if !self.zoom.is_finite() || self.zoom <= MIN_ZOOM {
            return Err(CampaignError::BadZoom {
                id: self.id.clone(),
                zoom: self.zoom,
            });
        }
        Ok(())
    }
}

/// Active, well-formed campaigns in their original order. Malformed records
/// are dropped with a warning rather than failing the whole list.
pub fn active_campaigns(campaigns: &[Campaign]) -> Vec<Campaign> {
    campaigns
        .iter()
        .filter(|c| c.active)
        .filter(|c| match c.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed campaign from the display cycle");
                false
            }
        })
        .cloned()
        .collect()
}

/// Create/update body. Focus fields are optional and filled in from the
/// state catalogue when the region is a known state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignDraft {
    pub client: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub region: String,
    #[serde(default)]
    pub region_label: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub zoom: Option<f64>,
    #[serde(default)]
    pub impact: u64,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl CampaignDraft {
    pub fn into_campaign(self, id: String) -> Result<Campaign, CampaignError> {
        let known = regions::lookup(&self.region);
        let region = known.map_or_else(|| self.region.trim().to_string(), |s| s.name.to_string());

        let (coordinates, zoom) = match (self.coordinates, self.zoom, known) {
            (Some(coordinates), Some(zoom), _) => (coordinates, zoom),
            (coordinates, zoom, Some(state)) => {
                (coordinates.unwrap_or(state.focus), zoom.unwrap_or(state.zoom))
            }
            (Some(coordinates), None, None) => (coordinates, regions::DEFAULT_FOCUS_ZOOM),
            (None, _, None) => return Err(CampaignError::UnknownRegion { region }),
        };

        let region_label = self
            .region_label
            .filter(|label| !label.trim().is_empty())
            .or_else(|| known.map(|s| s.name.to_string()))
            .unwrap_or_else(|| region.clone());

        let campaign = Campaign {
            id,
            client: self.client,
            category: self.category,
            description: self.description,
            image: self.image,
            region,
            region_label,
            coordinates,
            zoom,
            impact: self.impact,
            active: self.active,
        };
        campaign.validate()?;
        Ok(campaign)
    }
}
