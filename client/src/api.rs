use serde::de::DeserializeOwned;

use vitrine_shared::CampaignFeed;
use vitrine_shared::geometry::{self, FeatureCollection};

pub const CAMPAIGNS_URL: &str = "/api/campaigns";
pub const GEOMETRY_URL: &str = "/geo/brazil-states.json";

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    resp.json::<T>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

pub async fn fetch_campaigns() -> Result<CampaignFeed, String> {
    get_json::<CampaignFeed>(CAMPAIGNS_URL).await
}

/// The boundary file is fetched as text and parsed by the shared geometry
/// module so validation matches the native tests.
pub async fn fetch_geometry() -> Result<FeatureCollection, String> {
    let resp = gloo_net::http::Request::get(GEOMETRY_URL)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }
    let text = resp
        .text()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;
    geometry::parse_feature_collection(&text).map_err(|e| format!("parse error: {e}"))
}
