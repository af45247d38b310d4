//! Ordered campaign list edits. Pure functions over `Vec<Campaign>`; the
//! caller decides when the result is published.

use std::collections::HashSet;

use thiserror::Error;
use vitrine_shared::{Campaign, CampaignDraft, CampaignError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("campaign {0:?} not found")]
    NotFound(String),
    #[error(transparent)]
    Invalid(#[from] CampaignError),
    #[error("duplicate campaign id {0:?}")]
    DuplicateId(String),
    #[error("order must list every campaign id exactly once")]
    NotPermutation,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn insert(list: &mut Vec<Campaign>, draft: CampaignDraft) -> Result<Campaign, StoreError> {
    let campaign = draft.into_campaign(new_id())?;
    list.push(campaign.clone());
    Ok(campaign)
}

/// Replace the record in place, keeping its position and id.
pub fn update(
    list: &mut [Campaign],
    id: &str,
    draft: CampaignDraft,
) -> Result<Campaign, StoreError> {
    let slot = position(list, id)?;
    let campaign = draft.into_campaign(id.to_string())?;
    list[slot] = campaign.clone();
    Ok(campaign)
}

pub fn remove(list: &mut Vec<Campaign>, id: &str) -> Result<Campaign, StoreError> {
    let slot = position(list, id)?;
    Ok(list.remove(slot))
}

pub fn toggle(list: &mut [Campaign], id: &str) -> Result<Campaign, StoreError> {
    let slot = position(list, id)?;
    list[slot].active = !list[slot].active;
    Ok(list[slot].clone())
}

pub fn reorder(list: &mut Vec<Campaign>, order: &[String]) -> Result<(), StoreError> {
    let unique: HashSet<&str> = order.iter().map(String::as_str).collect();
    if order.len() != list.len() || unique.len() != order.len() {
        return Err(StoreError::NotPermutation);
    }
    let mut reordered = Vec::with_capacity(list.len());
    for id in order {
        let slot = list
            .iter()
            .position(|c| &c.id == id)
            .ok_or(StoreError::NotPermutation)?;
        reordered.push(list[slot].clone());
    }
    *list = reordered;
    Ok(())
}

/// Validate a whole list loaded from disk. Ids must be unique; every record
/// must pass validation.
pub fn validate_list(list: &[Campaign]) -> Result<(), StoreError> {
    let mut seen = HashSet::with_capacity(list.len());
    for campaign in list {
        campaign.validate()?;
        if !seen.insert(campaign.id.as_str()) {
            return Err(StoreError::DuplicateId(campaign.id.clone()));
        }
    }
    Ok(())
}

fn position(list: &[Campaign], id: &str) -> Result<usize, StoreError> {
    list.iter()
        .position(|c| c.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}
