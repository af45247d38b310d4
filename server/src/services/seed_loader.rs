use std::path::Path;
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tracing::{info, warn};
use vitrine_shared::Campaign;

use crate::state::AppState;
use crate::store::{self, StoreError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid seed list: {0}")]
    Invalid(#[from] StoreError),
}

pub async fn read_seed(path: &Path) -> Result<Vec<Campaign>, SeedError> {
    let display = path.display().to_string();
    let bytes = tokio::fs::read(path).await.map_err(|source| SeedError::Io {
        path: display.clone(),
        source,
    })?;
    let campaigns: Vec<Campaign> =
        serde_json::from_slice(&bytes).map_err(|source| SeedError::Parse {
            path: display,
            source,
        })?;
    store::validate_list(&campaigns)?;
    Ok(campaigns)
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

/// Load the seed list once. A missing or broken file leaves the list empty.
pub async fn load_initial(state: &AppState) -> Option<SystemTime> {
    let path = state.campaigns_file.as_path();
    match read_seed(path).await {
        Ok(campaigns) => {
            let count = campaigns.len();
            let seq = state.replace(campaigns).await;
            info!(count, seq, path = %path.display(), "loaded seed campaigns");
        }
        Err(SeedError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "seed file not found; starting with an empty list");
        }
        Err(e) => warn!(error = %e, "failed to load seed campaigns; starting with an empty list"),
    }
    modified_at(path).await
}

/// Reload the seed file whenever its modification time changes. Edits made
/// through the API are replaced by the file contents on reload.
pub async fn run(state: AppState, every: Duration, mut last_modified: Option<SystemTime>) {
    let mut interval = tokio::time::interval(every);
    // The first tick fires immediately; the file was just loaded.
    interval.tick().await;

    loop {
        interval.tick().await;
        last_modified = reload_if_changed(&state, last_modified).await;
    }
}

async fn reload_if_changed(state: &AppState, last_modified: Option<SystemTime>) -> Option<SystemTime> {
    let path = state.campaigns_file.as_path();
    let modified = modified_at(path).await;
    if modified.is_none() || modified == last_modified {
        return last_modified;
    }
    match read_seed(path).await {
        Ok(campaigns) => {
            let count = campaigns.len();
            let seq = state.replace(campaigns).await;
            info!(count, seq, "seed file changed; campaigns reloaded");
        }
        Err(e) => warn!(error = %e, "seed file changed but could not be loaded; keeping current list"),
    }
    modified
}
