use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{HandlerFailure, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::{json_to_map, required_str};
use crate::automation::Automation;
use crate::catalog::{CatalogApi, CatalogItem};
use crate::scripts;

pub struct PlaySong {
    catalog: Arc<dyn CatalogApi>,
    automation: Arc<dyn Automation>,
}

impl PlaySong {
    pub fn new(catalog: Arc<dyn CatalogApi>, automation: Arc<dyn Automation>) -> Self {
        Self {
            catalog,
            automation,
        }
    }
}

/// Explicit URL first, then the catalog URL, then one built from play params.
fn resolve_location(explicit: Option<&str>, track: &CatalogItem) -> Option<String> {
    if let Some(url) = explicit {
        return Some(url.to_string());
    }
    if let Some(url) = track.url.as_deref().filter(|url| !url.is_empty()) {
        return Some(url.to_string());
    }
    track
        .play_catalog_id()
        .map(|id| format!("https://music.apple.com/{id}"))
}

#[async_trait]
impl ToolHandler for PlaySong {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let track_id = required_str(&arguments, "track_id")?;
        let track = self.catalog.song(track_id).await?;

        let Some(location) = resolve_location(arguments.str("play_location_url"), &track) else {
            return Err(HandlerFailure::domain(
                "No playable URL was available for the requested track.",
            )
            .with_hint("Ensure the track is available in the configured storefront."));
        };

        self.automation.run(&scripts::play_location(&location)).await?;
        tracing::info!(track_id, "playback started");

        Ok(json_to_map(json!({
            "status": "playing",
            "track": track.to_value(),
            "play_location_url": location,
        })))
    }
}
