use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{HandlerFailure, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::{json_to_map, required_str};
use crate::automation::Automation;
use crate::catalog::{CatalogApi, CatalogItem};
use crate::scripts;

/// The Music app exposes no scriptable "Up Next", so the queue is a
/// dedicated library playlist.
pub struct ManageQueue {
    catalog: Arc<dyn CatalogApi>,
    automation: Arc<dyn Automation>,
    playlist: String,
}

impl ManageQueue {
    pub fn new(
        catalog: Arc<dyn CatalogApi>,
        automation: Arc<dyn Automation>,
        playlist: String,
    ) -> Self {
        Self {
            catalog,
            automation,
            playlist,
        }
    }

    async fn add(&self, track_id: &str, play_next: bool) -> Result<Map<String, Value>, HandlerFailure> {
        let track = self.catalog.song(track_id).await?;
        let (name, artist) = library_match_fields(&track)?;

        let output = self
            .automation
            .run(&scripts::queue_add(&self.playlist, name, artist, play_next))
            .await?;
        let Some(count) = scripts::parse_count(&output)? else {
            return Err(HandlerFailure::not_found(format!(
                "'{name}' by {artist} is not in the local library."
            ))
            .with_hint("Add it with add_to_library first, then queue it."));
        };

        Ok(json_to_map(json!({
            "action": "add",
            "playlist": self.playlist,
            "track": { "id": track_id, "name": name, "artist": artist },
            "play_next": play_next,
            "count": count,
        })))
    }

    async fn view(&self) -> Result<Map<String, Value>, HandlerFailure> {
        let output = self
            .automation
            .run(&scripts::queue_view(&self.playlist))
            .await?;
        let tracks = scripts::parse_queue(&output)?;
        Ok(json_to_map(json!({
            "playlist": self.playlist,
            "count": tracks.len(),
            "tracks": tracks,
        })))
    }

    async fn clear(&self) -> Result<Map<String, Value>, HandlerFailure> {
        let output = self
            .automation
            .run(&scripts::queue_clear(&self.playlist))
            .await?;
        let cleared = scripts::parse_count(&output)?.unwrap_or(0);
        Ok(json_to_map(json!({
            "playlist": self.playlist,
            "cleared": cleared,
        })))
    }
}

/// Library tracks are matched on name and artist; both must be known.
pub(super) fn library_match_fields(track: &CatalogItem) -> Result<(&str, &str), HandlerFailure> {
    match (track.name.as_deref(), track.artist.as_deref()) {
        (Some(name), Some(artist)) if !name.is_empty() && !artist.is_empty() => Ok((name, artist)),
        _ => Err(HandlerFailure::domain(
            "The catalog entry lacks the name or artist needed to find it in the library.",
        )),
    }
}

#[async_trait]
impl ToolHandler for ManageQueue {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        match required_str(&arguments, "action")? {
            "add" => {
                let track_id = required_str(&arguments, "track_id")?;
                let play_next = arguments.boolean("play_next").unwrap_or(false);
                self.add(track_id, play_next).await
            }
            "view" => self.view().await,
            "clear" => self.clear().await,
            other => Err(HandlerFailure::internal(format!(
                "unsupported queue action '{other}'"
            ))),
        }
    }
}
