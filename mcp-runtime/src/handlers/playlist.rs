use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{HandlerFailure, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::{json_to_map, required_str};
use crate::catalog::CatalogApi;

pub struct CreatePlaylist {
    catalog: Arc<dyn CatalogApi>,
}

impl CreatePlaylist {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolHandler for CreatePlaylist {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let name = required_str(&arguments, "name")?;
        let description = arguments.str("description").filter(|d| !d.trim().is_empty());
        let track_ids = arguments.list("track_ids").unwrap_or_default();

        let created = self
            .catalog
            .create_playlist(name, description, track_ids)
            .await?;
        tracing::info!(tracks = track_ids.len(), "playlist created");

        Ok(json_to_map(json!({
            "status": "created",
            "playlist": created,
            "track_count": track_ids.len(),
        })))
    }
}
