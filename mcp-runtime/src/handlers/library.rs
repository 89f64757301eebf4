use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::{HandlerFailure, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::queue::library_match_fields;
use super::{json_to_map, required_str};
use crate::automation::Automation;
use crate::catalog::CatalogApi;
use crate::scripts;

pub struct AddToLibrary {
    catalog: Arc<dyn CatalogApi>,
}

impl AddToLibrary {
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolHandler for AddToLibrary {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let track_id = required_str(&arguments, "track_id")?;
        let item_type = arguments.str("item_type").unwrap_or("songs");
        self.catalog.add_to_library(item_type, track_id).await?;
        tracing::info!(track_id, item_type, "added to library");
        Ok(json_to_map(json!({
            "status": "added",
            "track_id": track_id,
            "item_type": item_type,
        })))
    }
}

/// The catalog API cannot delete library items, so removal goes through
/// the Music app, matching on the catalog song's name and artist.
pub struct RemoveFromLibrary {
    catalog: Arc<dyn CatalogApi>,
    automation: Arc<dyn Automation>,
}

impl RemoveFromLibrary {
    pub fn new(catalog: Arc<dyn CatalogApi>, automation: Arc<dyn Automation>) -> Self {
        Self {
            catalog,
            automation,
        }
    }
}

#[async_trait]
impl ToolHandler for RemoveFromLibrary {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let track_id = required_str(&arguments, "track_id")?;
        let track = self.catalog.song(track_id).await?;
        let (name, artist) = library_match_fields(&track)?;

        let output = self
            .automation
            .run(&scripts::remove_from_library(name, artist))
            .await?;
        let removed = scripts::parse_count(&output)?.unwrap_or(0);
        if removed == 0 {
            return Err(HandlerFailure::not_found(format!(
                "'{name}' by {artist} is not in the local library."
            )));
        }

        Ok(json_to_map(json!({
            "status": "removed",
            "track_id": track_id,
            "removed": removed,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::fakes::{FakeAutomation, FakeCatalog, song};
    use cadenza_core::tools::{add_to_library, remove_from_library};
    use cadenza_core::{FailureKind, validate};

    #[tokio::test]
    async fn add_defaults_to_songs() {
        let catalog = Arc::new(FakeCatalog::default());
        let arguments =
            validate(&add_to_library(), json!({"track_id": "1440"}).as_object().unwrap()).unwrap();
        let payload = AddToLibrary::new(catalog.clone())
            .execute(arguments)
            .await
            .unwrap();
        assert_eq!(payload["status"], "added");
        assert_eq!(payload["item_type"], "songs");
        assert_eq!(catalog.calls(), vec!["library:songs:1440"]);
    }

    #[tokio::test]
    async fn add_passes_album_type_through() {
        let catalog = Arc::new(FakeCatalog::default());
        let arguments = validate(
            &add_to_library(),
            json!({"track_id": "1440", "item_type": "albums"}).as_object().unwrap(),
        )
        .unwrap();
        AddToLibrary::new(catalog.clone())
            .execute(arguments)
            .await
            .unwrap();
        assert_eq!(catalog.calls(), vec!["library:albums:1440"]);
    }

    #[tokio::test]
    async fn remove_deletes_matching_tracks() {
        let catalog = Arc::new(FakeCatalog::default().with_song(song("1440", "Billie Jean", "MJ")));
        let automation = Arc::new(FakeAutomation::replying(vec![Ok("2".to_string())]));
        let arguments =
            validate(&remove_from_library(), json!({"track_id": "1440"}).as_object().unwrap())
                .unwrap();
        let payload = RemoveFromLibrary::new(catalog, automation.clone())
            .execute(arguments)
            .await
            .unwrap();
        assert_eq!(payload["removed"], 2);
        assert!(automation.scripts()[0].contains("delete (every track of library playlist 1"));
    }

    #[tokio::test]
    async fn remove_with_no_matches_is_not_found() {
        let catalog = Arc::new(FakeCatalog::default().with_song(song("1440", "Billie Jean", "MJ")));
        let automation = Arc::new(FakeAutomation::replying(vec![Ok("0".to_string())]));
        let arguments =
            validate(&remove_from_library(), json!({"track_id": "1440"}).as_object().unwrap())
                .unwrap();
        let failure = RemoveFromLibrary::new(catalog, automation)
            .execute(arguments)
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::NotFound);
    }
}
