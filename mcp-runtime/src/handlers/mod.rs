//! One [`ToolHandler`] per advertised tool, wired to the catalog and the
//! local automation runner.

use std::sync::Arc;

use cadenza_core::tools;
use cadenza_core::{
    Dispatcher, HandlerFailure, Redactor, RegistryError, ToolHandler, ValidatedArguments,
};
use serde_json::{Map, Value};

use crate::automation::{Automation, OsaScript};
use crate::cache::SearchCache;
use crate::catalog::{CatalogApi, MusicKitClient};
use crate::settings::Settings;

mod health;
mod library;
mod play;
mod playback;
mod playlist;
mod queue;
mod search;

pub use health::HealthCheck;
pub use library::{AddToLibrary, RemoveFromLibrary};
pub use play::PlaySong;
pub use playback::ControlPlayback;
pub use playlist::CreatePlaylist;
pub use queue::ManageQueue;
pub use search::SearchMusic;

/// Collaborators shared by the handlers.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogApi>,
    pub automation: Arc<dyn Automation>,
    pub search_cache: Arc<SearchCache>,
    pub queue_playlist: String,
    pub redactor: Redactor,
}

impl Services {
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let catalog = MusicKitClient::from_settings(settings)?;
        let automation = OsaScript::new(settings.osascript.clone(), settings.automation_timeout());
        let mut redactor = Redactor::new();
        if let Some(token) = settings.music_user_token() {
            redactor = redactor.with_secret(token);
        }
        Ok(Self {
            catalog: Arc::new(catalog),
            automation: Arc::new(automation),
            search_cache: Arc::new(SearchCache::new(settings.search_cache_ttl())),
            queue_playlist: settings.queue_playlist.trim().to_string(),
            redactor,
        })
    }
}

/// Dispatcher serving the full manifest.
pub fn build_dispatcher(services: &Services) -> Result<Dispatcher, RegistryError> {
    let handlers: [(&str, Arc<dyn ToolHandler>); 8] = [
        (
            tools::SEARCH_MUSIC,
            Arc::new(SearchMusic::new(
                services.catalog.clone(),
                services.search_cache.clone(),
            )),
        ),
        (
            tools::PLAY_SONG,
            Arc::new(PlaySong::new(
                services.catalog.clone(),
                services.automation.clone(),
            )),
        ),
        (
            tools::CONTROL_PLAYBACK,
            Arc::new(ControlPlayback::new(services.automation.clone())),
        ),
        (
            tools::MANAGE_QUEUE,
            Arc::new(ManageQueue::new(
                services.catalog.clone(),
                services.automation.clone(),
                services.queue_playlist.clone(),
            )),
        ),
        (
            tools::ADD_TO_LIBRARY,
            Arc::new(AddToLibrary::new(services.catalog.clone())),
        ),
        (
            tools::REMOVE_FROM_LIBRARY,
            Arc::new(RemoveFromLibrary::new(
                services.catalog.clone(),
                services.automation.clone(),
            )),
        ),
        (
            tools::CREATE_PLAYLIST,
            Arc::new(CreatePlaylist::new(services.catalog.clone())),
        ),
        (
            tools::HEALTH_CHECK,
            Arc::new(HealthCheck::new(
                services.catalog.clone(),
                services.automation.clone(),
                services.redactor.clone(),
            )),
        ),
    ];

    let mut builder = Dispatcher::builder(tools::default_registry()?);
    for (name, handler) in handlers {
        builder = builder.shared_handler(name, handler);
    }
    builder.redactor(services.redactor.clone()).build()
}

fn required_str<'a>(
    arguments: &'a ValidatedArguments,
    name: &str,
) -> Result<&'a str, HandlerFailure> {
    arguments
        .str(name)
        .ok_or_else(|| HandlerFailure::internal(format!("validated arguments lack '{name}'")))
}

fn json_to_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cadenza_core::HandlerFailure;
    use serde_json::json;

    use super::*;
    use crate::catalog::{CatalogItem, CreatedPlaylist, SearchQuery};

    pub fn song(id: &str, name: &str, artist: &str) -> CatalogItem {
        CatalogItem {
            id: Some(id.to_string()),
            kind: Some("songs".to_string()),
            name: Some(name.to_string()),
            artist: Some(artist.to_string()),
            album: Some("Album".to_string()),
            url: Some(format!("https://music.apple.com/us/song/{id}")),
            play_params: Some(json!({"id": id, "kind": "song"})),
            ..CatalogItem::default()
        }
    }

    #[derive(Default)]
    pub struct FakeCatalog {
        pub songs: HashMap<String, CatalogItem>,
        pub search_results: Vec<CatalogItem>,
        pub failure: Option<HandlerFailure>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeCatalog {
        pub fn with_song(mut self, item: CatalogItem) -> Self {
            if let Some(id) = item.id.clone() {
                self.songs.insert(id, item);
            }
            self
        }

        pub fn with_search_results(mut self, items: Vec<CatalogItem>) -> Self {
            self.search_results = items;
            self
        }

        pub fn failing(failure: HandlerFailure) -> Self {
            Self {
                failure: Some(failure),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), HandlerFailure> {
            self.calls.lock().unwrap().push(call);
            match &self.failure {
                Some(failure) => Err(failure.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        fn storefront(&self) -> &str {
            "us"
        }

        async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, HandlerFailure> {
            self.record(format!("search:{}", query.term))?;
            Ok(self
                .search_results
                .iter()
                .take(query.limit as usize)
                .cloned()
                .collect())
        }

        async fn song(&self, id: &str) -> Result<CatalogItem, HandlerFailure> {
            self.record(format!("song:{id}"))?;
            self.songs
                .get(id)
                .cloned()
                .ok_or_else(|| HandlerFailure::not_found(format!("song {id} not found")))
        }

        async fn add_to_library(&self, item_type: &str, id: &str) -> Result<(), HandlerFailure> {
            self.record(format!("library:{item_type}:{id}"))
        }

        async fn create_playlist(
            &self,
            name: &str,
            description: Option<&str>,
            track_ids: &[String],
        ) -> Result<CreatedPlaylist, HandlerFailure> {
            self.record(format!("playlist:{name}:{}", track_ids.join(",")))?;
            Ok(CreatedPlaylist {
                id: Some("p.fake".to_string()),
                name: name.to_string(),
                description: description.map(str::to_string),
            })
        }
    }

    /// Replays queued outputs and records every script it was given.
    #[derive(Default)]
    pub struct FakeAutomation {
        responses: Mutex<VecDeque<Result<String, HandlerFailure>>>,
        scripts: Mutex<Vec<String>>,
    }

    impl FakeAutomation {
        pub fn replying(responses: Vec<Result<String, HandlerFailure>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                scripts: Mutex::new(Vec::new()),
            }
        }

        pub fn scripts(&self) -> Vec<String> {
            self.scripts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Automation for FakeAutomation {
        async fn run(&self, script: &str) -> Result<String, HandlerFailure> {
            self.scripts.lock().unwrap().push(script.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }
}
