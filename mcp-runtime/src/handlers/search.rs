use std::sync::Arc;

use async_trait::async_trait;
use cadenza_core::tools::{SEARCH_LIMIT_DEFAULT, SEARCH_TYPES};
use cadenza_core::{HandlerFailure, ToolHandler, ValidatedArguments};
use serde_json::{Map, Value, json};

use super::{json_to_map, required_str};
use crate::cache::{SearchCache, SearchKey};
use crate::catalog::{CatalogApi, SearchQuery};

pub struct SearchMusic {
    catalog: Arc<dyn CatalogApi>,
    cache: Arc<SearchCache>,
}

impl SearchMusic {
    pub fn new(catalog: Arc<dyn CatalogApi>, cache: Arc<SearchCache>) -> Self {
        Self { catalog, cache }
    }
}

#[async_trait]
impl ToolHandler for SearchMusic {
    async fn execute(
        &self,
        arguments: ValidatedArguments,
    ) -> Result<Map<String, Value>, HandlerFailure> {
        let query = SearchQuery {
            term: required_str(&arguments, "term")?.to_string(),
            types: arguments
                .list("types")
                .map(<[String]>::to_vec)
                .unwrap_or_else(|| vec![SEARCH_TYPES[0].to_string()]),
            limit: arguments.integer("limit").unwrap_or(SEARCH_LIMIT_DEFAULT),
            offset: arguments.integer("offset").unwrap_or(0),
        };

        let key = SearchKey::new(&query.term, &query.types, query.limit, query.offset);
        if let Some(mut cached) = self.cache.get(&key) {
            tracing::debug!("search served from cache");
            cached.insert("source".to_string(), json!("cache"));
            return Ok(cached);
        }

        let items = self.catalog.search(&query).await?;
        let results: Vec<Value> = items.iter().map(|item| item.to_value()).collect();
        let payload = json_to_map(json!({
            "term": query.term,
            "types": query.types,
            "limit": query.limit,
            "offset": query.offset,
            "storefront": self.catalog.storefront(),
            "results": results,
        }));
        self.cache.insert(key, payload.clone());

        let mut live = payload;
        live.insert("source".to_string(), json!("live"));
        Ok(live)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::handlers::fakes::{FakeCatalog, song};
    use cadenza_core::tools::{self, search_music};
    use cadenza_core::{FailureKind, validate};

    fn arguments(raw: Value) -> ValidatedArguments {
        validate(&search_music(), raw.as_object().unwrap()).unwrap()
    }

    fn handler(catalog: Arc<FakeCatalog>) -> SearchMusic {
        SearchMusic::new(catalog, Arc::new(SearchCache::new(Duration::from_secs(300))))
    }

    #[tokio::test]
    async fn live_then_cached() {
        let catalog = Arc::new(FakeCatalog::default().with_search_results(vec![
            song("1", "Thriller", "Michael Jackson"),
            song("2", "Beat It", "Michael Jackson"),
        ]));
        let handler = handler(catalog.clone());

        let first = handler
            .execute(arguments(json!({"term": "Thriller", "types": ["songs"], "limit": 5})))
            .await
            .unwrap();
        assert_eq!(first["source"], "live");
        assert_eq!(first["storefront"], "us");
        assert_eq!(first["results"].as_array().unwrap().len(), 2);
        assert_eq!(first["results"][0]["name"], "Thriller");

        let second = handler
            .execute(arguments(json!({"term": "THRILLER", "types": ["songs"], "limit": 5})))
            .await
            .unwrap();
        assert_eq!(second["source"], "cache");
        assert_eq!(second["results"], first["results"]);
        assert_eq!(catalog.calls(), vec!["search:Thriller"]);
    }

    #[tokio::test]
    async fn defaults_apply_when_fields_are_omitted() {
        let catalog = Arc::new(FakeCatalog::default());
        let payload = handler(catalog)
            .execute(arguments(json!({"term": "Thriller"})))
            .await
            .unwrap();
        assert_eq!(payload["types"], json!(["songs"]));
        assert_eq!(payload["limit"], json!(tools::SEARCH_LIMIT_DEFAULT));
        assert_eq!(payload["offset"], json!(0));
    }

    #[tokio::test]
    async fn catalog_failures_are_not_cached() {
        let catalog = Arc::new(FakeCatalog::failing(HandlerFailure::new(
            FailureKind::ServerError,
            "MusicKit returned repeated server errors.",
        )));
        let cache = Arc::new(SearchCache::new(Duration::from_secs(300)));
        let handler = SearchMusic::new(catalog, cache.clone());
        let failure = handler
            .execute(arguments(json!({"term": "Thriller"})))
            .await
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::ServerError);
        assert!(cache.is_empty());
    }
}
