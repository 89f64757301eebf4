use std::time::Duration;

use async_trait::async_trait;
use cadenza_core::{FailureKind, HandlerFailure};
use rand::Rng;
use reqwest::header::ACCEPT;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::{Value, json};

use crate::auth::DeveloperTokenMinter;
use crate::settings::Settings;
use crate::util::client;

const USER_TOKEN_HEADER: &str = "Music-User-Token";
const BACKOFF_CAP: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Artwork {
    pub url: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

/// A catalog resource flattened into the fields tools care about.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogItem {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre_names: Option<Vec<String>>,
    pub url: Option<String>,
    pub artwork: Artwork,
    pub duration_in_millis: Option<u64>,
    pub release_date: Option<String>,
    pub play_params: Option<Value>,
}

impl CatalogItem {
    pub fn from_resource(resource: &Value) -> Self {
        let attributes = resource.get("attributes").unwrap_or(&Value::Null);
        let text = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);
        let artwork = attributes.get("artwork").unwrap_or(&Value::Null);

        Self {
            id: text(resource.get("id")),
            kind: text(resource.get("type")),
            name: text(attributes.get("name")),
            artist: text(attributes.get("artistName")),
            album: text(attributes.get("albumName")),
            genre_names: attributes
                .get("genreNames")
                .and_then(Value::as_array)
                .map(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                }),
            url: text(attributes.get("url")),
            artwork: Artwork {
                url: text(artwork.get("url")),
                width: artwork.get("width").and_then(Value::as_u64),
                height: artwork.get("height").and_then(Value::as_u64),
            },
            duration_in_millis: attributes.get("durationInMillis").and_then(Value::as_u64),
            release_date: text(attributes.get("releaseDate")),
            play_params: attributes.get("playParams").filter(|v| !v.is_null()).cloned(),
        }
    }

    /// Catalog identifier from the play parameters, preferring `catalogId`.
    pub fn play_catalog_id(&self) -> Option<&str> {
        let params = self.play_params.as_ref()?;
        params
            .get("catalogId")
            .or_else(|| params.get("id"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub types: Vec<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedPlaylist {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

/// The music catalog as seen by tool handlers.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    fn storefront(&self) -> &str;

    /// Results from every requested type, in the order the types were given.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, HandlerFailure>;

    async fn song(&self, id: &str) -> Result<CatalogItem, HandlerFailure>;

    async fn add_to_library(&self, item_type: &str, id: &str) -> Result<(), HandlerFailure>;

    async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
        track_ids: &[String],
    ) -> Result<CreatedPlaylist, HandlerFailure>;
}

/// MusicKit REST client signing every call with a developer token.
pub struct MusicKitClient {
    http: reqwest::Client,
    base_url: String,
    storefront: String,
    tokens: Result<DeveloperTokenMinter, HandlerFailure>,
    user_token: Option<String>,
    max_retries: u32,
}

impl MusicKitClient {
    /// Missing credentials do not fail construction; every call reports them
    /// instead.
    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        let tokens = settings
            .catalog_credentials()
            .map_err(HandlerFailure::from)
            .and_then(|credentials| {
                DeveloperTokenMinter::new(credentials, settings.token_ttl_secs)
                    .map_err(HandlerFailure::from)
            });
        Ok(Self {
            http: client(settings.http_timeout())?,
            base_url: settings.api_base().to_string(),
            storefront: settings.storefront.trim().to_string(),
            tokens,
            user_token: settings.music_user_token().map(str::to_string),
            max_retries: settings.max_retries.max(1),
        })
    }

    fn developer_token(&self) -> Result<String, HandlerFailure> {
        match &self.tokens {
            Ok(minter) => minter.token().map_err(HandlerFailure::from),
            Err(failure) => Err(failure.clone()),
        }
    }

    fn user_token(&self) -> Result<&str, HandlerFailure> {
        self.user_token.as_deref().ok_or_else(|| {
            HandlerFailure::new(
                FailureKind::Configuration,
                "Library operations need a music user token.",
            )
            .with_hint("Set MUSIC_USER_TOKEN to a token obtained through MusicKit authorization.")
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, HandlerFailure> {
        let config_failure = || {
            HandlerFailure::new(
                FailureKind::Configuration,
                format!("Catalog base URL '{}' is not usable.", self.base_url),
            )
            .with_hint("Set CADENZA_API_URL to an absolute http(s) URL.")
        };
        let mut url = Url::parse(&self.base_url).map_err(|_| config_failure())?;
        url.path_segments_mut()
            .map_err(|_| config_failure())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: &[(String, String)],
        body: Option<&Value>,
        user_scoped: bool,
    ) -> Result<Value, HandlerFailure> {
        let token = self.developer_token()?;
        let user_token = if user_scoped {
            Some(self.user_token()?)
        } else {
            None
        };

        let mut last_failure = None;
        for attempt in 1..=self.max_retries {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&token)
                .header(ACCEPT, "application/json")
                .query(query);
            if let Some(user_token) = user_token {
                request = request.header(USER_TOKEN_HEADER, user_token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|err| transport_failure(&err))?;
            let status = response.status();
            let text = response.text().await.map_err(|err| transport_failure(&err))?;

            if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(
                    attempt,
                    max_attempts = self.max_retries,
                    status = status.as_u16(),
                    path = url.path(),
                    "catalog request failed"
                );
                last_failure = Some(exhausted_failure(status, &text));
                if attempt < self.max_retries {
                    tokio::time::sleep(backoff(attempt)).await;
                }
                continue;
            }

            if !status.is_success() {
                return Err(status_failure(status, &text));
            }
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&text).map_err(|err| {
                HandlerFailure::new(
                    FailureKind::InvalidResponse,
                    "MusicKit response was not valid JSON.",
                )
                .with_hint(err.to_string())
            });
        }

        Err(last_failure.unwrap_or_else(|| {
            HandlerFailure::new(
                FailureKind::ServerError,
                "MusicKit API request failed after retries.",
            )
        }))
    }
}

#[async_trait]
impl CatalogApi for MusicKitClient {
    fn storefront(&self) -> &str {
        &self.storefront
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<CatalogItem>, HandlerFailure> {
        let url = self.endpoint(&["v1", "catalog", &self.storefront, "search"])?;
        let params = vec![
            ("term".to_string(), query.term.clone()),
            ("types".to_string(), query.types.join(",")),
            ("limit".to_string(), query.limit.to_string()),
            ("offset".to_string(), query.offset.to_string()),
        ];
        let body = self.send(Method::GET, url, &params, None, false).await?;

        let results = body.get("results").unwrap_or(&Value::Null);
        let mut items = Vec::new();
        for kind in &query.types {
            let Some(data) = results
                .get(kind)
                .and_then(|bucket| bucket.get("data"))
                .and_then(Value::as_array)
            else {
                continue;
            };
            items.extend(data.iter().map(CatalogItem::from_resource));
        }
        Ok(items)
    }

    async fn song(&self, id: &str) -> Result<CatalogItem, HandlerFailure> {
        let url = self.endpoint(&["v1", "catalog", &self.storefront, "songs", id])?;
        let body = self
            .send(Method::GET, url, &[], None, false)
            .await
            .map_err(|failure| {
                if failure.kind == FailureKind::NotFound {
                    track_not_found()
                } else {
                    failure
                }
            })?;

        body.get("data")
            .and_then(Value::as_array)
            .and_then(|data| data.first())
            .map(CatalogItem::from_resource)
            .ok_or_else(track_not_found)
    }

    async fn add_to_library(&self, item_type: &str, id: &str) -> Result<(), HandlerFailure> {
        let url = self.endpoint(&["v1", "me", "library"])?;
        let params = vec![(format!("ids[{item_type}]"), id.to_string())];
        self.send(Method::POST, url, &params, None, true).await?;
        Ok(())
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: Option<&str>,
        track_ids: &[String],
    ) -> Result<CreatedPlaylist, HandlerFailure> {
        let url = self.endpoint(&["v1", "me", "library", "playlists"])?;
        let mut attributes = json!({ "name": name });
        if let Some(description) = description {
            attributes["description"] = json!(description);
        }
        let mut payload = json!({ "attributes": attributes });
        if !track_ids.is_empty() {
            let tracks: Vec<Value> = track_ids
                .iter()
                .map(|id| json!({ "id": id, "type": "songs" }))
                .collect();
            payload["relationships"] = json!({ "tracks": { "data": tracks } });
        }

        let body = self.send(Method::POST, url, &[], Some(&payload), true).await?;
        let created = body
            .get("data")
            .and_then(Value::as_array)
            .and_then(|data| data.first());
        let created_attributes = created.and_then(|item| item.get("attributes"));

        Ok(CreatedPlaylist {
            id: created
                .and_then(|item| item.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string),
            name: created_attributes
                .and_then(|attrs| attrs.get("name"))
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            description: created_attributes
                .and_then(|attrs| attrs.pointer("/description/standard"))
                .and_then(Value::as_str)
                .or(description)
                .map(str::to_string),
        })
    }
}

fn backoff(attempt: u32) -> Duration {
    let jitter = rand::thread_rng().gen_range(0.0..0.3);
    Duration::from_secs_f64(0.2 * attempt as f64 + jitter).min(BACKOFF_CAP)
}

fn track_not_found() -> HandlerFailure {
    HandlerFailure::not_found("The requested track was not found in the Apple Music catalog.")
        .with_hint("Verify the identifier and storefront settings.")
}

fn transport_failure(err: &reqwest::Error) -> HandlerFailure {
    if err.is_timeout() {
        return HandlerFailure::new(
            FailureKind::UpstreamTimeout,
            "MusicKit API request timed out.",
        )
        .with_hint("Retry later or raise CADENZA_HTTP_TIMEOUT_SECS.");
    }
    HandlerFailure::new(FailureKind::Network, "Unable to reach the MusicKit API.")
        .with_hint("Check network connectivity and Apple Music service status.")
}

/// `errors[0].detail`, falling back to `title`.
fn error_detail(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    let first = payload.get("errors")?.as_array()?.first()?;
    first
        .get("detail")
        .or_else(|| first.get("title"))
        .and_then(Value::as_str)
        .filter(|detail| !detail.is_empty())
        .map(str::to_string)
}

fn exhausted_failure(status: StatusCode, body: &str) -> HandlerFailure {
    let detail = error_detail(body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        let hint = detail.unwrap_or_else(|| "Wait a moment before retrying.".to_string());
        return HandlerFailure::new(
            FailureKind::RateLimited,
            "MusicKit kept rate limiting requests.",
        )
        .with_hint(hint);
    }
    let hint = match detail {
        Some(detail) => format!("Last status: {}. {detail}", status.as_u16()),
        None => format!("Last status: {}.", status.as_u16()),
    };
    HandlerFailure::new(
        FailureKind::ServerError,
        "MusicKit returned repeated server errors.",
    )
    .with_hint(hint)
}

fn status_failure(status: StatusCode, body: &str) -> HandlerFailure {
    let message = format!("MusicKit API returned status {}.", status.as_u16());
    let detail = error_detail(body);
    let (kind, fallback_hint) = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => (
            FailureKind::CatalogAuth,
            "Check TEAM_ID, KEY_ID and the private key; library calls also need MUSIC_USER_TOKEN.",
        ),
        StatusCode::NOT_FOUND => (
            FailureKind::NotFound,
            "Verify the identifier and storefront settings.",
        ),
        _ => (FailureKind::Domain, "Check the request parameters."),
    };
    HandlerFailure::new(kind, message).with_hint(detail.unwrap_or_else(|| fallback_hint.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_keys;
    use tempfile::NamedTempFile;
    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer, key: &NamedTempFile) -> Settings {
        Settings {
            team_id: Some("TEAM123456".to_string()),
            key_id: Some("KEY7654321".to_string()),
            private_key_path: Some(key.path().display().to_string()),
            music_user_token: Some("user-token-abc".to_string()),
            api_url: server.uri(),
            ..Settings::default()
        }
    }

    fn song_resource(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "type": "songs",
            "attributes": {
                "name": name,
                "artistName": "Michael Jackson",
                "albumName": "Thriller",
                "genreNames": ["Pop"],
                "url": format!("https://music.apple.com/us/song/{id}"),
                "artwork": {"url": "https://img/{w}x{h}.jpg", "width": 3000, "height": 3000, "bgColor": "000000"},
                "durationInMillis": 357000,
                "releaseDate": "1982-11-30",
                "playParams": {"id": id, "kind": "song"}
            }
        })
    }

    #[test]
    fn resource_normalization_keeps_known_fields() {
        let item = CatalogItem::from_resource(&song_resource("1440", "Billie Jean"));
        assert_eq!(item.id.as_deref(), Some("1440"));
        assert_eq!(item.kind.as_deref(), Some("songs"));
        assert_eq!(item.artist.as_deref(), Some("Michael Jackson"));
        assert_eq!(item.artwork.width, Some(3000));
        assert_eq!(item.duration_in_millis, Some(357000));
        assert_eq!(item.play_catalog_id(), Some("1440"));
        let value = item.to_value();
        assert_eq!(value["type"], "songs");
        assert!(value["artwork"].get("bgColor").is_none());
    }

    #[test]
    fn sparse_resource_normalizes_to_nulls() {
        let item = CatalogItem::from_resource(&json!({"id": "9", "type": "artists"}));
        assert_eq!(item.name, None);
        assert_eq!(item.artwork, Artwork::default());
        assert_eq!(item.play_catalog_id(), None);
    }

    #[test]
    fn error_detail_prefers_detail_then_title() {
        assert_eq!(
            error_detail(r#"{"errors":[{"title":"Forbidden","detail":"Invalid token"}]}"#),
            Some("Invalid token".to_string())
        );
        assert_eq!(
            error_detail(r#"{"errors":[{"title":"Forbidden"}]}"#),
            Some("Forbidden".to_string())
        );
        assert_eq!(error_detail("<html>"), None);
    }

    #[test]
    fn backoff_is_capped() {
        for attempt in 1..=20 {
            assert!(backoff(attempt) <= BACKOFF_CAP);
        }
        assert!(backoff(1) >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn search_flattens_buckets_in_requested_order() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/search"))
            .and(query_param("term", "Thriller"))
            .and(query_param("types", "songs,albums"))
            .and(query_param("limit", "5"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {
                    "albums": {"data": [{"id": "a1", "type": "albums", "attributes": {"name": "Thriller"}}]},
                    "songs": {"data": [song_resource("s1", "Thriller"), song_resource("s2", "Beat It")]}
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        let items = client
            .search(&SearchQuery {
                term: "Thriller".to_string(),
                types: vec!["songs".to_string(), "albums".to_string()],
                limit: 5,
                offset: 0,
            })
            .await
            .unwrap();
        let ids: Vec<_> = items.iter().filter_map(|i| i.id.as_deref()).collect();
        assert_eq!(ids, vec!["s1", "s2", "a1"]);
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_reported() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/1440"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        let failure = client.song("1440").await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::ServerError);
        assert_eq!(failure.hint.as_deref(), Some("Last status: 503."));
    }

    #[tokio::test]
    async fn transient_server_error_recovers() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/1440"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/1440"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [song_resource("1440", "Billie Jean")]})),
            )
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        let song = client.song("1440").await.unwrap();
        assert_eq!(song.name.as_deref(), Some("Billie Jean"));
    }

    #[tokio::test]
    async fn rate_limiting_is_classified() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let settings = Settings {
            max_retries: 1,
            ..settings_for(&server, &key)
        };
        let client = MusicKitClient::from_settings(&settings).unwrap();
        let failure = client.song("1440").await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::RateLimited);
    }

    #[tokio::test]
    async fn missing_song_and_rejected_auth_are_distinguished() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/forbidden"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{"title": "Unauthorized", "detail": "Authentication failed"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/empty"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        assert_eq!(
            client.song("missing").await.unwrap_err().kind,
            FailureKind::NotFound
        );
        assert_eq!(
            client.song("empty").await.unwrap_err().kind,
            FailureKind::NotFound
        );
        let auth = client.song("forbidden").await.unwrap_err();
        assert_eq!(auth.kind, FailureKind::CatalogAuth);
        assert_eq!(auth.hint.as_deref(), Some("Authentication failed"));
    }

    #[tokio::test]
    async fn identifiers_are_path_encoded() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("GET"))
            .and(path("/v1/catalog/us/songs/a%2Fb"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        assert_eq!(
            client.song("a/b").await.unwrap_err().kind,
            FailureKind::NotFound
        );
    }

    #[tokio::test]
    async fn missing_credentials_fail_without_network() {
        let server = MockServer::start().await;
        let client = MusicKitClient::from_settings(&Settings {
            api_url: server.uri(),
            ..Settings::default()
        })
        .unwrap();
        let failure = client.song("1440").await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Configuration);
        assert!(failure.hint.unwrap().contains("TEAM_ID"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn library_add_sends_user_token() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("POST"))
            .and(path("/v1/me/library"))
            .and(query_param("ids[songs]", "1440"))
            .and(header("Music-User-Token", "user-token-abc"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        client.add_to_library("songs", "1440").await.unwrap();
    }

    #[tokio::test]
    async fn library_calls_need_a_user_token() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        let settings = Settings {
            music_user_token: None,
            ..settings_for(&server, &key)
        };
        let client = MusicKitClient::from_settings(&settings).unwrap();
        let failure = client.add_to_library("songs", "1440").await.unwrap_err();
        assert_eq!(failure.kind, FailureKind::Configuration);
        assert!(failure.hint.unwrap().contains("MUSIC_USER_TOKEN"));
    }

    #[tokio::test]
    async fn playlist_creation_posts_attributes_and_tracks() {
        let server = MockServer::start().await;
        let key = test_keys::key_file();
        Mock::given(method("POST"))
            .and(path("/v1/me/library/playlists"))
            .and(body_json(json!({
                "attributes": {"name": "Road trip", "description": "Long drives"},
                "relationships": {"tracks": {"data": [
                    {"id": "1", "type": "songs"},
                    {"id": "2", "type": "songs"}
                ]}}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": [{
                    "id": "p.abc",
                    "type": "library-playlists",
                    "attributes": {"name": "Road trip", "description": {"standard": "Long drives"}}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = MusicKitClient::from_settings(&settings_for(&server, &key)).unwrap();
        let created = client
            .create_playlist(
                "Road trip",
                Some("Long drives"),
                &["1".to_string(), "2".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(
            created,
            CreatedPlaylist {
                id: Some("p.abc".to_string()),
                name: "Road trip".to_string(),
                description: Some("Long drives".to_string()),
            }
        );
    }
}
