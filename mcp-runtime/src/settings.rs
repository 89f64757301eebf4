use std::path::PathBuf;
use std::time::Duration;

use cadenza_core::{FailureKind, HandlerFailure};
use clap::Args;

use crate::auth::TOKEN_TTL_MAX_SECS;
use crate::util::expand_home;

pub const DEFAULT_API_URL: &str = "https://api.music.apple.com";
pub const DEFAULT_STOREFRONT: &str = "us";
pub const DEFAULT_QUEUE_PLAYLIST: &str = "Cadenza Queue";

/// Runtime configuration. Every flag falls back to an environment variable,
/// so a `.env` file next to the binary is enough for local use.
#[derive(Args, Clone, Debug)]
pub struct Settings {
    /// Apple developer team identifier (developer token issuer)
    #[arg(long, env = "TEAM_ID")]
    pub team_id: Option<String>,
    /// MusicKit private key identifier
    #[arg(long, env = "KEY_ID")]
    pub key_id: Option<String>,
    /// Path to the MusicKit `.p8` private key (a leading `~/` is expanded)
    #[arg(long, env = "PRIVATE_KEY_PATH")]
    pub private_key_path: Option<String>,
    /// Catalog storefront code
    #[arg(long, env = "STOREFRONT", default_value = DEFAULT_STOREFRONT)]
    pub storefront: String,
    /// Music user token for library endpoints
    #[arg(long, env = "MUSIC_USER_TOKEN", hide_env_values = true)]
    pub music_user_token: Option<String>,
    /// Catalog API base URL
    #[arg(long, env = "CADENZA_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
    #[arg(long, env = "CADENZA_HTTP_TIMEOUT_SECS", default_value_t = 10)]
    pub http_timeout_secs: u64,
    /// Attempts per catalog request when the upstream answers 5xx or 429
    #[arg(long, env = "CADENZA_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: u32,
    #[arg(long, env = "CADENZA_SEARCH_CACHE_TTL_SECS", default_value_t = 300)]
    pub search_cache_ttl_secs: u64,
    /// Developer token lifetime in seconds
    #[arg(long, env = "CADENZA_TOKEN_TTL_SECS", default_value_t = 3600)]
    pub token_ttl_secs: u64,
    #[arg(long, env = "CADENZA_AUTOMATION_TIMEOUT_SECS", default_value_t = 15)]
    pub automation_timeout_secs: u64,
    /// Library playlist used as the play queue
    #[arg(long, env = "CADENZA_QUEUE_PLAYLIST", default_value = DEFAULT_QUEUE_PLAYLIST)]
    pub queue_playlist: String,
    /// osascript executable
    #[arg(long, env = "CADENZA_OSASCRIPT", default_value = "osascript")]
    pub osascript: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            team_id: None,
            key_id: None,
            private_key_path: None,
            storefront: DEFAULT_STOREFRONT.to_string(),
            music_user_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout_secs: 10,
            max_retries: 3,
            search_cache_ttl_secs: 300,
            token_ttl_secs: 3600,
            automation_timeout_secs: 15,
            queue_playlist: DEFAULT_QUEUE_PLAYLIST.to_string(),
            osascript: "osascript".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("MusicKit credentials are not fully configured (missing {})", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
    #[error("invalid setting '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl SettingsError {
    pub fn hint(&self) -> String {
        match self {
            SettingsError::MissingCredentials(missing) => format!(
                "Define {} in the environment or .env file.",
                missing.join(", ")
            ),
            SettingsError::Invalid { field, .. } => {
                format!("Fix '{field}' on the command line or in the environment.")
            }
        }
    }
}

impl From<SettingsError> for HandlerFailure {
    fn from(err: SettingsError) -> Self {
        let hint = err.hint();
        HandlerFailure::new(FailureKind::Configuration, err.to_string()).with_hint(hint)
    }
}

/// Material needed to mint developer tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCredentials {
    pub team_id: String,
    pub key_id: String,
    pub private_key_path: PathBuf,
}

impl Settings {
    /// Reject values that would make the runtime misbehave. Missing catalog
    /// credentials are not checked here; they surface per call.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.storefront.trim().is_empty() {
            return Err(invalid("storefront", "must not be empty"));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(invalid("api_url", "must be an http(s) URL"));
        }
        if self.max_retries == 0 {
            return Err(invalid("max_retries", "must be at least 1"));
        }
        if self.http_timeout_secs == 0 {
            return Err(invalid("http_timeout_secs", "must be at least 1"));
        }
        if self.automation_timeout_secs == 0 {
            return Err(invalid("automation_timeout_secs", "must be at least 1"));
        }
        if self.token_ttl_secs == 0 || self.token_ttl_secs > TOKEN_TTL_MAX_SECS {
            return Err(invalid(
                "token_ttl_secs",
                format!("must be between 1 and {TOKEN_TTL_MAX_SECS}"),
            ));
        }
        if self.queue_playlist.trim().is_empty() {
            return Err(invalid("queue_playlist", "must not be empty"));
        }
        Ok(())
    }

    pub fn catalog_credentials(&self) -> Result<CatalogCredentials, SettingsError> {
        let team_id = present(&self.team_id);
        let key_id = present(&self.key_id);
        let key_path = present(&self.private_key_path);

        let mut missing = Vec::new();
        if team_id.is_none() {
            missing.push("TEAM_ID");
        }
        if key_id.is_none() {
            missing.push("KEY_ID");
        }
        if key_path.is_none() {
            missing.push("PRIVATE_KEY_PATH");
        }

        match (team_id, key_id, key_path) {
            (Some(team_id), Some(key_id), Some(key_path)) => Ok(CatalogCredentials {
                team_id: team_id.to_string(),
                key_id: key_id.to_string(),
                private_key_path: expand_home(key_path),
            }),
            _ => Err(SettingsError::MissingCredentials(missing)),
        }
    }

    pub fn music_user_token(&self) -> Option<&str> {
        present(&self.music_user_token)
    }

    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn search_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.search_cache_ttl_secs)
    }

    pub fn automation_timeout(&self) -> Duration {
        Duration::from_secs(self.automation_timeout_secs)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(field: &'static str, message: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        message: message.into(),
    }
}
