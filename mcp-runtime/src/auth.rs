use std::path::PathBuf;
use std::sync::Mutex;

use cadenza_core::{FailureKind, HandlerFailure};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::settings::CatalogCredentials;

/// Apple caps developer tokens at six months.
pub const TOKEN_TTL_MAX_SECS: u64 = 15_777_000;
const REFRESH_BUFFER_SECS: i64 = 5 * 60;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("developer token ttl must be between 1 and {TOKEN_TTL_MAX_SECS} seconds, got {0}")]
    InvalidTtl(u64),
    #[error("failed to read private key at {}: {source}", .path.display())]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("private key is not a valid EC key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign developer token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for HandlerFailure {
    fn from(err: TokenError) -> Self {
        match &err {
            TokenError::InvalidTtl(_) => {
                HandlerFailure::new(FailureKind::Configuration, err.to_string())
                    .with_hint("Set CADENZA_TOKEN_TTL_SECS to at most 15777000.")
            }
            TokenError::KeyRead { .. } | TokenError::InvalidKey(_) => {
                HandlerFailure::new(FailureKind::Configuration, err.to_string()).with_hint(
                    "Point PRIVATE_KEY_PATH at the .p8 key downloaded from the Apple developer portal.",
                )
            }
            TokenError::Signing(_) => HandlerFailure::new(FailureKind::CatalogAuth, err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: i64,
}

/// Mints ES256 developer tokens and reuses them until they get close to
/// expiry.
#[derive(Debug)]
pub struct DeveloperTokenMinter {
    credentials: CatalogCredentials,
    ttl_secs: u64,
    cached: Mutex<Option<CachedToken>>,
}

impl DeveloperTokenMinter {
    pub fn new(credentials: CatalogCredentials, ttl_secs: u64) -> Result<Self, TokenError> {
        if ttl_secs == 0 || ttl_secs > TOKEN_TTL_MAX_SECS {
            return Err(TokenError::InvalidTtl(ttl_secs));
        }
        Ok(Self {
            credentials,
            ttl_secs,
            cached: Mutex::new(None),
        })
    }

    pub fn token(&self) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = cached.as_ref() {
            if now + REFRESH_BUFFER_SECS < current.expires_at {
                return Ok(current.token.clone());
            }
        }

        let minted = self.mint(now)?;
        let token = minted.token.clone();
        *cached = Some(minted);
        Ok(token)
    }

    fn mint(&self, now: i64) -> Result<CachedToken, TokenError> {
        let path = &self.credentials.private_key_path;
        let pem = std::fs::read(path).map_err(|source| TokenError::KeyRead {
            path: path.clone(),
            source,
        })?;
        let key = EncodingKey::from_ec_pem(&pem).map_err(TokenError::InvalidKey)?;

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.credentials.key_id.clone());
        let expires_at = now + self.ttl_secs as i64;
        let claims = Claims {
            iss: &self.credentials.team_id,
            iat: now,
            exp: expires_at,
        };
        let token = jsonwebtoken::encode(&header, &claims, &key).map_err(TokenError::Signing)?;

        tracing::debug!(
            fingerprint = %fingerprint(&token),
            expires_at,
            "minted developer token"
        );
        Ok(CachedToken { token, expires_at })
    }
}

/// Short SHA-256 prefix, safe to log in place of a token.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}
