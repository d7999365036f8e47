//! Bearer-token acquisition for the classifier endpoint.
//!
//! Tokens come from a [`TokenSource`] handed to the client at construction
//! time, so tests and fixed-token deployments can substitute their own.
//! The production source is [`TokenCache`]: a service-account provider
//! wrapped in a refresh-margin cache with single-flight refresh.
//!
//! The token contract is `gcp_auth::Token::as_str` and nothing else; there
//! is no fallback unwrapping of alternative wrapper shapes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ConfigurationError;

/// OAuth scope for the classification service.
pub const CLASSIFIER_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Refresh margin: refresh 60 seconds before expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Conservative TTL when the provider reports no usable expiry.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

/// Supplies bearer tokens for classifier calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// A currently valid bearer token string.
    async fn bearer_token(&self) -> Result<String, ConfigurationError>;
}

/// A fixed, pre-issued bearer token.
///
/// Used by deployments that pin a token via `BLENS_STATIC_BEARER_TOKEN`
/// and by tests.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn bearer_token(&self) -> Result<String, ConfigurationError> {
        Ok(self.token.clone())
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Service-account token cache with refresh margin and single-flight
/// refresh. On refresh failure an existing still-usable token is reused.
pub struct TokenCache {
    auth: Arc<dyn TokenProvider>,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Wrap a token provider.
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            auth,
            cache: RwLock::new(None),
        }
    }

    /// Build from `GOOGLE_APPLICATION_CREDENTIALS`.
    ///
    /// Fails fast, before any network call, when no credential
    /// configuration is present.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let service_account = CustomServiceAccount::from_env()
            .map_err(|e| ConfigurationError::Credentials(e.to_string()))?;

        match service_account {
            Some(sa) => Ok(Self::new(Arc::new(sa))),
            None => Err(ConfigurationError::Credentials(
                "GOOGLE_APPLICATION_CREDENTIALS not set; point it at a service account JSON file"
                    .to_string(),
            )),
        }
    }

    async fn refresh(&self, cache: &mut Option<CachedToken>) -> Result<String, ConfigurationError> {
        match self.auth.token(&[CLASSIFIER_SCOPE]).await {
            Ok(token) => {
                let access_token = token.as_str().to_string();

                // Prefer the provider's expiry, fall back to a conservative TTL.
                let expires_at = {
                    let now = Utc::now();
                    let exp = token.expires_at();
                    if exp > now {
                        match (exp - now).to_std() {
                            Ok(ttl) => Instant::now() + ttl,
                            Err(_) => Instant::now() + TOKEN_DEFAULT_TTL,
                        }
                    } else {
                        Instant::now()
                    }
                };

                *cache = Some(CachedToken {
                    access_token: access_token.clone(),
                    expires_at,
                });

                debug!("Refreshed classifier bearer token");
                Ok(access_token)
            }
            Err(e) => {
                if let Some(cached) = cache.as_ref() {
                    if cached.is_usable() {
                        warn!("Token refresh failed, reusing existing token: {}", e);
                        return Ok(cached.access_token.clone());
                    }
                }
                Err(ConfigurationError::Credentials(format!(
                    "failed to obtain access token: {e}"
                )))
            }
        }
    }
}

#[async_trait]
impl TokenSource for TokenCache {
    async fn bearer_token(&self) -> Result<String, ConfigurationError> {
        // Fast path under the read lock.
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.access_token.clone());
            }
        }

        self.refresh(&mut cache).await
    }
}
