//! Token caching for Google API authentication.
//!
//! Provides a thread-safe, async-aware token cache with:
//! - Refresh margin to avoid token expiry during requests
//! - Single-flight pattern to prevent redundant refreshes
//! - Graceful fallback to an existing valid token on refresh failure

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{GoogleApiError, GoogleResult};

// =============================================================================
// Constants
// =============================================================================

/// Refresh margin: refresh the token 60 seconds before expiry.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Conservative token TTL when expiry is unknown (50 minutes).
/// OAuth tokens are typically valid for 60 minutes.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

/// OAuth scope for Drive listing and media download.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// OAuth scope for Sheets reads and writes.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Scopes requested for every token. Both clients share one cache, so the
/// token covers Drive and Sheets at once.
pub const SCOPES: &[&str] = &[DRIVE_SCOPE, SHEETS_SCOPE];

// =============================================================================
// Token Cache
// =============================================================================

/// Cached token with expiration tracking.
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    /// Check if the token is still valid with refresh margin.
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    /// Check if the token is technically still usable (even if refresh is due).
    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Thread-safe token cache with single-flight refresh.
pub struct TokenCache {
    auth: Option<Arc<dyn TokenProvider>>,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a new token cache backed by a token provider.
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            auth: Some(auth),
            cache: RwLock::new(None),
        }
    }

    /// Create a cache pre-seeded with a fixed token and no provider.
    ///
    /// For use when the token is obtained elsewhere, and in tests. The
    /// seeded token is treated as valid for one hour.
    pub fn with_static_token(token: impl Into<String>) -> Self {
        Self {
            auth: None,
            cache: RwLock::new(Some(CachedToken {
                access_token: token.into(),
                expires_at: Instant::now() + Duration::from_secs(3600),
            })),
        }
    }

    /// Invalidate the cached token.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        *cache = None;
    }

    /// Get a valid access token, refreshing if necessary.
    ///
    /// Fast path: return the cached token while it is still valid.
    /// Slow path: acquire the write lock and refresh (double-check first).
    /// Fallback: on refresh failure, reuse an existing still-usable token.
    pub async fn get_token(&self) -> GoogleResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;

        // Another task may have refreshed while we waited
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.access_token.clone());
            }
        }

        self.refresh_token(&mut cache).await
    }

    /// Refresh the token, updating the cache.
    async fn refresh_token(&self, cache: &mut Option<CachedToken>) -> GoogleResult<String> {
        let Some(auth) = self.auth.as_ref() else {
            return Err(GoogleApiError::auth_error(
                "Token expired and no token provider is configured",
            ));
        };

        match auth.token(SCOPES).await {
            Ok(token) => {
                let access_token = token.as_str().to_string();

                // Prefer the real expiry from gcp_auth, fall back to a
                // conservative default.
                let expires_at = {
                    let now = Utc::now();
                    let exp = token.expires_at();

                    if exp > now {
                        match (exp - now).to_std() {
                            Ok(ttl) => Instant::now() + ttl,
                            Err(_) => Instant::now() + TOKEN_DEFAULT_TTL,
                        }
                    } else {
                        // An already-expired token forces a refresh on the
                        // next request.
                        Instant::now()
                    }
                };

                *cache = Some(CachedToken {
                    access_token: access_token.clone(),
                    expires_at,
                });

                debug!("Refreshed Google auth token");
                Ok(access_token)
            }
            Err(e) => {
                if let Some(cached) = cache.as_ref() {
                    if cached.is_usable() {
                        warn!("Token refresh failed, using existing token: {}", e);
                        return Ok(cached.access_token.clone());
                    }
                }

                Err(GoogleApiError::auth_error(format!(
                    "Failed to obtain auth token: {}",
                    e
                )))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_refresh_margin() {
        assert_eq!(TOKEN_REFRESH_MARGIN, Duration::from_secs(60));
    }

    #[test]
    fn test_token_default_ttl() {
        assert_eq!(TOKEN_DEFAULT_TTL, Duration::from_secs(50 * 60));
    }

    #[test]
    fn test_scopes_cover_drive_and_sheets() {
        assert!(SCOPES.contains(&DRIVE_SCOPE));
        assert!(SCOPES.contains(&SHEETS_SCOPE));
    }

    #[tokio::test]
    async fn test_static_token_is_served_without_provider() {
        let cache = TokenCache::with_static_token("fixed-token");
        assert_eq!(cache.get_token().await.unwrap(), "fixed-token");
    }

    #[tokio::test]
    async fn test_invalidated_static_token_errors() {
        let cache = TokenCache::with_static_token("fixed-token");
        cache.invalidate().await;
        let err = cache.get_token().await.unwrap_err();
        assert!(matches!(err, GoogleApiError::AuthError(_)));
    }
}
