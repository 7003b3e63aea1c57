//! Shared authorized HTTP transport for the Drive and Sheets clients.
//!
//! Both clients ride on one tuned reqwest client and one token cache, so a
//! single service account session covers the whole run.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::error::{GoogleApiError, GoogleResult};
use crate::retry::RetryConfig;
use crate::token_cache::TokenCache;

// =============================================================================
// Configuration
// =============================================================================

/// HTTP transport configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Create config from environment variables.
    ///
    /// The request timeout default is generous because media downloads go
    /// through the same client as metadata calls.
    pub fn from_env() -> Self {
        let timeout_secs: u64 = std::env::var("GOOGLE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300);

        let connect_timeout_secs: u64 = std::env::var("GOOGLE_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        Self {
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            retry: RetryConfig::from_env(),
        }
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Authorized HTTP transport: tuned client + shared token cache.
#[derive(Clone)]
pub struct AuthorizedHttp {
    http: Client,
    token_cache: Arc<TokenCache>,
    pub(crate) retry: RetryConfig,
}

impl AuthorizedHttp {
    /// Create a new transport.
    pub fn new(token_cache: Arc<TokenCache>, config: HttpConfig) -> GoogleResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("vidsheet-google/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(GoogleApiError::Network)?;

        Ok(Self {
            http,
            token_cache,
            retry: config.retry,
        })
    }

    fn is_access_token_expired(body: &str) -> bool {
        body.contains("ACCESS_TOKEN_EXPIRED")
            || body.contains("\"UNAUTHENTICATED\"")
            || body.contains("Invalid Credentials")
    }

    /// Send a request, re-authenticating once if the access token expired
    /// mid-flight.
    ///
    /// `build` receives the client and a bearer token and must produce the
    /// full request; it is invoked again with a fresh token after a 401
    /// that carries an expired-token body.
    pub async fn send<F>(&self, build: F) -> GoogleResult<Response>
    where
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        let token = self.token_cache.get_token().await?;
        let response = build(&self.http, &token).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            if Self::is_access_token_expired(&body) {
                self.token_cache.invalidate().await;
                let token = self.token_cache.get_token().await?;
                return Ok(build(&self.http, &token).send().await?);
            }
            return Err(GoogleApiError::from_http_status(401, body));
        }

        Ok(response)
    }
}

/// Turn a non-success response into an error, honoring Retry-After on 429.
pub(crate) async fn error_from_response(url: &str, response: Response) -> GoogleApiError {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_ms = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(|secs| secs * 1000)
            .unwrap_or(1000);
        return GoogleApiError::RateLimited(retry_after_ms);
    }

    let body = response.text().await.unwrap_or_default();
    GoogleApiError::from_http_status(status.as_u16(), format!("{} failed: {}", url, body))
}
