//! Bearer-authenticated requests with single-shot credential refresh.
//!
//! The provider hands out a short-lived access token and a refresh token
//! that may itself rotate on every renewal. The client here issues one
//! request under the stored access token; a 401/403 triggers exactly one
//! refresh-persist-retry cycle, and the retried response is returned as-is.
//! Capping at one refresh keeps a dead refresh token from looping forever.

mod token_store;

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub use token_store::{TokenPair, TokenStore};

const OAUTH_ISSUER: &str = "https://login.immobilienscout24.de";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token file not found: {0} (run the login flow first)")]
    MissingTokenFile(PathBuf),
    #[error("could not access token file {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token file {path} is not a valid token pair: {source}")]
    MalformedTokenFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("token refresh rejected with status {status}")]
    RefreshRejected { status: u16, body: String },
    #[error("token refresh returned an unreadable body: {0}")]
    InvalidRefreshResponse(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

/// Issues requests under the stored bearer token, refreshing at most once.
pub struct AuthenticatedClient<T> {
    transport: T,
    store: TokenStore,
    config: ApiConfig,
}

impl<T: HttpTransport> AuthenticatedClient<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        let store = TokenStore::new(config.token_file.clone());
        Self {
            transport,
            store,
            config,
        }
    }

    pub fn token_store(&self) -> &TokenStore {
        &self.store
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The underlying transport, mainly so callers composing several API
    /// surfaces over one client can reach it.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` with the stored access token attached as a bearer
    /// credential.
    ///
    /// Non-auth responses (success or ordinary errors) are returned
    /// unchanged for the caller to interpret. A 401/403 triggers one
    /// refresh; the rotated pair is persisted before the retry, and the
    /// retried response is returned even if it failed again.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, AuthError> {
        let pair = self.store.load()?;

        let response = self.send_with_token(request, &pair.access_token)?;
        if !response.is_auth_failure() {
            if !response.is_success() {
                warn!(status = response.status, url = %request.url, "non-auth error response");
            }
            return Ok(response);
        }

        debug!(status = response.status, url = %request.url, "access token rejected");
        let rotated = self.refresh(&pair)?;
        info!(path = %self.store.path().display(), "persisted rotated token pair");

        self.send_with_token(request, &rotated.access_token)
            .map_err(AuthError::from)
    }

    fn send_with_token(
        &self,
        request: &HttpRequest,
        access_token: &str,
    ) -> Result<HttpResponse, TransportError> {
        let mut authorized = request.clone();
        authorized
            .headers
            .push(("Authorization".to_string(), format!("Bearer {access_token}")));
        self.transport.execute(&authorized)
    }

    /// Calls the provider's OAuth refresh endpoint once and persists the
    /// result. Missing fields in the response fall back to the previous
    /// values so a non-rotating provider does not wipe the stored pair.
    fn refresh(&self, current: &TokenPair) -> Result<TokenPair, AuthError> {
        info!("refreshing access tokens");

        let token_url = format!(
            "{OAUTH_ISSUER}/oauth2/{}/v1/token",
            self.config.auth_server_id
        );
        let request = HttpRequest::post(token_url)
            .header("Accept", "application/json")
            .header("User-Agent", self.config.oauth_user_agent.clone())
            .header("x-emb-id", device_request_id())
            .header("x-emb-st", device_request_millis().to_string())
            .form(vec![
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("client_id".to_string(), self.config.oauth_client_id.clone()),
                ("refresh_token".to_string(), current.refresh_token.clone()),
            ]);

        let response = self.transport.execute(&request)?;
        if !response.is_success() {
            return Err(AuthError::RefreshRejected {
                status: response.status,
                body: response.body,
            });
        }

        let tokens: RefreshResponse =
            serde_json::from_str(&response.body).map_err(AuthError::InvalidRefreshResponse)?;
        debug!(expires_in = ?tokens.expires_in, "refresh endpoint accepted");

        self.store.save(
            tokens
                .access_token
                .unwrap_or_else(|| current.access_token.clone()),
            tokens
                .refresh_token
                .unwrap_or_else(|| current.refresh_token.clone()),
        )
    }
}

/// Uppercase UUIDv4, matching the mobile app's `x-emb-id` header format.
pub(crate) fn device_request_id() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

pub(crate) fn device_request_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
