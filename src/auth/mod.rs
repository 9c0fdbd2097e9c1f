//! Authentication module for Gemini API.
//!
//! The generative language API accepts an API key, either as the
//! `x-goog-api-key` header or as the `key` query parameter. Vertex AI expects
//! an OAuth2 access token in the `Authorization` header; tokens come from a
//! [`TokenProvider`] and are cached until they are about to expire.
//! [`ServiceAccountTokenProvider`] obtains them from a service account key.

mod service_account;

pub use service_account::{
    ServiceAccountKey, ServiceAccountTokenProvider, CLOUD_PLATFORM_SCOPE, DEFAULT_TOKEN_URI,
};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use crate::config::{AuthMethod, Credentials, GeminiConfig};
use crate::error::{AuthenticationError, GeminiResult};

/// Default margin before expiry at which a cached token is refreshed.
pub const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// An OAuth2 access token.
#[derive(Clone)]
pub struct AccessToken {
    /// The token value.
    pub token: SecretString,
    /// When the token stops being valid, if known.
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    /// Creates a token that never expires.
    pub fn new(token: SecretString) -> Self {
        Self { token, expires_at: None }
    }

    /// Creates a token that expires after `lifetime`.
    pub fn expiring_in(token: SecretString, lifetime: Duration) -> Self {
        Self {
            token,
            expires_at: Some(Instant::now() + lifetime),
        }
    }

    /// Whether the token expires within `margin` from now.
    pub fn expires_within(&self, margin: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => Instant::now() + margin >= expires_at,
            None => false,
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of OAuth2 access tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Fetch a fresh access token.
    async fn fetch_token(&self) -> GeminiResult<AccessToken>;
}

/// Token provider that always returns the same token.
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    /// Create a provider for a fixed token.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn fetch_token(&self) -> GeminiResult<AccessToken> {
        Ok(AccessToken::new(self.token.clone()))
    }
}

/// Authentication manager for Gemini API.
#[async_trait]
pub trait AuthManager: Send + Sync {
    /// Get the authentication header name and value.
    ///
    /// May fetch or refresh a token.
    async fn auth_header(&self) -> GeminiResult<Option<(String, String)>>;

    /// Get the authentication query parameter.
    fn auth_query_param(&self) -> Option<(String, String)>;
}

/// API key authentication manager.
pub struct ApiKeyAuthManager {
    api_key: SecretString,
    auth_method: AuthMethod,
}

impl ApiKeyAuthManager {
    /// Create a new API key auth manager.
    pub fn new(api_key: SecretString, auth_method: AuthMethod) -> Self {
        Self { api_key, auth_method }
    }
}

#[async_trait]
impl AuthManager for ApiKeyAuthManager {
    async fn auth_header(&self) -> GeminiResult<Option<(String, String)>> {
        Ok(match self.auth_method {
            AuthMethod::Header => Some((
                "x-goog-api-key".to_string(),
                self.api_key.expose_secret().to_string(),
            )),
            AuthMethod::QueryParam => None,
        })
    }

    fn auth_query_param(&self) -> Option<(String, String)> {
        match self.auth_method {
            AuthMethod::QueryParam => Some((
                "key".to_string(),
                self.api_key.expose_secret().to_string(),
            )),
            AuthMethod::Header => None,
        }
    }
}

/// Bearer token authentication manager with token caching.
pub struct BearerTokenAuthManager {
    provider: Arc<dyn TokenProvider>,
    cached: Mutex<Option<AccessToken>>,
    refresh_margin: Duration,
}

impl BearerTokenAuthManager {
    /// Create a new bearer token auth manager.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            cached: Mutex::new(None),
            refresh_margin: DEFAULT_REFRESH_MARGIN,
        }
    }

    /// Set how long before expiry a cached token is refreshed.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    async fn current_token(&self) -> GeminiResult<SecretString> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.expires_within(self.refresh_margin) {
                return Ok(token.token.clone());
            }
            tracing::debug!("Access token close to expiry, refreshing");
        }

        let token = self.provider.fetch_token().await?;
        if token.token.expose_secret().trim().is_empty() {
            return Err(AuthenticationError::InvalidCredentials {
                message: "token provider returned an empty access token".to_string(),
            }
            .into());
        }
        let value = token.token.clone();
        *cached = Some(token);
        Ok(value)
    }
}

#[async_trait]
impl AuthManager for BearerTokenAuthManager {
    async fn auth_header(&self) -> GeminiResult<Option<(String, String)>> {
        let token = self.current_token().await?;
        Ok(Some((
            "Authorization".to_string(),
            format!("Bearer {}", token.expose_secret()),
        )))
    }

    fn auth_query_param(&self) -> Option<(String, String)> {
        None
    }
}

/// Create the auth manager matching the configured credentials.
pub fn auth_manager_for(config: &GeminiConfig) -> Arc<dyn AuthManager> {
    match &config.credentials {
        Credentials::ApiKey(key) => Arc::new(ApiKeyAuthManager::new(key.clone(), config.auth_method)),
        Credentials::BearerToken(token) => Arc::new(BearerTokenAuthManager::new(Arc::new(
            StaticTokenProvider::new(token.clone()),
        ))),
        Credentials::TokenProvider(provider) => {
            Arc::new(BearerTokenAuthManager::new(Arc::clone(provider)))
        }
        Credentials::ServiceAccount(provider) => {
            Arc::new(BearerTokenAuthManager::new(Arc::clone(provider) as Arc<dyn TokenProvider>))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeminiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        fetches: AtomicUsize,
        lifetime: Duration,
    }

    #[async_trait]
    impl TokenProvider for CountingProvider {
        async fn fetch_token(&self) -> GeminiResult<AccessToken> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(AccessToken::expiring_in(
                SecretString::new(format!("token-{}", n)),
                self.lifetime,
            ))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl TokenProvider for FailingProvider {
        async fn fetch_token(&self) -> GeminiResult<AccessToken> {
            Err(AuthenticationError::TokenUnavailable {
                message: "metadata server unreachable".to_string(),
            }
            .into())
        }
    }

    #[tokio::test]
    async fn test_header_auth() {
        let manager = ApiKeyAuthManager::new(
            SecretString::new("test-key".into()),
            AuthMethod::Header,
        );

        let header = manager.auth_header().await.unwrap();
        let (name, value) = header.unwrap();
        assert_eq!(name, "x-goog-api-key");
        assert_eq!(value, "test-key");

        assert!(manager.auth_query_param().is_none());
    }

    #[tokio::test]
    async fn test_query_param_auth() {
        let manager = ApiKeyAuthManager::new(
            SecretString::new("test-key".into()),
            AuthMethod::QueryParam,
        );

        assert!(manager.auth_header().await.unwrap().is_none());

        let (name, value) = manager.auth_query_param().unwrap();
        assert_eq!(name, "key");
        assert_eq!(value, "test-key");
    }

    #[tokio::test]
    async fn test_bearer_token_is_cached() {
        let provider = Arc::new(CountingProvider {
            fetches: AtomicUsize::new(0),
            lifetime: Duration::from_secs(3600),
        });
        let manager = BearerTokenAuthManager::new(provider.clone());

        let first = manager.auth_header().await.unwrap().unwrap();
        let second = manager.auth_header().await.unwrap().unwrap();

        assert_eq!(first, ("Authorization".to_string(), "Bearer token-1".to_string()));
        assert_eq!(first, second);
        assert_eq!(provider.fetches.load(Ordering::SeqCst), 1);
        assert!(manager.auth_query_param().is_none());
    }

    #[tokio::test]
    async fn test_bearer_token_refreshed_near_expiry() {
        let provider = Arc::new(CountingProvider {
            fetches: AtomicUsize::new(0),
            lifetime: Duration::from_secs(30),
        });
        let manager = BearerTokenAuthManager::new(provider.clone());

        manager.auth_header().await.unwrap();
        let (_, value) = manager.auth_header().await.unwrap().unwrap();

        assert_eq!(value, "Bearer token-2");
        assert_eq!(provider.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_token_provider_failure() {
        let manager = BearerTokenAuthManager::new(Arc::new(FailingProvider));
        let result = manager.auth_header().await;

        assert!(matches!(
            result,
            Err(GeminiError::Authentication(AuthenticationError::TokenUnavailable { .. }))
        ));
    }

    #[tokio::test]
    async fn test_empty_token_is_rejected() {
        let manager = BearerTokenAuthManager::new(Arc::new(StaticTokenProvider::new(
            SecretString::new(String::new()),
        )));

        let result = manager.auth_header().await;

        assert!(matches!(
            result,
            Err(GeminiError::Authentication(AuthenticationError::InvalidCredentials { .. }))
        ));
    }

    #[tokio::test]
    async fn test_auth_manager_for_bearer_credentials() {
        let config = GeminiConfig::builder()
            .bearer_token(SecretString::new("static-token".into()))
            .build()
            .unwrap();

        let manager = auth_manager_for(&config);
        let (name, value) = manager.auth_header().await.unwrap().unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer static-token");
    }
}
