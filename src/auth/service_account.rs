//! Service account credentials for Vertex AI.
//!
//! A service account key file is exchanged for access tokens with the OAuth2
//! JWT bearer grant: a JWT signed with the key's RS256 private key is posted
//! to the key's token endpoint, which answers with a short-lived token.
//!
//! ```no_run
//! use std::sync::Arc;
//! use integrations_gemini_ai::auth::ServiceAccountTokenProvider;
//! use integrations_gemini_ai::config::{Backend, GeminiConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = ServiceAccountTokenProvider::from_file("/secrets/key.json")?;
//! let project_id = provider.project_id().unwrap_or("my-project").to_string();
//!
//! let config = GeminiConfig::builder()
//!     .backend(Backend::vertex_ai("us-east4", project_id))
//!     .service_account(Arc::new(provider))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{AccessToken, TokenProvider};
use crate::error::{AuthenticationError, GeminiError, GeminiResult};

/// Default OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scope granting access to Vertex AI.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Lifetime requested for the signed assertion.
const JWT_LIFETIME_SECONDS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// The fields of a service account JSON key this crate uses.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Credential type, `service_account` for keys of this kind.
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Project owning the service account.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Id of the private key, sent as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM encoded RSA private key.
    pub private_key: SecretString,
    /// Service account e-mail, the JWT issuer.
    pub client_email: String,
    /// Token endpoint.
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parses a JSON key.
    pub fn from_json(json: &str) -> GeminiResult<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            invalid_credentials(format!("Invalid service account key: {}", e))
        })?;

        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(invalid_credentials(format!(
                "Unsupported credentials type '{}', expected 'service_account'",
                other
            ))),
        }
    }

    /// Reads and parses a JSON key file.
    pub fn from_file(path: impl AsRef<Path>) -> GeminiResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            invalid_credentials(format!(
                "Cannot read service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) iss: String,
    pub(crate) scope: String,
    pub(crate) aud: String,
    pub(crate) exp: i64,
    pub(crate) iat: i64,
}

/// Token provider exchanging a signed JWT for access tokens.
///
/// Each call to `fetch_token` performs one exchange. Caching is left to
/// [`BearerTokenAuthManager`](super::BearerTokenAuthManager).
pub struct ServiceAccountTokenProvider {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    token_url: String,
    http_client: Client,
}

impl ServiceAccountTokenProvider {
    /// Creates a provider for `key` with the cloud-platform scope.
    pub fn new(key: ServiceAccountKey) -> Self {
        let token_url = key
            .token_uri
            .clone()
            .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string());

        Self {
            key,
            scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
            token_url,
            http_client: Client::new(),
        }
    }

    /// Creates a provider from a JSON key.
    pub fn from_json(json: &str) -> GeminiResult<Self> {
        ServiceAccountKey::from_json(json).map(Self::new)
    }

    /// Creates a provider from a JSON key file.
    pub fn from_file(path: impl AsRef<Path>) -> GeminiResult<Self> {
        ServiceAccountKey::from_file(path).map(Self::new)
    }

    /// Replaces the requested scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets a custom token URL (for testing or custom OAuth2 servers).
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Project named in the key, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.key
            .project_id
            .as_deref()
            .filter(|project| !project.trim().is_empty())
    }

    /// Service account e-mail.
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub(crate) fn create_jwt(&self) -> GeminiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.token_url.clone(),
            exp: now + JWT_LIFETIME_SECONDS,
            iat: now,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let key = EncodingKey::from_rsa_pem(self.key.private_key.expose_secret().as_bytes())
            .map_err(|e| invalid_credentials(format!("Invalid private key: {}", e)))?;

        encode(&header, &claims, &key)
            .map_err(|e| invalid_credentials(format!("JWT encoding failed: {}", e)))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    async fn fetch_token(&self) -> GeminiResult<AccessToken> {
        #[derive(Serialize)]
        struct TokenRequest<'a> {
            grant_type: &'a str,
            assertion: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            #[serde(default)]
            expires_in: Option<u64>,
        }

        let jwt = self.create_jwt()?;
        let request = TokenRequest {
            grant_type: JWT_BEARER_GRANT,
            assertion: &jwt,
        };

        tracing::debug!(
            client_email = %self.key.client_email,
            token_url = %self.token_url,
            "Exchanging service account assertion for an access token"
        );

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| token_unavailable(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(token_unavailable(format!(
                "Token exchange failed with status {}: {}",
                status.as_u16(),
                text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| token_unavailable(format!("Failed to parse token response: {}", e)))?;

        let secret = SecretString::new(token.access_token);
        Ok(match token.expires_in {
            Some(seconds) => AccessToken::expiring_in(secret, Duration::from_secs(seconds)),
            None => AccessToken::new(secret),
        })
    }
}

impl std::fmt::Debug for ServiceAccountTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountTokenProvider")
            .field("key", &self.key)
            .field("scopes", &self.scopes)
            .field("token_url", &self.token_url)
            .finish()
    }
}

fn invalid_credentials(message: String) -> GeminiError {
    AuthenticationError::InvalidCredentials { message }.into()
}

fn token_unavailable(message: String) -> GeminiError {
    AuthenticationError::TokenUnavailable { message }.into()
}
