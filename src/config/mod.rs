//! Configuration types for the Gemini API client.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::auth::{ServiceAccountTokenProvider, TokenProvider};
use crate::error::{ConfigurationError, GeminiError};

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default request timeout (120 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Authentication method for API key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMethod {
    /// Use x-goog-api-key header (recommended).
    #[default]
    Header,
    /// Use ?key= query parameter.
    QueryParam,
}

/// Log level for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

/// Textual service names accepted in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceName {
    /// `generative-language-api`
    GenerativeLanguage,
    /// `vertex-ai-api`
    VertexAi,
}

impl ServiceName {
    /// The configuration string for this service.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceName::GenerativeLanguage => "generative-language-api",
            ServiceName::VertexAi => "vertex-ai-api",
        }
    }
}

impl FromStr for ServiceName {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generative-language-api" => Ok(ServiceName::GenerativeLanguage),
            "vertex-ai-api" => Ok(ServiceName::VertexAi),
            other => Err(ConfigurationError::UnsupportedService {
                service: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend that serves generation requests.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Backend {
    /// Google AI generative language API.
    #[default]
    GenerativeLanguage,
    /// Vertex AI, addressed by region and project.
    VertexAi {
        /// Region such as `us-east4`.
        region: String,
        /// Google Cloud project id.
        project_id: String,
    },
}

impl Backend {
    /// Creates a Vertex AI backend.
    pub fn vertex_ai(region: impl Into<String>, project_id: impl Into<String>) -> Self {
        Backend::VertexAi {
            region: region.into(),
            project_id: project_id.into(),
        }
    }

    /// The service name of this backend.
    pub fn service_name(&self) -> ServiceName {
        match self {
            Backend::GenerativeLanguage => ServiceName::GenerativeLanguage,
            Backend::VertexAi { .. } => ServiceName::VertexAi,
        }
    }
}

/// Credentials used to authenticate requests.
#[derive(Clone)]
pub enum Credentials {
    /// A static API key.
    ApiKey(SecretString),
    /// A static OAuth2 access token.
    BearerToken(SecretString),
    /// A source of refreshable access tokens.
    TokenProvider(Arc<dyn TokenProvider>),
    /// A service account key, which also names a default project.
    ServiceAccount(Arc<ServiceAccountTokenProvider>),
}

impl Credentials {
    /// Project id carried by the credentials, if any.
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Credentials::ServiceAccount(provider) => provider.project_id(),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey([REDACTED])"),
            Credentials::BearerToken(_) => f.write_str("BearerToken([REDACTED])"),
            Credentials::TokenProvider(_) => f.write_str("TokenProvider(..)"),
            Credentials::ServiceAccount(provider) => {
                write!(f, "ServiceAccount({})", provider.client_email())
            }
        }
    }
}

/// Configuration for the Gemini client.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// Backend serving the requests.
    pub backend: Backend,
    /// Credentials (required).
    pub credentials: Credentials,
    /// API version.
    pub api_version: String,
    /// Replaces the backend host when set.
    pub base_url: Option<Url>,
    /// Model used when a call does not name one.
    pub default_model: Option<String>,
    /// Default timeout for requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Log level.
    pub log_level: LogLevel,
    /// Authentication method for API keys.
    pub auth_method: AuthMethod,
}

impl GeminiConfig {
    /// Create a new configuration builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, GeminiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, GeminiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
            builder = builder.credentials(Credentials::ApiKey(SecretString::new(key)));
        } else if let Some(token) = lookup("GEMINI_ACCESS_TOKEN") {
            builder = builder.credentials(Credentials::BearerToken(SecretString::new(token)));
        } else if let Some(path) = lookup("GEMINI_CREDENTIALS_FILE")
            .or_else(|| lookup("GOOGLE_APPLICATION_CREDENTIALS"))
        {
            let provider = ServiceAccountTokenProvider::from_file(&path)?;
            builder = builder.service_account(Arc::new(provider));
        }

        let service = match lookup("GEMINI_SERVICE") {
            Some(name) => name.parse::<ServiceName>()?,
            None => ServiceName::GenerativeLanguage,
        };

        builder = match service {
            ServiceName::GenerativeLanguage => builder.backend(Backend::GenerativeLanguage),
            ServiceName::VertexAi => {
                let region = lookup("GEMINI_REGION").ok_or(ConfigurationError::MissingRegion)?;
                let project_id = lookup("GEMINI_PROJECT_ID")
                    .or_else(|| lookup("GOOGLE_CLOUD_PROJECT"))
                    .unwrap_or_default();
                builder.backend(Backend::vertex_ai(region, project_id))
            }
        };

        if let Some(version) = lookup("GEMINI_API_VERSION") {
            builder = builder.api_version(&version);
        }

        if let Some(model) = lookup("GEMINI_MODEL") {
            builder = builder.default_model(&model);
        }

        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            builder = builder.base_url(&base_url)?;
        }

        if let Some(raw) = lookup("GEMINI_TIMEOUT_SECS") {
            let timeout_secs: u64 = raw.trim().parse().map_err(|_| {
                ConfigurationError::InvalidConfiguration {
                    message: format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw),
                }
            })?;
            builder = builder.timeout(Duration::from_secs(timeout_secs));
        }

        builder.build()
    }
}

/// Builder for GeminiConfig.
#[derive(Default)]
pub struct GeminiConfigBuilder {
    backend: Option<Backend>,
    credentials: Option<Credentials>,
    api_version: Option<String>,
    base_url: Option<Url>,
    default_model: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    log_level: Option<LogLevel>,
    auth_method: Option<AuthMethod>,
}

impl GeminiConfigBuilder {
    /// Set the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set an API key as credentials.
    pub fn api_key(self, api_key: SecretString) -> Self {
        self.credentials(Credentials::ApiKey(api_key))
    }

    /// Set a static bearer token as credentials.
    pub fn bearer_token(self, token: SecretString) -> Self {
        self.credentials(Credentials::BearerToken(token))
    }

    /// Set a token provider as credentials.
    pub fn token_provider(self, provider: Arc<dyn TokenProvider>) -> Self {
        self.credentials(Credentials::TokenProvider(provider))
    }

    /// Set a service account as credentials.
    ///
    /// A Vertex AI backend without a project id uses the key's project.
    pub fn service_account(self, provider: Arc<ServiceAccountTokenProvider>) -> Self {
        self.credentials(Credentials::ServiceAccount(provider))
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: &str) -> Result<Self, GeminiError> {
        let url = Url::parse(base_url).map_err(|_| ConfigurationError::InvalidBaseUrl {
            url: base_url.to_string(),
        })?;
        self.base_url = Some(url);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the default model.
    pub fn default_model(mut self, model: &str) -> Self {
        self.default_model = Some(model.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the authentication method.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<GeminiConfig, GeminiError> {
        let credentials = self.credentials
            .ok_or(ConfigurationError::MissingCredentials)?;

        let mut backend = self.backend.unwrap_or_default();
        if let Backend::VertexAi { region, project_id } = &mut backend {
            if region.trim().is_empty() {
                return Err(ConfigurationError::MissingRegion.into());
            }
            if project_id.trim().is_empty() {
                *project_id = credentials
                    .project_id()
                    .ok_or(ConfigurationError::MissingProjectId)?
                    .to_string();
            }
        }

        Ok(GeminiConfig {
            backend,
            credentials,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            base_url: self.base_url,
            default_model: self.default_model,
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            log_level: self.log_level.unwrap_or_default(),
            auth_method: self.auth_method.unwrap_or_default(),
        })
    }
}
