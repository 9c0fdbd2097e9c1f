//! Builder for creating Gemini client instances.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::auth::{auth_manager_for, AuthManager, ServiceAccountTokenProvider, TokenProvider};
use crate::config::{AuthMethod, Backend, Credentials, GeminiConfig, LogLevel};
use crate::error::{ConfigurationError, GeminiError, NetworkError};
use crate::observability::{create_default_stack, Logger, Tracer};
use crate::transport::{HttpTransport, ReqwestTransport};

use super::client::GeminiClientImpl;

/// Builder for creating a `GeminiClient` instance.
///
/// Provides a fluent API for configuring and constructing a Gemini API client.
///
/// # Example
///
/// ```no_run
/// use integrations_gemini_ai::GeminiClientBuilder;
/// use integrations_gemini_ai::config::Backend;
/// use secrecy::SecretString;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClientBuilder::new()
///     .backend(Backend::vertex_ai("us-central1", "my-project"))
///     .bearer_token(SecretString::new("ya29.token".into()))
///     .default_model("gemini-1.5-pro")
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct GeminiClientBuilder {
    backend: Option<Backend>,
    credentials: Option<Credentials>,
    base_url: Option<Url>,
    api_version: Option<String>,
    default_model: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    auth_method: Option<AuthMethod>,
    log_level: Option<LogLevel>,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    logger: Option<Arc<dyn Logger>>,
    tracer: Option<Arc<dyn Tracer>>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: GeminiConfig) -> Self {
        Self {
            backend: Some(config.backend),
            credentials: Some(config.credentials),
            base_url: config.base_url,
            api_version: Some(config.api_version),
            default_model: config.default_model,
            timeout: Some(config.timeout),
            connect_timeout: Some(config.connect_timeout),
            auth_method: Some(config.auth_method),
            log_level: Some(config.log_level),
            ..Self::default()
        }
    }

    /// Sets the backend.
    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the API key.
    pub fn api_key(self, key: SecretString) -> Self {
        self.credentials(Credentials::ApiKey(key))
    }

    /// Sets a static bearer token.
    pub fn bearer_token(self, token: SecretString) -> Self {
        self.credentials(Credentials::BearerToken(token))
    }

    /// Sets a provider for refreshable bearer tokens.
    pub fn token_provider(self, provider: Arc<dyn TokenProvider>) -> Self {
        self.credentials(Credentials::TokenProvider(provider))
    }

    /// Sets a service account as credentials.
    pub fn service_account(self, provider: Arc<ServiceAccountTokenProvider>) -> Self {
        self.credentials(Credentials::ServiceAccount(provider))
    }

    /// Sets the base URL replacing the backend's host.
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the base URL from a string.
    pub fn base_url_str(mut self, url: &str) -> Result<Self, GeminiError> {
        let parsed = Url::parse(url).map_err(|_| ConfigurationError::InvalidBaseUrl {
            url: url.to_string(),
        })?;
        self.base_url = Some(parsed);
        Ok(self)
    }

    /// Sets the API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the model used when a call does not name one.
    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Sets the authentication method for API keys.
    pub fn auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Sets the minimum level of the default logger.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets a custom HTTP transport (for testing).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth manager (for testing).
    pub fn auth_manager(mut self, auth_manager: Arc<dyn AuthManager>) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    /// Sets a custom logger (for testing).
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets a custom tracer (for testing).
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Builds the client.
    ///
    /// Without explicit credentials, `GEMINI_API_KEY` and then `GOOGLE_API_KEY`
    /// are used as the API key, and then the service account key file named by
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - no credentials are provided nor found in environment variables
    /// - the configuration is invalid
    /// - the HTTP transport cannot be created
    pub fn build(self) -> Result<GeminiClientImpl, GeminiError> {
        self.build_with_env(|name| std::env::var(name).ok())
    }

    pub(crate) fn build_with_env<F>(self, lookup: F) -> Result<GeminiClientImpl, GeminiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = match self.credentials {
            Some(credentials) => credentials,
            None => credentials_from_env(&lookup)?,
        };

        let mut config_builder = GeminiConfig::builder().credentials(credentials);
        if let Some(backend) = self.backend {
            config_builder = config_builder.backend(backend);
        }
        if let Some(base_url) = &self.base_url {
            config_builder = config_builder.base_url(base_url.as_str())?;
        }
        if let Some(version) = &self.api_version {
            config_builder = config_builder.api_version(version);
        }
        if let Some(model) = &self.default_model {
            config_builder = config_builder.default_model(model);
        }
        if let Some(timeout) = self.timeout {
            config_builder = config_builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config_builder = config_builder.connect_timeout(timeout);
        }
        if let Some(method) = self.auth_method {
            config_builder = config_builder.auth_method(method);
        }
        if let Some(level) = self.log_level {
            config_builder = config_builder.log_level(level);
        }
        let config = config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::new(config.timeout, config.connect_timeout).map_err(|e| {
                    GeminiError::Network(NetworkError::ConnectionFailed {
                        message: format!("Failed to create HTTP transport: {}", e),
                    })
                })?,
            ),
        };

        let auth_manager = self
            .auth_manager
            .unwrap_or_else(|| auth_manager_for(&config));

        let (default_logger, default_tracer) = create_default_stack("gemini", config.log_level);
        let logger = self.logger.unwrap_or(default_logger);
        let tracer = self.tracer.unwrap_or(default_tracer);

        logger.info(
            "Gemini client initialized",
            serde_json::json!({
                "service": config.backend.service_name().as_str(),
                "base_url": config.base_url.as_ref().map(Url::as_str),
                "api_version": config.api_version,
                "default_model": config.default_model,
                "auth_method": format!("{:?}", config.auth_method),
            }),
        );

        Ok(GeminiClientImpl::from_parts(
            config,
            transport,
            auth_manager,
            logger,
            tracer,
        ))
    }
}

fn credentials_from_env<F>(lookup: &F) -> Result<Credentials, GeminiError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("GEMINI_API_KEY").or_else(|| lookup("GOOGLE_API_KEY")) {
        return Ok(Credentials::ApiKey(SecretString::new(key)));
    }

    if let Some(path) = lookup("GOOGLE_APPLICATION_CREDENTIALS") {
        let provider = ServiceAccountTokenProvider::from_file(&path)?;
        return Ok(Credentials::ServiceAccount(Arc::new(provider)));
    }

    Err(ConfigurationError::MissingCredentials.into())
}
