//! Main client implementation for Gemini API.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::GeminiConfig;
use crate::error::GeminiError;
use crate::observability::{Logger, Tracer};
use crate::services::{ContentService, ContentServiceImpl};
use crate::transport::HttpTransport;

use super::builder::GeminiClientBuilder;
use super::traits::{GeminiClient, GeminiClientFactory};

/// Implementation of the Gemini API client.
///
/// The content service is created on first access and shared afterwards.
///
/// # Example
///
/// ```no_run
/// use integrations_gemini_ai::{CallOptions, GeminiClient, GeminiClientImpl};
/// use secrecy::SecretString;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GeminiClientImpl::builder()
///     .api_key(SecretString::new("your-api-key".into()))
///     .default_model("gemini-1.5-flash")
///     .build()?;
///
/// let output = client
///     .content()
///     .generate_content(
///         json!({"contents": [{"role": "user", "parts": [{"text": "Hi"}]}]}),
///         CallOptions::new(),
///     )
///     .await?;
/// println!("{}", output.text()?);
/// # Ok(())
/// # }
/// ```
pub struct GeminiClientImpl {
    config: Arc<GeminiConfig>,
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,

    content_service: OnceCell<ContentServiceImpl>,

    // Observability
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl GeminiClientImpl {
    /// Creates a new client builder.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, GeminiError> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
        GeminiClientBuilder::from_config(config).build()
    }

    /// Creates a client from pre-constructed parts (used by builder).
    pub(super) fn from_parts(
        config: GeminiConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        logger: Arc<dyn Logger>,
        tracer: Arc<dyn Tracer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            auth_manager,
            content_service: OnceCell::new(),
            logger,
            tracer,
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl GeminiClient for GeminiClientImpl {
    fn content(&self) -> &dyn ContentService {
        self.content_service.get_or_init(|| {
            ContentServiceImpl::new(
                Arc::clone(&self.config),
                Arc::clone(&self.transport),
                Arc::clone(&self.auth_manager),
                Arc::clone(&self.logger),
                Arc::clone(&self.tracer),
            )
        })
    }

    fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl std::fmt::Debug for GeminiClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClientImpl")
            .field("service", &self.config.backend.service_name())
            .field("api_version", &self.config.api_version)
            .field("config", &"<redacted>")
            .finish()
    }
}

/// Factory building clients with the default transport and observability stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultClientFactory;

impl GeminiClientFactory for DefaultClientFactory {
    fn create(&self, config: GeminiConfig) -> Result<Arc<dyn GeminiClient>, GeminiError> {
        create_client(config)
    }
}

/// Create a client from configuration.
pub fn create_client(config: GeminiConfig) -> Result<Arc<dyn GeminiClient>, GeminiError> {
    let client = GeminiClientImpl::new(config)?;
    Ok(Arc::new(client))
}

/// Create a client from environment variables.
pub fn create_client_from_env() -> Result<Arc<dyn GeminiClient>, GeminiError> {
    let config = GeminiConfig::from_env()?;
    create_client(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMethod, Backend, DEFAULT_API_VERSION};
    use crate::mocks::MockHttpTransport;
    use crate::observability::{NoopLogger, NoopTracer};
    use crate::services::CallOptions;
    use secrecy::SecretString;
    use serde_json::json;

    fn mock_client(transport: Arc<MockHttpTransport>) -> GeminiClientImpl {
        GeminiClientBuilder::new()
            .api_key(SecretString::new("test-key".into()))
            .default_model("gemini-pro")
            .transport(transport)
            .logger(Arc::new(NoopLogger))
            .tracer(Arc::new(NoopTracer))
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_from_config() {
        let config = GeminiConfig::builder()
            .api_key(SecretString::new("test-key".into()))
            .api_version("v1beta")
            .build()
            .unwrap();

        let client = GeminiClientImpl::new(config).unwrap();
        assert_eq!(client.config().api_version, "v1beta");
        assert_eq!(client.config().auth_method, AuthMethod::Header);
    }

    #[test]
    fn test_factory_creates_client() {
        let config = GeminiConfig::builder()
            .api_key(SecretString::new("test-key".into()))
            .backend(Backend::vertex_ai("us-central1", "my-project"))
            .build()
            .unwrap();

        let client = DefaultClientFactory.create(config).unwrap();
        assert_eq!(client.config().api_version, DEFAULT_API_VERSION);
        assert_eq!(client.config().backend, Backend::vertex_ai("us-central1", "my-project"));
    }

    #[tokio::test]
    async fn test_content_service_uses_injected_transport() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi"}]}}]}"#,
        );
        let client = mock_client(transport.clone());

        let output = client
            .content()
            .generate_content(json!({"contents": []}), CallOptions::new())
            .await
            .unwrap();

        assert_eq!(output.text().unwrap(), "Hi");
        transport.verify_header(0, "x-goog-api-key", "test-key");
    }

    #[test]
    fn test_content_service_is_created_once() {
        let client = mock_client(Arc::new(MockHttpTransport::new()));

        let first = client.content() as *const dyn ContentService as *const ();
        let second = client.content() as *const dyn ContentService as *const ();
        assert_eq!(first, second);
    }

    #[test]
    fn test_debug_redacts_config() {
        let client = mock_client(Arc::new(MockHttpTransport::new()));
        let debug = format!("{:?}", client);

        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("test-key"));
    }
}
