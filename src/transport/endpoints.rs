//! Endpoint URL templates for the two Gemini backends.
//!
//! The generative language API addresses a model directly:
//! `https://generativelanguage.googleapis.com/{version}/models/{model}:{method}`.
//!
//! Vertex AI scopes it to a project and a region:
//! `https://{region}-aiplatform.googleapis.com/{version}/projects/{project}/locations/{region}/publishers/google/models/{model}:{method}`.

use crate::config::Backend;

/// Host of the generative language API.
pub const GENERATIVE_LANGUAGE_HOST: &str = "https://generativelanguage.googleapis.com";

/// Generation methods exposed by both backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMethod {
    /// `generateContent`
    GenerateContent,
    /// `streamGenerateContent`
    StreamGenerateContent,
}

impl GenerateMethod {
    /// The method name as it appears after the model in the URL.
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerateMethod::GenerateContent => "generateContent",
            GenerateMethod::StreamGenerateContent => "streamGenerateContent",
        }
    }
}

impl Backend {
    /// The default host serving this backend.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_gemini_ai::config::Backend;
    ///
    /// let backend = Backend::vertex_ai("us-east4", "my-project");
    /// assert_eq!(backend.default_host(), "https://us-east4-aiplatform.googleapis.com");
    /// ```
    pub fn default_host(&self) -> String {
        match self {
            Backend::GenerativeLanguage => GENERATIVE_LANGUAGE_HOST.to_string(),
            Backend::VertexAi { region, .. } => {
                format!("https://{}-aiplatform.googleapis.com", region)
            }
        }
    }

    /// The path of a model method below the host.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_gemini_ai::config::Backend;
    /// use integrations_gemini_ai::transport::GenerateMethod;
    ///
    /// let path = Backend::GenerativeLanguage.model_path("v1", "gemini-pro", GenerateMethod::GenerateContent);
    /// assert_eq!(path, "/v1/models/gemini-pro:generateContent");
    /// ```
    pub fn model_path(&self, api_version: &str, model: &str, method: GenerateMethod) -> String {
        match self {
            Backend::GenerativeLanguage => {
                format!("/{}/models/{}:{}", api_version, model, method.as_str())
            }
            Backend::VertexAi { region, project_id } => format!(
                "/{}/projects/{}/locations/{}/publishers/google/models/{}:{}",
                api_version,
                project_id,
                region,
                model,
                method.as_str()
            ),
        }
    }
}
