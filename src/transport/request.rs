//! HTTP request builder for the Gemini API.
//!
//! This module provides the `RequestBuilder` for constructing generation
//! requests with proper authentication, headers, and URL formatting.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::auth::AuthManager;
use crate::config::{Backend, GeminiConfig};
use crate::error::{ConfigurationError, GeminiError};
use super::endpoints::GenerateMethod;
use super::http::{HttpMethod, HttpRequest};

/// Header carrying the client-generated request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builder for constructing HTTP requests to the Gemini API.
///
/// The `RequestBuilder` handles:
/// - URL construction for the configured backend
/// - Authentication via the configured auth manager
/// - Header management (Content-Type, Accept, request id)
/// - Request body serialization
#[derive(Clone)]
pub struct RequestBuilder {
    /// Backend serving the requests.
    backend: Backend,
    /// Replaces the backend host when set.
    base_url: Option<Url>,
    /// API version (e.g., "v1").
    api_version: String,
    /// Authentication manager.
    auth_manager: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a new request builder.
    pub fn new(
        backend: Backend,
        base_url: Option<Url>,
        api_version: String,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        Self {
            backend,
            base_url,
            api_version,
            auth_manager,
        }
    }

    /// Creates a request builder from a client configuration.
    pub fn from_config(config: &GeminiConfig, auth_manager: Arc<dyn AuthManager>) -> Self {
        Self::new(
            config.backend.clone(),
            config.base_url.clone(),
            config.api_version.clone(),
            auth_manager,
        )
    }

    /// Builds a complete URL for a model method.
    ///
    /// Adds `alt=sse` when server-sent events are requested and the API key
    /// query parameter when the auth manager uses one.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use integrations_gemini_ai::auth::ApiKeyAuthManager;
    /// # use integrations_gemini_ai::config::{AuthMethod, Backend};
    /// # use integrations_gemini_ai::transport::{GenerateMethod, RequestBuilder};
    /// # use secrecy::SecretString;
    /// let auth = ApiKeyAuthManager::new(SecretString::new("k".into()), AuthMethod::Header);
    /// let builder = RequestBuilder::new(Backend::GenerativeLanguage, None, "v1".into(), Arc::new(auth));
    ///
    /// let url = builder.build_url("gemini-pro", GenerateMethod::StreamGenerateContent, true).unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://generativelanguage.googleapis.com/v1/models/gemini-pro:streamGenerateContent?alt=sse"
    /// );
    /// ```
    pub fn build_url(
        &self,
        model: &str,
        method: GenerateMethod,
        server_sent_events: bool,
    ) -> Result<Url, GeminiError> {
        let host = match &self.base_url {
            Some(url) => url.as_str().trim_end_matches('/').to_string(),
            None => self.backend.default_host(),
        };
        let path = self.backend.model_path(&self.api_version, model, method);
        let raw = format!("{}{}", host, path);

        let mut url = Url::parse(&raw)
            .map_err(|_| ConfigurationError::InvalidBaseUrl { url: raw.clone() })?;

        if server_sent_events {
            url.query_pairs_mut().append_pair("alt", "sse");
        }

        if let Some((key, value)) = self.auth_manager.auth_query_param() {
            url.query_pairs_mut().append_pair(&key, &value);
        }

        Ok(url)
    }

    /// Builds a POST request for a model method with a JSON body.
    pub async fn build_request<T: Serialize + ?Sized>(
        &self,
        model: &str,
        method: GenerateMethod,
        server_sent_events: bool,
        body: &T,
    ) -> Result<HttpRequest, GeminiError> {
        let url = self.build_url(model, method, server_sent_events)?;

        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        if server_sent_events {
            headers.insert("Accept".to_string(), "text/event-stream".to_string());
        }

        if let Some((key, value)) = self.auth_manager.auth_header().await? {
            headers.insert(key, value);
        }

        headers.insert(REQUEST_ID_HEADER.to_string(), uuid::Uuid::new_v4().to_string());

        let json = serde_json::to_vec(body)?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers,
            body: Some(Bytes::from(json)),
        })
    }
}
