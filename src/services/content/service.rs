//! Content service implementation for generating and streaming content with Gemini models.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};

use super::{CallOptions, ContentService, GenerationOutput, StreamCallback};
use crate::auth::AuthManager;
use crate::config::GeminiConfig;
use crate::error::{map_http_status, ConfigurationError, GeminiResult};
use crate::observability::{Logger, SpanStatus, Tracer};
use crate::response::{normalize_body, DEFAULT_JOIN_SEPARATOR};
use crate::streaming::{RawChunk, StreamDecoder};
use crate::transport::{
    GenerateMethod, HttpRequest, HttpTransport, RequestBuilder, ResponseParser, StreamingResponse,
};

/// Implementation of the ContentService.
pub struct ContentServiceImpl {
    config: Arc<GeminiConfig>,
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl ContentServiceImpl {
    /// Create a new content service implementation.
    pub fn new(
        config: Arc<GeminiConfig>,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        logger: Arc<dyn Logger>,
        tracer: Arc<dyn Tracer>,
    ) -> Self {
        let request_builder = RequestBuilder::from_config(&config, auth_manager);

        Self {
            config,
            transport,
            request_builder,
            logger,
            tracer,
        }
    }

    fn resolve_model(&self, options: &CallOptions) -> GeminiResult<String> {
        options
            .model
            .clone()
            .or_else(|| self.config.default_model.clone())
            .filter(|model| !model.trim().is_empty())
            .ok_or_else(|| ConfigurationError::MissingModel.into())
    }

    async fn execute(
        &self,
        method: GenerateMethod,
        payload: Value,
        options: CallOptions,
        callback: Option<StreamCallback<'_>>,
    ) -> GeminiResult<GenerationOutput> {
        let default_sse = method == GenerateMethod::StreamGenerateContent;
        let server_sent_events = options.server_sent_events.unwrap_or(default_sse);

        if callback.is_some() && !server_sent_events {
            return Err(ConfigurationError::CallbackWithoutServerSentEvents.into());
        }

        let model = self.resolve_model(&options)?;
        let separator = options
            .join_separator
            .unwrap_or_else(|| DEFAULT_JOIN_SEPARATOR.to_string());

        let mut span = self.tracer.start_span(match method {
            GenerateMethod::GenerateContent => "gemini.content.generate",
            GenerateMethod::StreamGenerateContent => "gemini.content.stream_generate",
        });
        span.set_attribute("model", &model);
        span.set_attribute("method", method.as_str());
        span.set_attribute("service", self.config.backend.service_name().as_str());
        span.set_attribute("server_sent_events", &server_sent_events.to_string());

        let start = Instant::now();

        self.logger.debug("Starting content generation", json!({
            "model": model,
            "method": method.as_str(),
            "server_sent_events": server_sent_events,
        }));

        let result = async {
            let request = self
                .request_builder
                .build_request(&model, method, server_sent_events, &payload)
                .await?;

            if server_sent_events {
                self.execute_streaming(request, separator, callback).await
            } else {
                self.execute_complete(request, separator).await
            }
        }
        .await;

        let duration = start.elapsed();

        match &result {
            Ok(output) => {
                self.logger.info("Content generation completed", json!({
                    "model": model,
                    "method": method.as_str(),
                    "duration_ms": duration.as_millis() as u64,
                    "documents": output.documents().len(),
                }));
                span.set_status(SpanStatus::Ok);
            }
            Err(error) => {
                self.logger.error("Content generation failed", json!({
                    "model": model,
                    "method": method.as_str(),
                    "duration_ms": duration.as_millis() as u64,
                    "status": error.status(),
                    "error": error.to_string(),
                    "body": error.payload(),
                }));
                span.set_status(SpanStatus::Error(error.to_string()));
            }
        }
        span.end();

        result
    }

    async fn execute_complete(
        &self,
        request: HttpRequest,
        separator: String,
    ) -> GeminiResult<GenerationOutput> {
        let response = self.transport.send(request).await?;
        let body = ResponseParser::parse_body(response)?;
        let documents = normalize_body(body)?.into_documents();

        Ok(GenerationOutput::new(documents, separator))
    }

    async fn execute_streaming(
        &self,
        request: HttpRequest,
        separator: String,
        mut callback: Option<StreamCallback<'_>>,
    ) -> GeminiResult<GenerationOutput> {
        let StreamingResponse { info, mut body } = self.transport.send_streaming(request).await?;
        let info = Arc::new(info);

        let mut decoder = StreamDecoder::with_separator(separator.clone());
        let mut documents = Vec::new();
        let mut chunks = 0usize;

        while let Some(bytes) = body.next().await {
            let chunk = RawChunk::new(bytes?, Arc::clone(&info));
            chunks += 1;

            decoder.feed(&chunk, |result| {
                if let Some(callback) = callback.as_deref_mut() {
                    callback(&result);
                }
                documents.push(result.document);
            })?;
        }

        decoder.finish();

        if !info.is_success() && chunks == 0 {
            return Err(map_http_status(info.status, &info.headers, b""));
        }

        tracing::debug!(
            chunks,
            documents = documents.len(),
            finish_reason_seen = decoder.finish_reason_seen(),
            "Stream completed"
        );

        Ok(GenerationOutput::new(documents, separator))
    }
}

#[async_trait]
impl ContentService for ContentServiceImpl {
    async fn generate_content(
        &self,
        payload: Value,
        options: CallOptions,
    ) -> GeminiResult<GenerationOutput> {
        self.execute(GenerateMethod::GenerateContent, payload, options, None)
            .await
    }

    async fn stream_generate_content(
        &self,
        payload: Value,
        options: CallOptions,
        callback: Option<StreamCallback<'_>>,
    ) -> GeminiResult<GenerationOutput> {
        self.execute(GenerateMethod::StreamGenerateContent, payload, options, callback)
            .await
    }
}
