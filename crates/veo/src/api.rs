//! HTTP client for the Veo API.
//!
//! Wraps the two calls the job lifecycle needs: starting a generation
//! (`POST models/{model}:predictLongRunning`) and reading an operation
//! (`GET {operation_name}`).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use vidgen_core::generation::{GeneratorError, OperationStatus, StartedOperation, VideoGenerator};

use crate::config::GeneratorConfig;
use crate::operation::{Operation, StartResponse};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// HTTP client for one Veo model endpoint.
#[derive(Clone)]
pub struct VeoApi {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

/// Errors from the Veo REST layer.
#[derive(Debug, thiserror::Error)]
pub enum VeoApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Veo returned a non-2xx status code.
    #[error("Veo API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose body is not the expected JSON.
    #[error("Invalid Veo response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API key cannot be sent as a header value.
    #[error("Invalid API key: {0}")]
    InvalidKey(#[from] reqwest::header::InvalidHeaderValue),
}

impl VeoApi {
    /// Build a client from configuration. The API key is attached to every
    /// request as a default header and never appears in URLs.
    pub fn new(config: &GeneratorConfig) -> Result<Self, VeoApiError> {
        let mut key = HeaderValue::from_str(&config.api_key)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Start a generation for `prompt`.
    pub async fn start_generation(&self, prompt: &str) -> Result<StartResponse, VeoApiError> {
        let body = serde_json::json!({
            "instances": [{ "prompt": prompt }],
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:predictLongRunning",
                self.base_url, self.model
            ))
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Read the current state of an operation.
    pub async fn get_operation(&self, operation_name: &str) -> Result<Operation, VeoApiError> {
        let response = self
            .client
            .get(format!(
                "{}/{}",
                self.base_url,
                operation_name.trim_start_matches('/')
            ))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`VeoApiError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, VeoApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(VeoApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, VeoApiError> {
        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

impl From<VeoApiError> for GeneratorError {
    fn from(err: VeoApiError) -> Self {
        match err {
            VeoApiError::Request(e) => Self::Transport(e.to_string()),
            VeoApiError::ApiError { status, body } => Self::Api { status, body },
            VeoApiError::Decode(e) => Self::Decode(e.to_string()),
            VeoApiError::InvalidKey(e) => Self::Transport(e.to_string()),
        }
    }
}

#[async_trait]
impl VideoGenerator for VeoApi {
    async fn start(&self, prompt: &str) -> Result<StartedOperation, GeneratorError> {
        let started = self.start_generation(prompt).await?;
        tracing::debug!(operation_name = ?started.name, "Veo generation started");
        Ok(StartedOperation {
            operation_handle: started.name,
        })
    }

    async fn check(&self, operation_handle: &str) -> Result<OperationStatus, GeneratorError> {
        let operation = self.get_operation(operation_handle).await?;
        Ok(operation.into())
    }
}
