//! REST client for the OpenAI image generation endpoint.
//!
//! Wraps `POST /v1/images/generations` using [`reqwest`], always asking for
//! a single image returned inline as base64.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Default image model.
pub const DEFAULT_MODEL: &str = "gpt-image-1";

/// Errors from the OpenAI REST layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// OpenAI returned a non-2xx status code.
    #[error("OpenAI API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response carried no base64 image.
    #[error("Response contained no image data")]
    MissingImage,

    /// The base64 payload could not be decoded.
    #[error("Invalid base64 image data: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Transport performing one generation attempt with a given key.
///
/// [`OpenAiImagesApi`] is the production implementation; tests substitute
/// scripted backends.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        size: &str,
    ) -> Result<Vec<u8>, OpenAiApiError>;
}

/// Request body for `/v1/images/generations`.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
    /// Only DALL·E models accept this; gpt-image models always return base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

/// HTTP client for the OpenAI images API.
pub struct OpenAiImagesApi {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiImagesApi {
    /// Create a client for `base_url` (e.g. `https://api.openai.com`).
    pub fn new(base_url: String, model: String) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, model)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, model: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str, size: &'a str) -> GenerateRequest<'a> {
        let response_format = self.model.starts_with("dall-e").then_some("b64_json");
        GenerateRequest {
            model: &self.model,
            prompt,
            size,
            n: 1,
            response_format,
        }
    }

    /// Ensure the response has a success status code, otherwise capture
    /// the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OpenAiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAiApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ImageBackend for OpenAiImagesApi {
    async fn generate_image(
        &self,
        api_key: &str,
        prompt: &str,
        size: &str,
    ) -> Result<Vec<u8>, OpenAiApiError> {
        let response = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_body(prompt, size))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: ImagesResponse = response.json().await?;
        decode_first_image(parsed)
    }
}

/// Decode the first image of a response.
fn decode_first_image(response: ImagesResponse) -> Result<Vec<u8>, OpenAiApiError> {
    let b64 = response
        .data
        .into_iter()
        .next()
        .and_then(|d| d.b64_json)
        .ok_or(OpenAiApiError::MissingImage)?;
    Ok(BASE64.decode(b64.as_bytes())?)
}
