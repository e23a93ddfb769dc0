use super::encode_png;
use super::http_client::build_image_client;
use super::scrub::sanitize_api_error;
use super::traits::{ImageProducer, RenderFuture, RenderRequest};
use crate::config::ImageConfig;
use crate::error::GenerationError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::FilterType;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(default)]
    b64_json: Option<String>,
}

/// Client for an OpenAI-compatible images endpoint. The returned image is
/// cropped to fill the configured canvas.
pub struct RemoteImageProducer {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
    size: String,
    width: u32,
    height: u32,
}

impl RemoteImageProducer {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            client: build_image_client(config.timeout_secs),
            api_url: config.api_url.clone(),
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            model: config.model.clone(),
            size: config.size.clone(),
            width: config.width,
            height: config.height,
        }
    }

    async fn fetch_image(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GenerationError::MissingCredentials(
                "no API key configured for the remote image backend".into(),
            )
        })?;

        let body = GenerationRequest {
            model: &self.model,
            prompt,
            size: &self.size,
            n: 1,
            response_format: "b64_json",
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body: sanitize_api_error(&text),
            });
        }

        let parsed: GenerationResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(format!("unexpected response body: {e}")))?;
        let first = parsed
            .data
            .into_iter()
            .next()
            .ok_or(GenerationError::EmptyResponse)?;
        let encoded = first
            .b64_json
            .filter(|b| !b.is_empty())
            .ok_or(GenerationError::MissingPayload)?;

        STANDARD
            .decode(encoded.trim())
            .map_err(|e| GenerationError::Decode(format!("invalid base64: {e}")))
    }

    async fn render_impl(&self, prompt: &str) -> Result<Vec<u8>, GenerationError> {
        let raw = self.fetch_image(prompt).await?;
        let (width, height) = (self.width, self.height);

        tokio::task::spawn_blocking(move || {
            let decoded = image::load_from_memory(&raw)
                .map_err(|e| GenerationError::Decode(e.to_string()))?;
            let fitted = decoded.resize_to_fill(width, height, FilterType::Lanczos3);
            encode_png(fitted.to_rgba8())
        })
        .await
        .map_err(|e| GenerationError::Render(format!("resize task failed: {e}")))?
    }
}

fn transport_error(error: &reqwest::Error) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Transport("request timed out".into())
    } else if error.is_connect() {
        GenerationError::Transport("could not connect to the image API".into())
    } else {
        GenerationError::Transport(sanitize_api_error(&error.to_string()))
    }
}

impl ImageProducer for RemoteImageProducer {
    fn name(&self) -> &str {
        "remote"
    }

    fn render<'a>(&'a self, request: RenderRequest<'a>) -> RenderFuture<'a> {
        tracing::debug!(model = %self.model, prompt = request.prompt, "requesting remote image");
        Box::pin(self.render_impl(request.prompt))
    }
}
