use crate::{
    config::GeminiConfig,
    error::{GenerationError, Result, RATE_LIMIT_STATUS},
    gemini::ImageProvider,
    models::{
        gemini::{
            ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
            ImageConfig, RequestContent, TextPart,
        },
        AspectRatio, GeneratedImage, ImagePayload,
    },
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;

const DEFAULT_MIME_TYPE: &str = "image/png";

#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(prompt: &str, aspect_ratio: AspectRatio) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: ImageConfig {
                    aspect_ratio: aspect_ratio.to_string(),
                },
            },
        }
    }

    /// Maps a non-success answer to an error. The body's own `code`/`status`
    /// wins over the HTTP status when it reports exhaustion.
    fn error_from_response(status: u16, body: &str) -> GenerationError {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let exhausted = envelope.error.status.as_deref() == Some("RESOURCE_EXHAUSTED");
                let code = if exhausted {
                    RATE_LIMIT_STATUS
                } else {
                    envelope.error.code.unwrap_or(status)
                };
                GenerationError::from_status(code, envelope.error.message)
            }
            Err(_) => GenerationError::from_status(status, body.to_string()),
        }
    }

    fn decode_payload(response: &GenerateContentResponse) -> Result<Option<ImagePayload>> {
        let Some(inline) = response.first_inline_data() else {
            return Ok(None);
        };

        let bytes = STANDARD
            .decode(inline.data.as_bytes())
            .map_err(|e| GenerationError::MalformedResponse(format!("invalid base64: {}", e)))?;
        if bytes.is_empty() {
            return Ok(None);
        }

        let mime_type = inline
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Ok(Some(ImagePayload::new(bytes, mime_type)))
    }
}

#[async_trait]
impl ImageProvider for GeminiImageClient {
    async fn generate(&self, prompt: &str, aspect_ratio: AspectRatio) -> Result<GeneratedImage> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| GenerationError::Config("Gemini API key is not set".into()))?;

        let body = Self::build_request(prompt, aspect_ratio);

        log::info!(
            "Generating image with model: {} ({})",
            self.config.model,
            aspect_ratio
        );
        log::debug!("Image generation prompt: {}", prompt);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The URL carries host and port digits, keep them out of the message.
                let e = e.without_url();
                if e.is_timeout() {
                    GenerationError::unavailable(format!("Gemini request timed out: {}", e))
                } else {
                    GenerationError::unavailable(format!("Gemini request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::debug!("Gemini error body: {}", error_text);
            return Err(Self::error_from_response(status.as_u16(), &error_text));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| {
                GenerationError::unavailable(format!("Failed to read body: {}", e.without_url()))
            })?;
        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        Ok(GeneratedImage {
            payload: Self::decode_payload(&parsed)?,
        })
    }
}
