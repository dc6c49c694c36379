use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::types::{IMAGE_SHAPES, ImageRequest, extract_first, shape_names};
use super::{IllustrationSource, ProviderError, ensure_success, http_client, non_empty};

pub const API_URL: &str = "https://api.playgroundai.com/v1/images/generate";
pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 1536;
const PROVIDER: &str = "playground";

/// PNG transparente 1×1 devolvido quando não há chave do provedor de imagem.
pub const PLACEHOLDER_PNG: &[u8] = include_bytes!("../../assets/placeholder.png");

/// Client for the image-generation provider.
pub struct IllustrationClient {
    api_key: Option<String>,
    client: Client,
    base_url: String,
    width: u32,
    height: u32,
}

impl IllustrationClient {
    #[cfg(test)]
    pub fn new(api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    #[cfg(test)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Result<Self, ProviderError> {
        Self::with_settings(
            api_key,
            base_url,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            super::DEFAULT_TIMEOUT,
        )
    }

    pub fn with_settings(
        api_key: Option<String>,
        base_url: String,
        width: u32,
        height: u32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: non_empty(api_key),
            client: http_client(timeout)?,
            base_url,
            width,
            height,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

impl IllustrationSource for IllustrationClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(PLACEHOLDER_PNG.to_vec());
        };

        let body = ImageRequest {
            prompt: prompt.to_string(),
            width: self.width,
            height: self.height,
        };

        debug!(width = self.width, height = self.height, "requesting illustration");
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let value: Value = ensure_success(PROVIDER, response).await?.json().await?;

        let encoded =
            extract_first(&value, IMAGE_SHAPES).ok_or_else(|| ProviderError::UnrecognizedShape {
                provider: PROVIDER,
                tried: shape_names(IMAGE_SHAPES),
            })?;

        Ok(STANDARD.decode(encoded)?)
    }
}
