use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::{STORY_TEXT_SHAPES, StoryRequest, extract_first};
use super::{ProviderError, StorySource, ensure_success, http_client, non_empty};
use crate::book::{BookRequest, Story, StoryDraft};
use crate::prompt::story_prompt;

pub const API_URL: &str = "https://api.groq.com/v1/outputs";
pub const DEFAULT_MODEL: &str = "llama-3.1";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1200;
const PROVIDER: &str = "groq";

/// Client for the text-generation provider.
///
/// Without an API key every call returns [`Story::placeholder`] and no
/// request leaves the process.
pub struct StoryClient {
    api_key: Option<String>,
    client: Client,
    base_url: String,
    model: String,
    max_output_tokens: u32,
}

impl StoryClient {
    #[cfg(test)]
    pub fn new(api_key: Option<String>) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    #[cfg(test)]
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Result<Self, ProviderError> {
        Self::with_settings(
            api_key,
            base_url,
            DEFAULT_MODEL.to_string(),
            DEFAULT_MAX_OUTPUT_TOKENS,
            super::DEFAULT_TIMEOUT,
        )
    }

    pub fn with_settings(
        api_key: Option<String>,
        base_url: String,
        model: String,
        max_output_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key: non_empty(api_key),
            client: http_client(timeout)?,
            base_url,
            model,
            max_output_tokens,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Calls the provider and classifies its text as parsed JSON or paragraphs.
    pub async fn request_draft(
        &self,
        api_key: &str,
        request: &BookRequest,
    ) -> Result<StoryDraft, ProviderError> {
        let body = StoryRequest {
            model: self.model.clone(),
            input: story_prompt(request),
            max_output_tokens: self.max_output_tokens,
        };

        debug!(model = %self.model, pages = request.pages, "requesting story text");
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let raw = ensure_success(PROVIDER, response).await?.text().await?;

        // A body that is not JSON at all is handled like a missing field.
        let value: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
        let text = extract_first(&value, STORY_TEXT_SHAPES).unwrap_or_else(|| {
            warn!("story response has no recognized text field");
            ""
        });

        Ok(Story::from_provider_text(text, request))
    }
}

impl StorySource for StoryClient {
    async fn generate_story(&self, request: &BookRequest) -> Result<Story, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!(name = %request.name, "no text provider key, using placeholder story");
            return Ok(Story::placeholder(request));
        };

        let draft = self.request_draft(api_key, request).await?;
        if !draft.is_parsed() {
            warn!(pages = request.pages, "story text is not JSON, splitting paragraphs");
        }
        Ok(draft.into_story())
    }
}
