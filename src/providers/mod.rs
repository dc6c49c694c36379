//! Clientes dos provedores externos de texto e imagem.
//!
//! Os traits [`StorySource`] e [`IllustrationSource`] são as costuras usadas
//! pelo orquestrador; [`StoryClient`] e [`IllustrationClient`] são as
//! implementações HTTP, cada uma com seu fallback local quando não há chave.

pub mod error;
pub mod image;
pub mod story;
pub mod types;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Response};

use crate::book::{BookRequest, Story};

pub use error::ProviderError;
pub use image::IllustrationClient;
pub use story::StoryClient;

/// Per-request timeout when the configuration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Produces the story text for a request.
pub trait StorySource: Send + Sync + 'static {
    fn generate_story(
        &self,
        request: &BookRequest,
    ) -> impl Future<Output = Result<Story, ProviderError>> + Send;
}

/// Produces raw image bytes for a prompt.
pub trait IllustrationSource: Send + Sync + 'static {
    fn generate_image(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Builds the shared HTTP client with a bounded per-request timeout.
fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Turns a non-2xx response into [`ProviderError::Api`].
async fn ensure_success(provider: &'static str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(ProviderError::Api {
        provider,
        status: status.as_u16(),
        message,
    })
}

// Empty keys behave like missing ones.
fn non_empty(api_key: Option<String>) -> Option<String> {
    api_key.filter(|key| !key.trim().is_empty())
}
