//! Tipos de erro para os clientes dos provedores de texto e imagem.
//!
//! [`ProviderError`] cobre falhas HTTP, de rede e de formato de resposta.
//! Não há retentativa: o erro sobe até o orquestrador, que o registra no job.

use thiserror::Error;

/// Erros que podem ocorrer ao chamar um provedor externo.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// O provedor respondeu com status fora da faixa 2xx.
    #[error("{provider} API error (status {status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Falha de rede subjacente (DNS, conexão recusada, timeout).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Nenhuma das formas de resposta conhecidas continha o campo esperado.
    #[error("{provider} response has no recognized shape (tried: {tried})")]
    UnrecognizedShape {
        provider: &'static str,
        tried: String,
    },

    /// O campo de imagem não era base64 válido.
    #[error("invalid base64 image: {0}")]
    Decode(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ProviderError::Api {
            provider: "groq",
            status: 401,
            message: "Invalid API key".into(),
        };
        assert_eq!(err.to_string(), "groq API error (status 401): Invalid API key");
    }

    #[test]
    fn unrecognized_shape_display() {
        let err = ProviderError::UnrecognizedShape {
            provider: "playground",
            tried: "image_base64, data[0].b64_json".into(),
        };
        assert_eq!(
            err.to_string(),
            "playground response has no recognized shape (tried: image_base64, data[0].b64_json)"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProviderError>();
    }
}
