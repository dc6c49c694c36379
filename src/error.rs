use thiserror::Error;

use crate::book::RequestError;
use crate::providers::ProviderError;

/// Errors that stop the `livro` binary before or outside a job.
#[derive(Debug, Error)]
pub enum LivroError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid book request: {0}")]
    Request(#[from] RequestError),

    #[error("Provider setup error: {0}")]
    Provider(#[from] ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_display() {
        let err = LivroError::from(RequestError::NoPages);
        assert_eq!(err.to_string(), "Invalid book request: pages must be at least 1");
    }

    #[test]
    fn config_error_display() {
        let err = LivroError::Config("bind address".into());
        assert_eq!(err.to_string(), "Config error: bind address");
    }
}
