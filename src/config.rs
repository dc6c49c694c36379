//! Configuração do Livro carregada a partir de `livro.toml`.
//!
//! A struct [`LivroConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `GROQ_API_KEY` e `PLAYGROUND_API_KEY` têm
//! precedência sobre o arquivo. Sem chave, o provedor correspondente usa o
//! fallback local em vez de falhar.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::LivroError;
use crate::providers::{DEFAULT_TIMEOUT, image, story};
use crate::render::CommandConverter;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "livro.toml";

/// Formato das linhas de log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Configuração de nível superior carregada de `livro.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LivroConfig {
    /// Chave do provedor de texto.
    #[serde(default)]
    pub groq_api_key: Option<String>,

    /// Chave do provedor de imagem.
    #[serde(default)]
    pub playground_api_key: Option<String>,

    #[serde(default = "default_story_api_url")]
    pub story_api_url: String,

    #[serde(default = "default_story_model")]
    pub story_model: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_image_api_url")]
    pub image_api_url: String,

    #[serde(default = "default_image_width")]
    pub image_width: u32,

    #[serde(default = "default_image_height")]
    pub image_height: u32,

    /// Tempo máximo de espera por chamada a um provedor, em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Diretório onde cada job grava seus arquivos.
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Endereço do servidor HTTP.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Programa que converte HTML em PDF.
    #[serde(default = "default_pdf_command")]
    pub pdf_command: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_story_api_url() -> String {
    story::API_URL.to_string()
}

fn default_story_model() -> String {
    story::DEFAULT_MODEL.to_string()
}

fn default_max_output_tokens() -> u32 {
    story::DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_image_api_url() -> String {
    image::API_URL.to_string()
}

fn default_image_width() -> u32 {
    image::DEFAULT_WIDTH
}

fn default_image_height() -> u32 {
    image::DEFAULT_HEIGHT
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("media")
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_pdf_command() -> String {
    CommandConverter::default().program().to_string()
}

impl Default for LivroConfig {
    fn default() -> Self {
        Self {
            groq_api_key: None,
            playground_api_key: None,
            story_api_url: default_story_api_url(),
            story_model: default_story_model(),
            max_output_tokens: default_max_output_tokens(),
            image_api_url: default_image_api_url(),
            image_width: default_image_width(),
            image_height: default_image_height(),
            request_timeout_secs: default_request_timeout_secs(),
            media_dir: default_media_dir(),
            bind: default_bind(),
            pdf_command: default_pdf_command(),
            log_format: LogFormat::default(),
        }
    }
}

impl LivroConfig {
    /// Carrega `livro.toml` do diretório atual, ou os defaults se não existir.
    pub fn load() -> Result<Self, LivroError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, LivroError> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<LivroConfig>(&contents)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Variáveis de ambiente não vazias substituem as chaves do arquivo.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("GROQ_API_KEY")
            && !key.is_empty()
        {
            self.groq_api_key = Some(key);
        }
        if let Some(key) = lookup("PLAYGROUND_API_KEY")
            && !key.is_empty()
        {
            self.playground_api_key = Some(key);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
