//! Perfil da criança enviado pelo cliente para gerar um livro.
//!
//! [`BookRequest`] é imutável depois de aceito: o orquestrador recebe uma
//! cópia e nenhum estágio do pipeline a altera.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pedido de geração de um livro ilustrado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRequest {
    /// Nome da criança protagonista.
    pub name: String,
    /// Idade da criança, em anos.
    pub age: u32,
    /// Idioma da história (código curto, ex.: "pt").
    #[serde(default = "default_language")]
    pub language: String,
    /// Tema da aventura.
    pub theme: String,
    /// Valores que a história deve transmitir, em ordem.
    #[serde(default)]
    pub values: Vec<String>,
    /// Estilo artístico das ilustrações.
    #[serde(default = "default_art_style")]
    pub art_style: String,
    /// Descrição física da criança, usada nas ilustrações.
    #[serde(default)]
    pub description: String,
    /// Número de páginas da história.
    #[serde(default = "default_pages")]
    pub pages: u32,
}

fn default_language() -> String {
    "pt".to_string()
}

fn default_art_style() -> String {
    "cartoon".to_string()
}

fn default_pages() -> u32 {
    14
}

/// Pedido rejeitado antes de virar job.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("pages must be at least 1")]
    NoPages,
}

impl BookRequest {
    /// Creates a request with the same defaults the JSON surface applies.
    pub fn new(name: impl Into<String>, age: u32, theme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            language: default_language(),
            theme: theme.into(),
            values: Vec::new(),
            art_style: default_art_style(),
            description: String::new(),
            pages: default_pages(),
        }
    }

    pub fn with_pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Checks the fields the pipeline cannot work without.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.name.trim().is_empty() {
            return Err(RequestError::EmptyName);
        }
        if self.pages == 0 {
            return Err(RequestError::NoPages);
        }
        Ok(())
    }
}
