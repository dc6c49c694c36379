//! Tipos de dados para requisições aos provedores e extração das respostas.
//!
//! As respostas dos provedores não têm um formato único: o mesmo campo pode
//! vir no topo do objeto ou aninhado em `data[0]`. Cada formato conhecido é
//! uma [`ResponseShape`], e as listas [`STORY_TEXT_SHAPES`] e
//! [`IMAGE_SHAPES`] são tentadas em ordem até a primeira que casar.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Corpo da requisição ao provedor de texto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryRequest {
    /// Identificador do modelo (ex.: "llama-3.1").
    pub model: String,
    /// Prompt completo.
    pub input: String,
    /// Limite de tokens gerados.
    pub max_output_tokens: u32,
}

/// Corpo da requisição ao provedor de imagem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
}

/// Um formato de resposta conhecido: nome legível e função de extração.
#[derive(Clone, Copy)]
pub struct ResponseShape {
    pub name: &'static str,
    extract: fn(&Value) -> Option<&str>,
}

impl ResponseShape {
    pub const fn new(name: &'static str, extract: fn(&Value) -> Option<&str>) -> Self {
        Self { name, extract }
    }

    pub fn extract<'a>(&self, body: &'a Value) -> Option<&'a str> {
        (self.extract)(body)
    }
}

impl std::fmt::Debug for ResponseShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResponseShape").field(&self.name).finish()
    }
}

// Empty strings count as missing so the next shape gets a chance.
fn top_level<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)?.as_str().filter(|s| !s.is_empty())
}

fn first_data<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get("data")?
        .get(0)?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
}

fn output_text(body: &Value) -> Option<&str> {
    top_level(body, "output_text")
}

fn generated_text(body: &Value) -> Option<&str> {
    first_data(body, "generated_text")
}

fn image_base64(body: &Value) -> Option<&str> {
    top_level(body, "image_base64")
}

fn b64_json(body: &Value) -> Option<&str> {
    first_data(body, "b64_json")
}

/// Formatos de resposta do provedor de texto, em ordem de preferência.
pub const STORY_TEXT_SHAPES: &[ResponseShape] = &[
    ResponseShape::new("output_text", output_text),
    ResponseShape::new("data[0].generated_text", generated_text),
];

/// Formatos de resposta do provedor de imagem, em ordem de preferência.
pub const IMAGE_SHAPES: &[ResponseShape] = &[
    ResponseShape::new("image_base64", image_base64),
    ResponseShape::new("data[0].b64_json", b64_json),
];

/// Returns the value of the first shape that matches, or `None`.
pub fn extract_first<'a>(body: &'a Value, shapes: &[ResponseShape]) -> Option<&'a str> {
    shapes.iter().find_map(|shape| shape.extract(body))
}

/// Comma-separated shape names, for error messages.
pub fn shape_names(shapes: &[ResponseShape]) -> String {
    shapes
        .iter()
        .map(|shape| shape.name)
        .collect::<Vec<_>>()
        .join(", ")
}
