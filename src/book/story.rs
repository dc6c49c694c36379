//! Texto do livro: título, dedicatória e páginas.
//!
//! A [`Story`] é criada uma única vez pelo cliente de texto, gravada em
//! `story.json` e depois apenas lida pelo renderizador. O formato JSON segue
//! o contrato pedido ao provedor (`title`, `dedicatoria`, `pages`).

use serde::{Deserialize, Serialize};

use super::request::BookRequest;

/// Uma página da história, numerada a partir de 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub text: String,
}

/// The generated book text.
///
/// Missing keys in provider JSON fall back to a generic title, an empty
/// dedication and no pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(rename = "dedicatoria", default)]
    pub dedication: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

fn default_title() -> String {
    "Livro".to_string()
}

/// Resultado da interpretação do texto devolvido pelo provedor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryDraft {
    /// O texto era o JSON pedido e foi usado sem validação.
    Parsed(Story),
    /// O texto não era JSON; as páginas vieram dos parágrafos.
    Heuristic(Story),
}

impl StoryDraft {
    pub fn into_story(self) -> Story {
        match self {
            StoryDraft::Parsed(story) | StoryDraft::Heuristic(story) => story,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, StoryDraft::Parsed(_))
    }
}

impl Story {
    /// Deterministic story used when no text provider is configured.
    pub fn placeholder(request: &BookRequest) -> Self {
        let pages = (1..=request.pages)
            .map(|n| Page {
                page: n,
                text: format!(
                    "{} está numa pequena aventura na página {n}. Texto de exemplo simples.",
                    request.name
                ),
            })
            .collect();

        Self {
            title: adventure_title(request),
            dedication: format!("Para {}", request.name),
            pages,
        }
    }

    /// Interpreta o texto do provedor como JSON; se falhar, divide em parágrafos.
    pub fn from_provider_text(text: &str, request: &BookRequest) -> StoryDraft {
        match serde_json::from_str::<Story>(text) {
            Ok(story) => StoryDraft::Parsed(story),
            Err(_) => StoryDraft::Heuristic(Self::from_paragraphs(text, request)),
        }
    }

    // Paragraphs fill pages in order; missing ones get a generic sentence.
    fn from_paragraphs(text: &str, request: &BookRequest) -> Self {
        let mut paragraphs = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let pages = (1..=request.pages)
            .map(|n| Page {
                page: n,
                text: paragraphs.next().map(str::to_string).unwrap_or_else(|| {
                    format!("{} está numa pequena aventura.", request.name)
                }),
            })
            .collect();

        Self {
            title: adventure_title(request),
            dedication: String::new(),
            pages,
        }
    }
}

fn adventure_title(request: &BookRequest) -> String {
    format!("A aventura de {}", request.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pages: u32) -> BookRequest {
        BookRequest::new("Ana", 5, "space").with_pages(pages)
    }

    #[test]
    fn placeholder_has_contiguous_pages() {
        for p in 1..=40 {
            let story = Story::placeholder(&request(p));
            assert_eq!(story.pages.len(), p as usize);
            for (i, page) in story.pages.iter().enumerate() {
                assert_eq!(page.page, i as u32 + 1);
            }
        }
    }

    #[test]
    fn placeholder_mentions_name_and_page() {
        let story = Story::placeholder(&request(3));
        assert_eq!(story.title, "A aventura de Ana");
        assert_eq!(story.dedication, "Para Ana");
        assert!(story.pages[2].text.contains("Ana"));
        assert!(story.pages[2].text.contains("página 3"));
    }

    #[test]
    fn provider_json_is_trusted_as_is() {
        // Two pages although six were requested: no post-hoc validation.
        let text = r#"{
            "title": "Ana no Espaço",
            "dedicatoria": "Para a Ana, com amor",
            "pages": [
                {"page": 1, "text": "Era uma vez"},
                {"page": 2, "text": "Fim"}
            ]
        }"#;
        let draft = Story::from_provider_text(text, &request(6));
        assert!(draft.is_parsed());
        let story = draft.into_story();
        assert_eq!(story.title, "Ana no Espaço");
        assert_eq!(story.dedication, "Para a Ana, com amor");
        assert_eq!(story.pages.len(), 2);
    }

    #[test]
    fn provider_json_missing_keys_uses_defaults() {
        let draft = Story::from_provider_text(r#"{"pages": []}"#, &request(2));
        let story = draft.into_story();
        assert_eq!(story.title, "Livro");
        assert_eq!(story.dedication, "");
        assert!(story.pages.is_empty());
    }

    #[test]
    fn plain_text_falls_back_to_paragraphs() {
        let text = "Primeiro parágrafo.\n\n  \n\nSegundo parágrafo.\n\n";
        let draft = Story::from_provider_text(text, &request(4));
        assert!(!draft.is_parsed());

        let story = draft.into_story();
        assert_eq!(story.title, "A aventura de Ana");
        assert_eq!(story.dedication, "");
        assert_eq!(story.pages.len(), 4);
        assert_eq!(story.pages[0].text, "Primeiro parágrafo.");
        assert_eq!(story.pages[1].text, "Segundo parágrafo.");
        assert_eq!(story.pages[2].text, "Ana está numa pequena aventura.");
        assert_eq!(story.pages[3].page, 4);
    }

    #[test]
    fn extra_paragraphs_are_dropped() {
        let text = "um\n\ndois\n\ntrês";
        let story = Story::from_provider_text(text, &request(2)).into_story();
        assert_eq!(story.pages.len(), 2);
        assert_eq!(story.pages[1].text, "dois");
    }

    #[test]
    fn empty_text_yields_generic_pages() {
        let story = Story::from_provider_text("", &request(3)).into_story();
        assert_eq!(story.pages.len(), 3);
        assert!(story.pages.iter().all(|p| p.text == "Ana está numa pequena aventura."));
    }

    #[test]
    fn serializes_dedication_under_wire_key() {
        let story = Story::placeholder(&request(1));
        let json = serde_json::to_string(&story).unwrap();
        assert!(json.contains(r#""dedicatoria""#));
        assert!(!json.contains("dedication"));
    }
}
