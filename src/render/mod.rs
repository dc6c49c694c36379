//! Renderização do livro: história + imagens → HTML → PDF.
//!
//! O HTML vem do template askama `templates/book.html`; a conversão para PDF
//! é delegada a um [`PdfConverter`]. Falhas de template, conversão ou escrita
//! sobem sem recuperação.

mod converter;
mod placement;

use std::path::{Path, PathBuf};

use askama::Template;
use thiserror::Error;
use tracing::info;

use crate::book::{Page, Story};

pub use converter::{CommandConverter, PdfConverter};
pub use placement::ImagePlacement;

/// Erros da etapa de renderização.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("failed to start pdf converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pdf converter '{program}' failed (exit code {status:?}): {stderr}")]
    Converter {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

struct PageView<'a> {
    number: u32,
    text: &'a str,
    image: Option<String>,
}

impl<'a> PageView<'a> {
    fn new(page: &'a Page, image: Option<String>) -> Self {
        Self {
            number: page.page,
            text: &page.text,
            image,
        }
    }
}

#[derive(Template)]
#[template(path = "book.html")]
struct BookTemplate<'a> {
    title: &'a str,
    dedication: &'a str,
    cover: Option<String>,
    pages: Vec<PageView<'a>>,
}

// Images live next to the PDF, so the markup refers to them by file name.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Renders the book markup for `story` with `images` laid out by
/// [`ImagePlacement::assign`].
pub fn render_html(story: &Story, images: &[PathBuf]) -> Result<String, RenderError> {
    let placement = ImagePlacement::assign(images, story.pages.len());

    let pages = story
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let image = placement.image_for_page(i + 1).map(|p| file_name(p));
            PageView::new(page, image)
        })
        .collect();

    let template = BookTemplate {
        title: &story.title,
        dedication: &story.dedication,
        cover: placement.cover.as_deref().map(file_name),
        pages,
    };
    Ok(template.render()?)
}

/// Turns a story and its illustrations into a PDF file.
pub struct DocumentRenderer<C = CommandConverter> {
    converter: C,
}

impl<C: PdfConverter> DocumentRenderer<C> {
    pub fn new(converter: C) -> Self {
        Self { converter }
    }

    pub async fn render(
        &self,
        story: &Story,
        images: &[PathBuf],
        output: &Path,
    ) -> Result<(), RenderError> {
        let html = render_html(story, images)?;

        let base_dir = output
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let pdf = self.converter.convert(&html, base_dir).await?;

        tokio::fs::write(output, &pdf).await?;
        info!(path = %output.display(), bytes = pdf.len(), "pdf written");
        Ok(())
    }
}
