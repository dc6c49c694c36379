//! Construção dos prompts enviados aos provedores de texto e imagem.
//!
//! Funções puras: recebem o [`BookRequest`] e devolvem o texto do prompt.

use crate::book::BookRequest;

/// Prompt for the text provider. Asks for the story as a bare JSON object
/// with exactly `request.pages` entries of 20-40 words each.
pub fn story_prompt(request: &BookRequest) -> String {
    format!(
        "Você é um autor experiente de livros infantis. Gera APENAS um JSON válido com as keys:\n\
         {{\"title\":\"<Título>\",\"dedicatoria\":\"<dedicatoria>\",\"pages\":[{{\"page\":1,\"text\":\"...\"}}...]}}\n\
         Dados: Nome: {name}; Idade: {age}; Idioma: {language}; Tema: {theme}; Valores: {values}; Descrição: {description}\n\
         Regras:\n\
         - Gera exatamente {pages} entradas em \"pages\".\n\
         - Cada página: 20-40 palavras, linguagem simples e apropriada.\n\
         - Retorna apenas JSON, sem comentários.\n",
        name = request.name,
        age = request.age,
        language = request.language,
        theme = request.theme,
        values = request.values.join(", "),
        description = request.description,
        pages = request.pages,
    )
}

/// Prompt for one illustration. `page_index` is 0-based.
pub fn illustration_prompt(request: &BookRequest, page_index: u32) -> String {
    format!(
        "Ilustração estilo {style} para a página {page}. Criança: {description}. Tema: {theme}. \
         Cores vivas, estilo infantil, sem texto.",
        style = request.art_style,
        page = page_index + 1,
        description = request.description,
        theme = request.theme,
    )
}
