//! Interface de linha de comando do Livro baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (serve, generate)
//! e flags globais (--config, --verbose).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::book::BookRequest;

/// Livro: gerador de livros infantis ilustrados.
#[derive(Debug, Parser)]
#[command(name = "livro", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho do arquivo de configuração (padrão: ./livro.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita logs de debug.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sobe o servidor HTTP.
    Serve {
        /// Endereço de escuta; sobrescreve `bind` da configuração.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Gera um livro neste processo e mostra o progresso.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Nome da criança.
    #[arg(long)]
    pub name: String,

    /// Idade da criança.
    #[arg(long)]
    pub age: u32,

    /// Tema da aventura.
    #[arg(long)]
    pub theme: String,

    #[arg(long, default_value = "pt")]
    pub language: String,

    /// Valor a transmitir; pode ser repetido.
    #[arg(long = "value")]
    pub values: Vec<String>,

    #[arg(long, default_value = "cartoon")]
    pub art_style: String,

    /// Descrição física da criança para as ilustrações.
    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value_t = 14)]
    pub pages: u32,
}

impl From<GenerateArgs> for BookRequest {
    fn from(args: GenerateArgs) -> Self {
        let mut request = BookRequest::new(args.name, args.age, args.theme).with_pages(args.pages);
        request.language = args.language;
        request.values = args.values;
        request.art_style = args.art_style;
        request.description = args.description;
        request
    }
}
