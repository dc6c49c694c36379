//! Interface de terminal do `livro generate`: spinner e saída colorida.
//!
//! O [`JobProgress`] acompanha o status de um job enquanto o pipeline roda
//! em segundo plano e imprime o resultado final.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::jobs::{Job, JobStatus};

/// Spinner que reflete o status atual de um job.
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    dim: Style,
}

impl JobProgress {
    /// Inicia o spinner com a descrição do livro.
    pub fn start(description: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("queued: {description}"));
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Atualiza a mensagem com o status (e o progresso das imagens).
    pub fn update(&self, job: &Job) {
        self.pb.set_message(status_line(job));
    }

    /// Finaliza o spinner e mostra o caminho do PDF ou o erro.
    pub fn complete(&self, job: &Job) {
        self.pb.finish_and_clear();
        match job.status {
            JobStatus::Done => {
                let path = job
                    .download
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("  {} Book ready: {path}", self.green.apply_to("✓"));
            }
            _ => {
                let reason = job.error.as_deref().unwrap_or("unknown error");
                println!("  {} Job failed: {reason}", self.red.apply_to("✗"));
            }
        }
        println!("  {}", self.dim.apply_to(format!("job {}", job.id)));
    }
}

fn status_line(job: &Job) -> String {
    match job.progress {
        Some(percent) => format!("{} ({percent}%)", job.status),
        None => job.status.to_string(),
    }
}
