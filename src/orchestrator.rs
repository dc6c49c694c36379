use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::fs;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::book::{BookRequest, RequestError};
use crate::jobs::{Job, JobStatus, JobStore, TransitionError};
use crate::prompt::illustration_prompt;
use crate::providers::{
    IllustrationClient, IllustrationSource, ProviderError, StoryClient, StorySource,
};
use crate::render::{CommandConverter, DocumentRenderer, PdfConverter, RenderError};

/// Arquivo com a história gerada, dentro do diretório do job.
pub const STORY_FILE: &str = "story.json";

/// Any failure inside the pipeline; its message becomes the job's `error`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 0-based page indices that get an illustration: first page, about a
/// third, about half, last page. Expects `pages >= 1`.
pub fn illustrated_pages(pages: u32) -> Vec<u32> {
    vec![
        0,
        (pages / 3).max(1),
        (pages / 2).max(1),
        pages.saturating_sub(1),
    ]
}

/// Directory holding every file of one job.
pub fn job_dir(media_dir: &Path, id: &Uuid) -> PathBuf {
    media_dir.join(id.to_string())
}

/// First PDF (by file name) in the job directory, if any.
pub async fn find_artifact(media_dir: &Path, id: &Uuid) -> std::io::Result<Option<PathBuf>> {
    let dir = job_dir(media_dir, id);
    let mut entries = match fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };

    let mut pdfs = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "pdf") {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs.into_iter().next())
}

// Keeps the child's name usable as a file stem.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Drives book jobs through text, images and PDF, recording every stage in
/// the job store.
pub struct BookOrchestrator<S = StoryClient, I = IllustrationClient, C = CommandConverter> {
    stories: S,
    illustrations: I,
    renderer: DocumentRenderer<C>,
    jobs: Arc<dyn JobStore>,
    media_dir: PathBuf,
}

impl<S, I, C> BookOrchestrator<S, I, C>
where
    S: StorySource,
    I: IllustrationSource,
    C: PdfConverter,
{
    pub fn new(
        stories: S,
        illustrations: I,
        converter: C,
        jobs: Arc<dyn JobStore>,
        media_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            stories,
            illustrations,
            renderer: DocumentRenderer::new(converter),
            jobs,
            media_dir: media_dir.into(),
        }
    }

    pub fn jobs(&self) -> &Arc<dyn JobStore> {
        &self.jobs
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Records a `queued` job and starts it in the background.
    pub fn submit(self: &Arc<Self>, request: BookRequest) -> Result<Uuid, RequestError> {
        request.validate()?;

        let job = Job::new();
        let id = job.id;
        self.jobs.put(job.clone());
        info!(job_id = %id, name = %request.name, pages = request.pages, "book job queued");

        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            orchestrator.run(job, request).await;
        });

        Ok(id)
    }

    /// Runs the whole pipeline for an already stored `queued` job and returns
    /// its final record. Failures end in the `error` state, never in a panic.
    pub async fn run(&self, mut job: Job, request: BookRequest) -> Job {
        match self.execute(&mut job, &request).await {
            Ok(artifact) => {
                info!(job_id = %job.id, path = %artifact.display(), "book job done");
            }
            Err(err) => {
                error!(job_id = %job.id, status = %job.status, error = %err, "book job failed");
                let message = err.to_string();
                if let Err(err) = self.commit(&mut job, |next| next.fail(message)) {
                    warn!(job_id = %job.id, error = %err, "could not record job failure");
                }
            }
        }
        job
    }

    async fn execute(&self, job: &mut Job, request: &BookRequest) -> Result<PathBuf, PipelineError> {
        self.commit(job, |next| next.advance(JobStatus::GeneratingText))?;
        let story = self.stories.generate_story(request).await?;

        let dir = job_dir(&self.media_dir, &job.id);
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(STORY_FILE), serde_json::to_vec_pretty(&story)?).await?;

        self.commit(job, |next| next.advance(JobStatus::GeneratingImages))?;
        let targets = illustrated_pages(request.pages);
        let mut images = Vec::with_capacity(targets.len());
        for (i, &page_index) in targets.iter().enumerate() {
            let prompt = illustration_prompt(request, page_index);
            let bytes = self.illustrations.generate_image(&prompt).await?;

            let path = dir.join(format!("page_{}.png", page_index + 1));
            fs::write(&path, &bytes).await?;
            images.push(path);

            let progress = ((i + 1) * 100 / targets.len()) as u8;
            self.commit(job, |next| next.set_progress(progress))?;
        }

        self.commit(job, |next| next.advance(JobStatus::BuildingPdf))?;
        let artifact = dir.join(format!("{}_{}.pdf", file_stem(&request.name), job.id));
        self.renderer.render(&story, &images, &artifact).await?;

        self.commit(job, |next| next.complete(artifact.clone()))?;
        Ok(artifact)
    }

    /// Applies `change` to a copy of `job` and writes it to the store.
    fn commit<F>(&self, job: &mut Job, change: F) -> Result<(), TransitionError>
    where
        F: FnOnce(&mut Job) -> Result<(), TransitionError>,
    {
        let mut next = job.clone();
        change(&mut next)?;

        if !self.jobs.compare_and_swap(&job.id, job, next.clone()) {
            warn!(job_id = %job.id, status = %next.status, "job record changed underneath, overwriting");
            self.jobs.put(next.clone());
        }
        if next.status != job.status {
            info!(job_id = %job.id, from = %job.status, to = %next.status, "job transition");
        }
        *job = next;
        Ok(())
    }
}

impl BookOrchestrator {
    /// Orchestrator wired with the HTTP providers and the command converter.
    pub fn from_config(
        config: &crate::config::LivroConfig,
        jobs: Arc<dyn JobStore>,
    ) -> Result<Self, ProviderError> {
        let stories = StoryClient::with_settings(
            config.groq_api_key.clone(),
            config.story_api_url.clone(),
            config.story_model.clone(),
            config.max_output_tokens,
            config.request_timeout(),
        )?;
        let illustrations = IllustrationClient::with_settings(
            config.playground_api_key.clone(),
            config.image_api_url.clone(),
            config.image_width,
            config.image_height,
            config.request_timeout(),
        )?;
        let converter = CommandConverter::new(config.pdf_command.clone());
        info!(
            story_provider = stories.has_credentials(),
            image_provider = illustrations.has_credentials(),
            pdf_command = converter.program(),
            media_dir = %config.media_dir.display(),
            "book pipeline configured"
        );
        Ok(Self::new(
            stories,
            illustrations,
            converter,
            jobs,
            config.media_dir.clone(),
        ))
    }
}
