//! Registro de status de um job, como devolvido pela consulta de status.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::{JobStatus, TransitionError};

/// Status record of one book job, as returned by the status endpoint.
///
/// `progress` only exists while images are generated, `error` only in the
/// `error` state and `download` only once the PDF is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// A freshly accepted job, already `queued`.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Queued,
            progress: None,
            error: None,
            download: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves to `to`; entering `generating_images` starts progress at 0.
    pub fn advance(&mut self, to: JobStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(to)?;
        self.progress = (to == JobStatus::GeneratingImages).then_some(0);
        self.touch();
        Ok(())
    }

    pub fn set_progress(&mut self, percent: u8) -> Result<(), TransitionError> {
        if self.status != JobStatus::GeneratingImages {
            return Err(TransitionError::ProgressOutsideImages(self.status));
        }
        self.progress = Some(percent.min(100));
        self.touch();
        Ok(())
    }

    /// `building_pdf` → `done`, recording where the artifact lives.
    pub fn complete(&mut self, artifact: PathBuf) -> Result<(), TransitionError> {
        self.advance(JobStatus::Done)?;
        self.download = Some(artifact);
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), TransitionError> {
        self.advance(JobStatus::Error)?;
        self.error = Some(message.into());
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_at(status: JobStatus) -> Job {
        let mut job = Job::new();
        while job.status != status {
            let next = job.status.next().unwrap();
            job.advance(next).unwrap();
        }
        job
    }

    #[test]
    fn job_creation_defaults() {
        let job = Job::new();
        assert_eq!(job.status, JobStatus::Queued);
        assert!(job.progress.is_none());
        assert!(job.error.is_none());
        assert!(job.download.is_none());
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Job::new().id, Job::new().id);
    }

    #[test]
    fn progress_lives_only_in_image_stage() {
        let mut job = job_at(JobStatus::GeneratingImages);
        assert_eq!(job.progress, Some(0));

        job.set_progress(50).unwrap();
        assert_eq!(job.progress, Some(50));

        job.advance(JobStatus::BuildingPdf).unwrap();
        assert!(job.progress.is_none());
        assert_eq!(
            job.set_progress(10),
            Err(TransitionError::ProgressOutsideImages(JobStatus::BuildingPdf))
        );
    }

    #[test]
    fn progress_is_capped() {
        let mut job = job_at(JobStatus::GeneratingImages);
        job.set_progress(250).unwrap();
        assert_eq!(job.progress, Some(100));
    }

    #[test]
    fn complete_records_download() {
        let mut job = job_at(JobStatus::BuildingPdf);
        job.complete(PathBuf::from("media/x/Ana_x.pdf")).unwrap();
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.download, Some(PathBuf::from("media/x/Ana_x.pdf")));
    }

    #[test]
    fn complete_requires_building_pdf() {
        let mut job = job_at(JobStatus::GeneratingText);
        assert!(job.complete(PathBuf::from("x.pdf")).is_err());
        assert!(job.download.is_none());
    }

    #[test]
    fn fail_from_image_stage_drops_progress() {
        let mut job = job_at(JobStatus::GeneratingImages);
        job.set_progress(75).unwrap();
        job.fail("network error: boom").unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert_eq!(job.error.as_deref(), Some("network error: boom"));
        assert!(job.progress.is_none());
    }

    #[test]
    fn cannot_fail_twice() {
        let mut job = Job::new();
        job.fail("first").unwrap();
        assert!(job.fail("second").is_err());
        assert_eq!(job.error.as_deref(), Some("first"));
    }

    #[test]
    fn serialization_skips_absent_fields() {
        let job = Job::new();
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["status"], "queued");
        assert!(value.get("progress").is_none());
        assert!(value.get("error").is_none());
        assert!(value.get("download").is_none());
    }

    #[test]
    fn job_serialization_roundtrip() {
        let mut job = job_at(JobStatus::GeneratingImages);
        job.set_progress(25).unwrap();
        let json = serde_json::to_string(&job).unwrap();
        let parsed: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, job);
    }
}
