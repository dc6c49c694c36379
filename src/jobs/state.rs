//! Ciclo de vida de um job de livro.
//!
//! [`JobStatus`] só avança um passo por vez, na ordem do pipeline, ou cai em
//! `error` a partir de qualquer estado não terminal. `done` e `error` são
//! terminais.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The stages of a book job.
///
/// Each job flows through: QUEUED → GENERATING_TEXT → GENERATING_IMAGES →
/// BUILDING_PDF → DONE, and may drop into ERROR from any non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    GeneratingText,
    GeneratingImages,
    BuildingPdf,
    Done,
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::GeneratingText => write!(f, "generating_text"),
            JobStatus::GeneratingImages => write!(f, "generating_images"),
            JobStatus::BuildingPdf => write!(f, "building_pdf"),
            JobStatus::Done => write!(f, "done"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// A transition the state machine refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("invalid job transition {from} -> {to}")]
    Invalid { from: JobStatus, to: JobStatus },

    #[error("progress can only change while generating images (status is {0})")]
    ProgressOutsideImages(JobStatus),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// The stage that must come right after this one on the happy path.
    pub fn next(&self) -> Option<JobStatus> {
        match self {
            JobStatus::Queued => Some(JobStatus::GeneratingText),
            JobStatus::GeneratingText => Some(JobStatus::GeneratingImages),
            JobStatus::GeneratingImages => Some(JobStatus::BuildingPdf),
            JobStatus::BuildingPdf => Some(JobStatus::Done),
            JobStatus::Done | JobStatus::Error => None,
        }
    }

    /// Forward-only: the next stage, or `Error` from any non-terminal stage.
    pub fn can_transition_to(&self, to: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == JobStatus::Error || self.next() == Some(to)
    }

    /// Validates a transition, returning the target on success.
    pub fn transition(&self, to: JobStatus) -> Result<JobStatus, TransitionError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(TransitionError::Invalid { from: *self, to })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [JobStatus; 6] = [
        JobStatus::Queued,
        JobStatus::GeneratingText,
        JobStatus::GeneratingImages,
        JobStatus::BuildingPdf,
        JobStatus::Done,
        JobStatus::Error,
    ];

    #[test]
    fn happy_path_walks_all_states() {
        let mut status = JobStatus::Queued;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            status = status.transition(next).unwrap();
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                JobStatus::Queued,
                JobStatus::GeneratingText,
                JobStatus::GeneratingImages,
                JobStatus::BuildingPdf,
                JobStatus::Done,
            ]
        );
    }

    #[test]
    fn error_reachable_from_every_non_terminal_state() {
        for status in ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(JobStatus::Error), "{status}");
        }
    }

    #[test]
    fn terminal_states_are_final() {
        for to in ALL {
            assert!(!JobStatus::Done.can_transition_to(to));
            assert!(!JobStatus::Error.can_transition_to(to));
        }
    }

    #[test]
    fn no_backward_or_skipping_transitions() {
        assert_eq!(
            JobStatus::BuildingPdf.transition(JobStatus::GeneratingText),
            Err(TransitionError::Invalid {
                from: JobStatus::BuildingPdf,
                to: JobStatus::GeneratingText,
            })
        );
        assert!(!JobStatus::Queued.can_transition_to(JobStatus::BuildingPdf));
        assert!(!JobStatus::GeneratingImages.can_transition_to(JobStatus::GeneratingImages));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&JobStatus::GeneratingImages).unwrap();
        assert_eq!(json, r#""generating_images""#);
        for status in ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.to_string());
        }
    }
}
