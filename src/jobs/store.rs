//! Armazenamento em memória dos registros de job.
//!
//! O orquestrador recebe um [`JobStore`] injetado em vez de um mapa global.
//! Cada job escreve apenas a sua própria chave; leituras concorrentes podem
//! ver o registro anterior a uma escrita em andamento. Nada sobrevive a um
//! reinício do processo.

use dashmap::DashMap;
use uuid::Uuid;

use super::job::Job;

/// Keyed storage for job records.
pub trait JobStore: Send + Sync {
    /// Inserts or replaces the record under `job.id`.
    fn put(&self, job: Job);

    /// Snapshot of the record, if the id is known.
    fn get(&self, id: &Uuid) -> Option<Job>;

    /// Replaces the record only if it still equals `current`.
    fn compare_and_swap(&self, id: &Uuid, current: &Job, next: Job) -> bool;
}

/// [`JobStore`] backed by a sharded concurrent map.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: DashMap<Uuid, Job>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl JobStore for MemoryJobStore {
    fn put(&self, job: Job) {
        self.jobs.insert(job.id, job);
    }

    fn get(&self, id: &Uuid) -> Option<Job> {
        self.jobs.get(id).map(|entry| entry.value().clone())
    }

    fn compare_and_swap(&self, id: &Uuid, current: &Job, next: Job) -> bool {
        match self.jobs.get_mut(id) {
            Some(mut entry) if *entry == *current => {
                *entry = next;
                true
            }
            _ => false,
        }
    }
}
