mod job;
mod state;
mod store;

pub use job::Job;
pub use state::{JobStatus, TransitionError};
pub use store::{JobStore, MemoryJobStore};
