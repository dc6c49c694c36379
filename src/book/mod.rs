mod request;
mod story;

pub use request::{BookRequest, RequestError};
pub use story::{Page, Story, StoryDraft};
