pub mod fallback;
pub mod handlers;
pub mod interviewer;
pub mod models;
pub mod parser;
pub mod phase;
pub mod prompts;
pub mod store;
pub mod tracker;

pub use interviewer::{InterviewError, Interviewer};
