//! Output formatting for evaluation results.

pub mod json;
pub mod log;
pub mod terminal;

pub use json::{to_json, to_json_pretty};
pub use log::SampleLog;
pub use terminal::format_evaluation;
