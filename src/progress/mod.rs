//! Live text progress for long-running operations.
pub mod render;
pub mod reporter;

pub use render::{render_frame, BAR_WIDTH};
pub use reporter::{ProgressReporter, DEFAULT_POLL_INTERVAL};
