//! Console and file status output.
//!
//! - [`status`] - bracketed, colored status lines with optional file write-through

mod status;

// Re-export public types
pub use status::{Status, StatusSink};
