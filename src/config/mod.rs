/// Configuration subsystem - removal settings
///
/// This module handles loading settings from .scrubrc files and turning them
/// into the ordered pattern list the engine runs.

pub mod rc;

// Re-export public interface
pub use rc::{DEFAULT_MAX_ITERATIONS, RcLoader, ScrubConfig};
