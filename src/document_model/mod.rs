/// Document model subsystem - regions, patterns and the host document seam
///
/// The engine never owns text. It works through `HostDocument`, which hands out
/// region handles and performs every mutation. `RichDocument` is the in-memory
/// host used by the command-line front end and the tests.

pub mod host;
pub mod pattern;
pub mod region;
pub mod rich_text;

// Re-export main types for convenience
pub use host::{HostDocument, HostError};
pub use pattern::{MatchRule, Pattern};
pub use region::{Selection, TextRegion};
pub use rich_text::RichDocument;
