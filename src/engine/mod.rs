/// Removal engine - scope tracking and repeated find/replace passes
///
/// `ScopeTracker` turns selection changes into a deduplicated list of regions,
/// `PatternMatcher` empties one region of one pattern, and `RemovalEngine`
/// drives both for a whole run.

pub mod matcher;
pub mod removal;
pub mod scope;

pub use matcher::{MatchOutcome, PatternMatcher};
pub use removal::{RemovalEngine, RemovalResult, ViewState};
pub use scope::{Scope, ScopeTracker};
