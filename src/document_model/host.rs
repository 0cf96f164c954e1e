use super::pattern::MatchRule;
use super::region::{Selection, TextRegion};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("region {0} no longer maps onto the document")]
    StaleRegion(TextRegion),
    #[error("{0}")]
    Transient(String),
}

/// Operations the engine needs from the document it edits.
///
/// The host owns all text. Regions it hands out stay meaningful across its own
/// edits: `find_and_replace_one` is expected to re-anchor a region that was
/// issued before earlier replacements.
pub trait HostDocument {
    fn whole_document_range(&self) -> TextRegion;

    fn current_selection(&self) -> Selection;

    /// Find the leftmost match of `rule` inside `region` and delete it.
    /// Returns `Ok(false)` once the region holds no further match.
    fn find_and_replace_one(&mut self, region: &TextRegion, rule: &MatchRule) -> Result<bool, HostError>;

    fn show_hidden_text(&self) -> bool;
    fn set_show_hidden_text(&mut self, show: bool);

    fn screen_updating(&self) -> bool;
    fn set_screen_updating(&mut self, enabled: bool);

    fn collapse_selection_to_caret(&mut self);

    /// Called once the engine holds no region handles. Handles issued before
    /// this call may be reported stale afterwards.
    fn release_regions(&mut self) {}
}
