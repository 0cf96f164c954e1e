use crate::document_model::{HostDocument, Selection, TextRegion};
use log::{debug, trace};
use std::collections::HashSet;

pub type Scope = Vec<TextRegion>;

/// Collects the regions a removal run will visit, in the order they were
/// first selected, with no two regions sharing the same bounds.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    regions: Vec<TextRegion>,
    seen: HashSet<TextRegion>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_selection_changed(&mut self, whole_document: TextRegion, selection: &Selection) {
        // A bare caret selects nothing, even at either end of the document.
        if selection.is_caret() {
            return;
        }

        // Touching either end of the document means the whole document.
        if selection.start == whole_document.start || selection.end == whole_document.end {
            self.reset();
            self.push(whole_document);
            debug!("Scope set to whole document {}", whole_document);
            return;
        }

        for paragraph in &selection.paragraphs {
            if self.push(*paragraph) {
                debug!("Added para: {}", paragraph);
            }
        }
    }

    /// Empty the scope and collapse the document's selection to a caret.
    pub fn clear<D: HostDocument + ?Sized>(&mut self, document: &mut D) {
        self.reset();
        document.collapse_selection_to_caret();
        document.release_regions();
        trace!("Clear selection");
    }

    pub fn snapshot(&self) -> Scope {
        self.regions.clone()
    }

    pub fn regions(&self) -> &[TextRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn push(&mut self, region: TextRegion) -> bool {
        if !self.seen.insert(region) {
            return false;
        }
        self.regions.push(region);
        true
    }

    fn reset(&mut self) {
        self.regions.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::RichDocument;

    const TEXT: &str = "first\nsecond\nthird\nfourth\n";

    fn select(doc: &mut RichDocument, tracker: &mut ScopeTracker, start: usize, end: usize) {
        doc.select(start, end);
        let selection = doc.current_selection();
        tracker.on_selection_changed(doc.whole_document_range(), &selection);
    }

    #[test]
    fn test_paragraphs_added_in_order() {
        let mut doc = RichDocument::from_plain(TEXT);
        let mut tracker = ScopeTracker::new();

        select(&mut doc, &mut tracker, 14, 16);
        select(&mut doc, &mut tracker, 7, 9);

        assert_eq!(tracker.regions(), &[TextRegion::new(13, 19), TextRegion::new(6, 13)]);
    }

    #[test]
    fn test_duplicate_paragraph_added_once() {
        let mut doc = RichDocument::from_plain(TEXT);
        let mut tracker = ScopeTracker::new();

        select(&mut doc, &mut tracker, 7, 9);
        select(&mut doc, &mut tracker, 8, 11);

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.snapshot(), vec![TextRegion::new(6, 13)]);
    }

    #[test]
    fn test_selection_at_document_start_takes_whole_document() {
        let mut doc = RichDocument::from_plain(TEXT);
        let mut tracker = ScopeTracker::new();

        select(&mut doc, &mut tracker, 7, 9);
        select(&mut doc, &mut tracker, 0, 10);

        assert_eq!(tracker.snapshot(), vec![TextRegion::new(0, TEXT.len())]);
    }

    #[test]
    fn test_selection_at_document_end_takes_whole_document() {
        let mut doc = RichDocument::from_plain(TEXT);
        let mut tracker = ScopeTracker::new();

        select(&mut doc, &mut tracker, 20, TEXT.len());

        assert_eq!(tracker.snapshot(), vec![TextRegion::new(0, TEXT.len())]);
    }

    #[test]
    fn test_caret_adds_nothing() {
        let mut doc = RichDocument::from_plain(TEXT);
        let mut tracker = ScopeTracker::new();

        select(&mut doc, &mut tracker, 8, 8);
        select(&mut doc, &mut tracker, 0, 0);
        select(&mut doc, &mut tracker, TEXT.len(), TEXT.len());

        assert!(tracker.is_empty());
    }

    #[test]
    fn test_clear_empties_scope_and_collapses_selection() {
        let mut doc = RichDocument::from_plain(TEXT);
        let mut tracker = ScopeTracker::new();

        select(&mut doc, &mut tracker, 7, 16);
        assert_eq!(tracker.len(), 2);

        tracker.clear(&mut doc);
        assert!(tracker.snapshot().is_empty());
        assert_eq!(doc.selection_bounds(), (7, 7));

        // Regions are accepted again after a clear.
        select(&mut doc, &mut tracker, 7, 9);
        assert_eq!(tracker.len(), 1);
    }
}
