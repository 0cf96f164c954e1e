use super::host::{HostDocument, HostError};
use super::pattern::MatchRule;
use super::region::{Selection, TextRegion};

const HIDDEN_OPEN: &str = "<hidden>";
const HIDDEN_CLOSE: &str = "</hidden>";

/// One edit, recorded so older region handles can be re-anchored.
#[derive(Debug, Clone, Copy)]
struct Edit {
    at: usize,
    removed: usize,
    inserted: usize,
}

impl Edit {
    fn map(&self, pos: usize) -> usize {
        if pos <= self.at {
            pos
        } else if pos >= self.at + self.removed {
            pos - self.removed + self.inserted
        } else {
            self.at
        }
    }
}

/// In-memory rich text: characters plus a per-character hidden attribute.
///
/// Offsets are character indices. A paragraph runs up to and including its
/// terminating `\n`.
#[derive(Debug, Clone)]
pub struct RichDocument {
    chars: Vec<char>,
    hidden: Vec<bool>,
    edits: Vec<Edit>,
    base_revision: u64,
    selection: (usize, usize),
    show_hidden_text: bool,
    screen_updating: bool,
}

impl RichDocument {
    pub fn new() -> Self {
        Self {
            chars: Vec::new(),
            hidden: Vec::new(),
            edits: Vec::new(),
            base_revision: 0,
            selection: (0, 0),
            show_hidden_text: false,
            screen_updating: true,
        }
    }

    pub fn from_plain(text: &str) -> Self {
        let mut doc = Self::new();
        doc.append(&normalize_line_endings(text), false);
        doc
    }

    /// Load text where `<hidden>...</hidden>` marks hidden runs. An unclosed
    /// tag hides everything after it.
    pub fn from_markup(markup: &str) -> Self {
        let mut doc = Self::new();
        doc.load_markup(&normalize_line_endings(markup));
        doc
    }

    fn load_markup(&mut self, markup: &str) {
        let mut rest = markup;
        while let Some(open) = rest.find(HIDDEN_OPEN) {
            self.append(&rest[..open], false);
            let after = &rest[open + HIDDEN_OPEN.len()..];
            match after.find(HIDDEN_CLOSE) {
                Some(close) => {
                    self.append(&after[..close], true);
                    rest = &after[close + HIDDEN_CLOSE.len()..];
                }
                None => {
                    self.append(after, true);
                    rest = "";
                }
            }
        }
        self.append(rest, false);
    }

    fn append(&mut self, text: &str, hidden: bool) {
        for ch in text.chars() {
            self.chars.push(ch);
            self.hidden.push(hidden);
        }
    }

    /// Replace the whole content. Every region issued before becomes stale.
    pub fn replace_content(&mut self, markup: &str) {
        self.base_revision = self.revision() + 1;
        self.edits.clear();
        self.chars.clear();
        self.hidden.clear();
        self.load_markup(&normalize_line_endings(markup));
        self.selection = (0, 0);
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(self.chars.len());
        let mut in_hidden = false;
        for (ch, &hidden) in self.chars.iter().zip(&self.hidden) {
            if hidden != in_hidden {
                out.push_str(if hidden { HIDDEN_OPEN } else { HIDDEN_CLOSE });
                in_hidden = hidden;
            }
            out.push(*ch);
        }
        if in_hidden {
            out.push_str(HIDDEN_CLOSE);
        }
        out
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn visible_text(&self) -> String {
        self.chars
            .iter()
            .zip(&self.hidden)
            .filter(|(_, hidden)| !**hidden)
            .map(|(ch, _)| *ch)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.base_revision + self.edits.len() as u64
    }

    /// Issue a handle for `[start, end)` at the current revision.
    pub fn region(&self, start: usize, end: usize) -> TextRegion {
        TextRegion::at_revision(start, end, self.revision())
    }

    pub fn paragraphs(&self) -> Vec<TextRegion> {
        let mut paragraphs = Vec::new();
        let mut start = 0;
        for (idx, ch) in self.chars.iter().enumerate() {
            if *ch == '\n' {
                paragraphs.push(self.region(start, idx + 1));
                start = idx + 1;
            }
        }
        if start < self.chars.len() || paragraphs.is_empty() {
            paragraphs.push(self.region(start, self.chars.len()));
        }
        paragraphs
    }

    pub fn select(&mut self, start: usize, end: usize) {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let len = self.len();
        self.selection = (start.min(len), end.min(len));
    }

    pub fn selection_bounds(&self) -> (usize, usize) {
        self.selection
    }

    pub fn set_hidden(&mut self, start: usize, end: usize, hidden: bool) {
        let end = end.min(self.len());
        for flag in self.hidden.iter_mut().take(end).skip(start) {
            *flag = hidden;
        }
    }

    pub fn insert_text(&mut self, at: usize, text: &str, hidden: bool) {
        let at = at.min(self.len());
        let inserted: Vec<char> = normalize_line_endings(text).chars().collect();
        let count = inserted.len();
        if count == 0 {
            return;
        }
        self.chars.splice(at..at, inserted);
        self.hidden.splice(at..at, std::iter::repeat_n(hidden, count));
        self.record(Edit {
            at,
            removed: 0,
            inserted: count,
        });
    }

    pub fn delete(&mut self, start: usize, end: usize) {
        let end = end.min(self.len());
        if start >= end {
            return;
        }
        self.chars.drain(start..end);
        self.hidden.drain(start..end);
        self.record(Edit {
            at: start,
            removed: end - start,
            inserted: 0,
        });
    }

    fn record(&mut self, edit: Edit) {
        self.selection = (edit.map(self.selection.0), edit.map(self.selection.1));
        self.edits.push(edit);
    }

    /// Map a handle onto current offsets by replaying the edits made since it
    /// was issued.
    pub fn resolve(&self, region: &TextRegion) -> Result<(usize, usize), HostError> {
        let revision = region.revision();
        if revision < self.base_revision || revision > self.revision() || region.start > region.end {
            return Err(HostError::StaleRegion(*region));
        }

        let skip = (revision - self.base_revision) as usize;
        let (mut start, mut end) = region.bounds();
        for edit in &self.edits[skip..] {
            start = edit.map(start);
            end = edit.map(end);
        }

        if end > self.len() {
            return Err(HostError::StaleRegion(*region));
        }
        Ok((start, end))
    }

    fn paragraph_at(&self, pos: usize) -> TextRegion {
        let paragraphs = self.paragraphs();
        paragraphs
            .iter()
            .copied()
            .find(|p| p.start <= pos && pos < p.end)
            .or_else(|| paragraphs.last().copied())
            .unwrap_or_else(|| self.region(0, 0))
    }

    fn find_hidden_run(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let first = (start..end).find(|&i| self.hidden[i])?;
        let last = (first..end).find(|&i| !self.hidden[i]).unwrap_or(end);
        Some((first, last))
    }

    fn find_wildcard(&self, regex: &regex::Regex, start: usize, end: usize) -> Option<(usize, usize)> {
        let text: String = self.chars[start..end].iter().collect();
        let mat = regex.find(&text)?;
        let match_start = start + text[..mat.start()].chars().count();
        let match_end = match_start + mat.as_str().chars().count();
        Some((match_start, match_end))
    }
}

impl Default for RichDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDocument for RichDocument {
    fn whole_document_range(&self) -> TextRegion {
        self.region(0, self.len())
    }

    fn current_selection(&self) -> Selection {
        let (start, end) = self.selection;
        let paragraphs = if start == end {
            vec![self.paragraph_at(start)]
        } else {
            self.paragraphs()
                .into_iter()
                .filter(|p| p.start < end && p.end > start)
                .collect()
        };
        Selection::new(start, end, paragraphs)
    }

    fn find_and_replace_one(&mut self, region: &TextRegion, rule: &MatchRule) -> Result<bool, HostError> {
        let (start, end) = self.resolve(region)?;

        let found = match rule {
            // Hidden runs are not addressable while they are not displayed.
            MatchRule::Hidden if !self.show_hidden_text => None,
            MatchRule::Hidden => self.find_hidden_run(start, end),
            MatchRule::Wildcard(regex) => self.find_wildcard(regex, start, end),
        };

        match found {
            Some((match_start, match_end)) => {
                self.delete(match_start, match_end);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn show_hidden_text(&self) -> bool {
        self.show_hidden_text
    }

    fn set_show_hidden_text(&mut self, show: bool) {
        self.show_hidden_text = show;
    }

    fn screen_updating(&self) -> bool {
        self.screen_updating
    }

    fn set_screen_updating(&mut self, enabled: bool) {
        self.screen_updating = enabled;
    }

    fn collapse_selection_to_caret(&mut self) {
        self.selection.1 = self.selection.0;
    }

    // Drop the edit log; only handles issued from here on stay resolvable.
    fn release_regions(&mut self) {
        self.base_revision = self.revision();
        self.edits.clear();
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::Pattern;

    fn bracket_rule() -> MatchRule {
        Pattern::from_delimiters("{}").unwrap().match_rule().unwrap()
    }

    #[test]
    fn test_markup_round_trip() {
        let markup = "visible <hidden>HIDDEN</hidden> rest";
        let doc = RichDocument::from_markup(markup);
        assert_eq!(doc.text(), "visible HIDDEN rest");
        assert_eq!(doc.visible_text(), "visible  rest");
        assert_eq!(doc.to_markup(), markup);
    }

    #[test]
    fn test_unclosed_hidden_tag() {
        let doc = RichDocument::from_markup("a<hidden>bc");
        assert_eq!(doc.visible_text(), "a");
        assert_eq!(doc.to_markup(), "a<hidden>bc</hidden>");
    }

    #[test]
    fn test_paragraphs_include_mark() {
        let doc = RichDocument::from_plain("one\r\ntwo\nthree");
        let bounds: Vec<_> = doc.paragraphs().iter().map(|p| p.bounds()).collect();
        assert_eq!(bounds, vec![(0, 4), (4, 8), (8, 13)]);

        let empty = RichDocument::new();
        assert_eq!(empty.paragraphs(), vec![TextRegion::new(0, 0)]);
    }

    #[test]
    fn test_selection_paragraphs() {
        let mut doc = RichDocument::from_plain("one\ntwo\nthree\nfour");
        doc.select(5, 9);
        let sel = doc.current_selection();
        assert_eq!(sel.start, 5);
        assert_eq!(sel.end, 9);
        assert_eq!(sel.paragraphs, vec![TextRegion::new(4, 8), TextRegion::new(8, 14)]);

        doc.select(10, 10);
        assert_eq!(doc.current_selection().paragraphs, vec![TextRegion::new(8, 14)]);
    }

    #[test]
    fn test_wildcard_replace_one_at_a_time() {
        let mut doc = RichDocument::from_plain("{a}{b}");
        let region = doc.whole_document_range();
        let rule = bracket_rule();
        assert!(doc.find_and_replace_one(&region, &rule).unwrap());
        assert_eq!(doc.text(), "{b}");
        assert!(doc.find_and_replace_one(&region, &rule).unwrap());
        assert_eq!(doc.text(), "");
        assert!(!doc.find_and_replace_one(&region, &rule).unwrap());
    }

    #[test]
    fn test_region_follows_earlier_edits() {
        let mut doc = RichDocument::from_plain("x{1}\ny{2}\n");
        let second = doc.region(5, 10);
        let first = doc.region(0, 5);
        let rule = bracket_rule();

        assert!(doc.find_and_replace_one(&first, &rule).unwrap());
        assert_eq!(doc.resolve(&second).unwrap(), (2, 7));
        // The first paragraph shrank; it must not reach into the second one.
        assert!(!doc.find_and_replace_one(&first, &rule).unwrap());
        assert!(doc.find_and_replace_one(&second, &rule).unwrap());
        assert_eq!(doc.text(), "x\ny\n");
    }

    #[test]
    fn test_hidden_not_addressable_unless_shown() {
        let mut doc = RichDocument::from_markup("a<hidden>b</hidden>c");
        let region = doc.whole_document_range();
        assert!(!doc.find_and_replace_one(&region, &MatchRule::Hidden).unwrap());

        doc.set_show_hidden_text(true);
        assert!(doc.find_and_replace_one(&region, &MatchRule::Hidden).unwrap());
        assert_eq!(doc.text(), "ac");
    }

    #[test]
    fn test_stale_regions() {
        let mut doc = RichDocument::from_plain("short");
        let bogus = doc.region(2, 40);
        assert!(matches!(
            doc.find_and_replace_one(&bogus, &bracket_rule()),
            Err(HostError::StaleRegion(_))
        ));

        let region = doc.whole_document_range();
        doc.replace_content("new text");
        assert!(matches!(doc.resolve(&region), Err(HostError::StaleRegion(_))));
    }

    #[test]
    fn test_release_regions_compacts_edit_log() {
        let mut doc = RichDocument::from_plain("a{1}b{2}c");
        let old = doc.whole_document_range();
        let rule = bracket_rule();
        assert!(doc.find_and_replace_one(&old, &rule).unwrap());
        assert_eq!(doc.edits.len(), 1);

        let current = doc.whole_document_range();
        doc.release_regions();
        assert!(doc.edits.is_empty());
        assert!(matches!(doc.resolve(&old), Err(HostError::StaleRegion(_))));
        assert_eq!(doc.resolve(&current).unwrap(), (0, 6));

        assert!(doc.find_and_replace_one(&current, &rule).unwrap());
        assert_eq!(doc.text(), "abc");
    }

    #[test]
    fn test_set_hidden_marks_range() {
        let mut doc = RichDocument::from_plain("plain words");
        doc.set_hidden(6, 11, true);
        assert_eq!(doc.visible_text(), "plain ");
        assert_eq!(doc.to_markup(), "plain <hidden>words</hidden>");

        doc.set_hidden(0, 40, false);
        assert_eq!(doc.visible_text(), "plain words");
    }

    #[test]
    fn test_insert_shifts_selection() {
        let mut doc = RichDocument::from_plain("hello world");
        doc.select(6, 11);
        doc.insert_text(0, ">> ", false);
        assert_eq!(doc.selection_bounds(), (9, 14));
        doc.collapse_selection_to_caret();
        assert_eq!(doc.selection_bounds(), (9, 9));
    }
}
