use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle to a contiguous span of document text, in character offsets.
///
/// `start` and `end` are the bounds recorded when the handle was issued. The
/// document that issued it stamps its revision so it can re-anchor the span
/// after later edits; the recorded bounds themselves never move.
#[derive(Debug, Clone, Copy)]
pub struct TextRegion {
    pub start: usize,
    pub end: usize,
    revision: u64,
}

impl TextRegion {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            revision: 0,
        }
    }

    pub(crate) fn at_revision(start: usize, end: usize, revision: u64) -> Self {
        Self {
            start,
            end,
            revision,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

// Two handles denote the same region when their bounds match, whichever
// revision issued them.
impl PartialEq for TextRegion {
    fn eq(&self, other: &Self) -> bool {
        self.bounds() == other.bounds()
    }
}

impl Eq for TextRegion {}

impl Hash for TextRegion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bounds().hash(state);
    }
}

impl fmt::Display for TextRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.start, self.end)
    }
}

/// The host's current selection: its bounds and the paragraphs it touches.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub paragraphs: Vec<TextRegion>,
}

impl Selection {
    pub fn new(start: usize, end: usize, paragraphs: Vec<TextRegion>) -> Self {
        Self {
            start,
            end,
            paragraphs,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}
