use super::matcher::PatternMatcher;
use super::scope::ScopeTracker;
use crate::config::ScrubConfig;
use crate::document_model::{HostDocument, MatchRule, Pattern, TextRegion};
use crate::error::{Result, ScrubError};
use log::{info, warn};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

/// Display flags of a document, saved before a run and restored after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub show_hidden_text: bool,
    pub screen_updating: bool,
}

impl ViewState {
    pub fn capture<D: HostDocument + ?Sized>(document: &D) -> Self {
        Self {
            show_hidden_text: document.show_hidden_text(),
            screen_updating: document.screen_updating(),
        }
    }

    fn apply<D: HostDocument + ?Sized>(&self, document: &mut D) {
        document.set_show_hidden_text(self.show_hidden_text);
        document.set_screen_updating(self.screen_updating);
    }
}

/// Shows hidden text and suspends redraw for as long as it lives.
struct ViewGuard<'a, D: HostDocument + ?Sized> {
    document: &'a mut D,
    saved: ViewState,
}

impl<'a, D: HostDocument + ?Sized> ViewGuard<'a, D> {
    fn acquire(document: &'a mut D) -> Self {
        let saved = ViewState::capture(document);
        document.set_screen_updating(false);
        document.set_show_hidden_text(true);
        Self { document, saved }
    }
}

impl<D: HostDocument + ?Sized> Deref for ViewGuard<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.document
    }
}

impl<D: HostDocument + ?Sized> DerefMut for ViewGuard<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.document
    }
}

impl<D: HostDocument + ?Sized> Drop for ViewGuard<'_, D> {
    fn drop(&mut self) {
        self.saved.apply(self.document);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemovalResult {
    pub count: usize,
    pub elapsed: Duration,
    /// Matches removed per pattern, in pattern order.
    pub per_pattern: Vec<(Pattern, usize)>,
    /// Regions abandoned at the attempt cap.
    pub degraded_regions: usize,
}

impl RemovalResult {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_millis() as f64 / 1000.0
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded_regions > 0
    }
}

impl fmt::Display for RemovalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deleted {} fragments", self.count)?;
        write!(f, "Time spent: {:.3} sec", self.seconds())?;
        if self.is_degraded() {
            write!(f, "\nIncomplete: {} region(s) stopped at the attempt limit", self.degraded_regions)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Tally {
    count: usize,
    per_pattern: Vec<(Pattern, usize)>,
    degraded_regions: usize,
}

/// Host-facing entry point: tracks the scope across selection changes and
/// removes every configured pattern from it on demand.
#[derive(Debug)]
pub struct RemovalEngine {
    tracker: ScopeTracker,
    patterns: Vec<(Pattern, MatchRule)>,
    matcher: PatternMatcher,
}

impl RemovalEngine {
    pub fn new(patterns: Vec<Pattern>, max_iterations: usize) -> Result<Self> {
        if patterns.is_empty() {
            return Err(ScrubError::InvalidPatternConfig("no patterns to remove".to_string()));
        }

        let patterns = patterns
            .into_iter()
            .map(|pattern| pattern.match_rule().map(|rule| (pattern, rule)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tracker: ScopeTracker::new(),
            patterns,
            matcher: PatternMatcher::new(max_iterations),
        })
    }

    pub fn from_config(config: &ScrubConfig) -> Result<Self> {
        Self::new(config.patterns()?, config.max_iterations)
    }

    pub fn tracker(&self) -> &ScopeTracker {
        &self.tracker
    }

    pub fn patterns(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter().map(|(pattern, _)| pattern)
    }

    /// Forwarded by the host on every selection change.
    pub fn notify_selection_changed<D: HostDocument + ?Sized>(&mut self, document: &mut D) {
        let selection = document.current_selection();
        if selection.is_caret() {
            self.tracker.clear(document);
        }
        self.tracker.on_selection_changed(document.whole_document_range(), &selection);
    }

    /// Invoked by the host's "process text" command.
    pub fn process_text<D: HostDocument + ?Sized>(&mut self, document: &mut D) -> Result<RemovalResult> {
        self.run(document)
    }

    pub fn run<D: HostDocument + ?Sized>(&mut self, document: &mut D) -> Result<RemovalResult> {
        let timer = Instant::now();
        let scope = self.tracker.snapshot();

        let outcome = self.remove_in_scope(document, &scope);
        // Regions in the scope are stale after a run, successful or not.
        self.tracker.clear(document);

        let tally = match outcome {
            Ok(tally) => tally,
            Err(err) => {
                warn!("Removal run aborted: {}", err);
                return Err(ScrubError::aborted(err));
            }
        };

        let elapsed = timer.elapsed();
        info!(
            "Removed {} match(es) from {} region(s) in {:?}",
            tally.count,
            scope.len(),
            elapsed
        );

        Ok(RemovalResult {
            count: tally.count,
            elapsed,
            per_pattern: tally.per_pattern,
            degraded_regions: tally.degraded_regions,
        })
    }

    fn remove_in_scope<D: HostDocument + ?Sized>(&self, document: &mut D, scope: &[TextRegion]) -> Result<Tally> {
        let mut view = ViewGuard::acquire(document);
        let mut tally = Tally::default();

        for (pattern, rule) in &self.patterns {
            let mut pattern_count = 0;
            for region in scope {
                let outcome = self.matcher.remove_all(&mut *view, region, rule)?;
                pattern_count += outcome.count;
                if outcome.capped {
                    tally.degraded_regions += 1;
                }
            }
            tally.count += pattern_count;
            tally.per_pattern.push((pattern.clone(), pattern_count));
        }

        Ok(tally)
    }
}
