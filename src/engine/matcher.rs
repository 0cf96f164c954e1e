use crate::document_model::{HostDocument, HostError, MatchRule, TextRegion};
use crate::error::Result;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    pub count: usize,
    /// The attempt cap was hit before the region reported no further match.
    pub capped: bool,
}

/// Removes every match of a rule inside one region, one replacement at a time.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    max_iterations: usize,
}

impl PatternMatcher {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn remove_all<D: HostDocument + ?Sized>(
        &self,
        document: &mut D,
        region: &TextRegion,
        rule: &MatchRule,
    ) -> Result<MatchOutcome> {
        let mut count = 0;

        for _ in 0..self.max_iterations {
            match document.find_and_replace_one(region, rule) {
                Ok(true) => count += 1,
                Ok(false) => return Ok(MatchOutcome { count, capped: false }),
                // A failed attempt counts as a hit for loop purposes; retry.
                Err(HostError::Transient(msg)) => {
                    warn!("find/replace in {} failed, retrying: {}", region, msg);
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            "giving up on region {} after {} attempts ({} removed)",
            region, self.max_iterations, count
        );
        Ok(MatchOutcome { count, capped: true })
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ITERATIONS)
    }
}
