use crate::document_model::{HostError, TextRegion};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("Invalid pattern configuration: {0}")]
    InvalidPatternConfig(String),

    #[error("Region [{start}:{end}] no longer matches the document")]
    StaleRegion { start: usize, end: usize },

    #[error("Find/replace attempt failed: {0}")]
    TransientMatchFailure(String),

    #[error("Processing aborted: {source}")]
    RunAborted {
        #[source]
        source: Box<ScrubError>,
    },
}

impl ScrubError {
    pub fn aborted(cause: ScrubError) -> Self {
        match cause {
            already @ ScrubError::RunAborted { .. } => already,
            other => ScrubError::RunAborted {
                source: Box::new(other),
            },
        }
    }

    pub fn stale(region: TextRegion) -> Self {
        ScrubError::StaleRegion {
            start: region.start,
            end: region.end,
        }
    }
}

impl From<HostError> for ScrubError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::StaleRegion(region) => ScrubError::stale(region),
            HostError::Transient(msg) => ScrubError::TransientMatchFailure(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
