//! Removes hidden text and bracketed fragments from the selected parts of a
//! rich-text document.
//!
//! A host forwards selection changes to [`RemovalEngine::notify_selection_changed`]
//! and triggers [`RemovalEngine::process_text`]; all document access goes
//! through the [`HostDocument`] trait.

pub mod config;
pub mod document_model;
pub mod engine;
pub mod error;

pub use config::{RcLoader, ScrubConfig};
pub use document_model::{HostDocument, HostError, MatchRule, Pattern, RichDocument, Selection, TextRegion};
pub use engine::{PatternMatcher, RemovalEngine, RemovalResult, ScopeTracker};
pub use error::{Result, ScrubError};
