//! Engine and storage error types.
//!
//! Configuration errors are raised while building an [`EngineConfig`] so a
//! broken dataset fails at startup instead of halfway through a suggestion.
//!
//! [`EngineConfig`]: crate::engine::EngineConfig

use thiserror::Error;

/// Errors in the lexicon/rule dataset for a grade band.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A lexicon category the engine needs has no entry for the grade band.
    #[error("lexicon category {category} is missing for grade band {grade}")]
    MissingCategory { category: String, grade: String },

    /// A lexicon category exists but holds no words.
    #[error("lexicon category {category} is empty for grade band {grade}")]
    EmptyCategory { category: String, grade: String },

    /// A rule template refers to a placeholder the renderer does not know.
    #[error("rule {rule:?} uses unknown placeholder 【{placeholder}】")]
    UnknownPlaceholder { rule: String, placeholder: String },

    /// A resource row names a category outside the closed set.
    #[error("unknown lexicon category: {0}")]
    UnknownCategory(String),

    /// A rule row names a rule type outside the four rubric families.
    #[error("unknown rule type: {0}")]
    UnknownRuleType(String),
}

/// Errors from the practice record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store handle was already closed.
    #[error("record store is unavailable (handle closed)")]
    Unavailable,

    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row could not be decoded.
    #[error("invalid practice record: {0}")]
    InvalidRecord(String),
}

impl StoreError {
    /// Returns `true` if the store must be reopened before it can be used again.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable)
    }
}
