//! Error kinds for the resolver (spec.md §7).
//!
//! Grounded on `plotnik-lib::engine::error::RuntimeError`: a small
//! `thiserror`-derived enum, one `#[error("...")]` variant per failure
//! mode, no stringly-typed errors.

use hornlog_core::Indicator;

#[derive(thiserror::Error, Debug, Clone)]
pub enum ResolveError {
    /// The goal's indicator is not present in the database. Fatal to the
    /// current search.
    #[error("unknown predicate {0}")]
    UnknownPredicate(String),

    /// Bound exceeded. Fatal to the current search.
    #[error("max depth ({0}) reached")]
    MaxDepthReached(u32),

    /// Internal signal used to end iteration after `limit`; not surfaced
    /// to the user (the iterator simply terminates).
    #[error("max solutions reached")]
    MaxSolutionsReached,

    /// The consumer asked to end (dropped the iterator / returned `false`
    /// from a yield callback). Identical semantics to max solutions.
    #[error("stop iteration requested")]
    StopIteration,

    /// Type mismatch, nonground arithmetic, malformed AST, failed file
    /// read, etc. Carries the built-in's indicator and argument position.
    #[error("built-in error in {indicator}: {message}")]
    Builtin { indicator: String, message: String },
}

impl ResolveError {
    pub fn unknown_predicate(ind: Indicator, interner: &hornlog_core::Interner) -> Self {
        ResolveError::UnknownPredicate(ind.display(interner).to_string())
    }

    pub fn builtin(indicator: &str, message: impl Into<String>) -> Self {
        ResolveError::Builtin {
            indicator: indicator.to_string(),
            message: message.into(),
        }
    }

    /// Errors that should never be surfaced to the end user as a search
    /// failure — they are internal bookkeeping signals that simply end
    /// iteration (spec.md §7).
    pub fn is_internal_signal(&self) -> bool {
        matches!(
            self,
            ResolveError::MaxSolutionsReached | ResolveError::StopIteration
        )
    }
}
