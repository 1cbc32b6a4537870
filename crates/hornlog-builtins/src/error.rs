//! Built-in-local error detail, folded into `ResolveError::Builtin` at the
//! call site (spec.md §7: built-in errors carry "a contextual message
//! identifying the built-in and argument position").
//!
//! Grounded on `plotnik-lib`'s pattern of a small per-crate `thiserror`
//! enum with `#[from]` conversions into the shared runtime error, rather
//! than building ad-hoc strings inline at every call site.

use hornlog_resolver::ResolveError;

#[derive(thiserror::Error, Debug, Clone)]
pub enum BuiltinError {
    #[error("arg #{position}: expected {expected}, got {got}")]
    TypeMismatch {
        position: usize,
        expected: &'static str,
        got: String,
    },

    #[error("arg #{position}: expected a proper list")]
    NotAProperList { position: usize },

    #[error("arg #{position}: nonground term")]
    NonGround { position: usize },

    #[error("unknown operator {0}")]
    UnknownOperator(String),

    #[error("malformed AST: {0}")]
    MalformedAst(#[from] hornlog_compile::CompileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Attach the offending built-in's indicator text to a `BuiltinError`,
/// producing the `ResolveError` the resolver actually propagates.
pub fn resolve_error(indicator: &str, e: impl Into<BuiltinError>) -> ResolveError {
    ResolveError::builtin(indicator, e.into().to_string())
}
