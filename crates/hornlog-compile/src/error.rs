//! Compiler errors (spec.md §4.6, §7).
//!
//! Grounded on `plotnik-compiler::compile::error`: a `thiserror`-derived
//! enum, one variant per malformed AST shape, each carrying the offending
//! indicator so the caller can report exactly which sub-term was bad.

use hornlog_core::Indicator;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("{context}: expected an atom")]
    NotAnAtom { context: String },

    #[error("{context}: expected an int")]
    NotAnInt { context: String },

    #[error("{context}: expected a struct")]
    NotAStruct { context: String },

    #[error("{context}: expected a proper list")]
    NotAProperList { context: String },

    #[error("{context}: expected functor {expected} (found {found})")]
    WrongFunctor {
        context: String,
        expected: String,
        found: String,
    },

    #[error("compileRule: unimplemented rule type: {0}")]
    UnimplementedRule(String),

    #[error("compileTerm: unimplemented term type: {0}")]
    UnimplementedTerm(String),

    #[error("at #{index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    pub fn wrong_functor(context: &str, expected: (&str, u32), found: Indicator, interner: &hornlog_core::Interner) -> Self {
        CompileError::WrongFunctor {
            context: context.to_string(),
            expected: format!("{}/{}", expected.0, expected.1),
            found: found.display(interner).to_string(),
        }
    }
}
