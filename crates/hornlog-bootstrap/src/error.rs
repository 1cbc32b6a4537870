//! Errors surfaced by the bootstrap parser and the Query/Interpret façade
//! (spec.md §7: "Parse error — trailing characters after a full parse, or
//! no rule found").

#[derive(thiserror::Error, Debug, Clone)]
pub enum BootstrapError {
    #[error("no rule found at position {0}")]
    NoRuleFound(usize),

    #[error("trailing characters at position {pos}: {excerpt:?}")]
    TrailingCharacters { pos: usize, excerpt: String },

    #[error(transparent)]
    Resolve(#[from] hornlog_resolver::ResolveError),

    #[error(transparent)]
    Compile(#[from] hornlog_compile::CompileError),

    #[error("{0}")]
    Io(String),
}
