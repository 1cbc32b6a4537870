//! AST compiler: lifts ground terms in the AST sub-language
//! (`atom/1`, `int/1`, `var/1`, `struct/2`, `clause/2`, `dcg/2`,
//! `indicator/2`) into the domain `Term`/`Rule` values `hornlog-resolver`
//! operates on.

pub mod ast;
pub mod error;
pub mod to_ast;

pub use ast::{compile_indicator, compile_rule, compile_term};
pub use error::CompileError;
pub use to_ast::{indicator_to_ast, rule_to_ast, struct_to_ast, term_to_ast};
