//! Built-in predicate catalog (spec.md §4.7): unification, comparison,
//! arithmetic, type tests, atom/int conversions, and reflection, each
//! exposed as a `Rule::Builtin` with the same dispatch contract as a
//! user-defined clause.
//!
//! Grounded on `original_source/prol/database.go`'s `NewDatabase`, which
//! asserts a flat slice of builtins into a fresh `Database`; `install`
//! below is that loop, generalized to pull each module's catalog in turn.
//!
//! `consult/1` is not installed here: it needs `Interpret`, which lives in
//! `hornlog-bootstrap` one layer up this workspace's dependency chain, so
//! that crate registers it alongside this catalog.

pub mod compare;
pub mod debug;
pub mod error;
pub mod eval;
pub mod io;
pub mod reflection;
pub mod strings;
pub mod types;
pub mod unify_builtins;

pub use error::BuiltinError;

use hornlog_resolver::Database;

/// Assert every built-in predicate's rules into `db`.
pub fn install(db: &mut Database) {
    let interner = &mut db.interner;
    let mut rules = Vec::new();
    rules.extend(unify_builtins::rules(interner));
    rules.extend(compare::rules(interner));
    rules.extend(types::rules(interner));
    rules.extend(strings::rules(interner));
    rules.extend(eval::rules(interner));
    rules.extend(reflection::rules(interner));
    rules.extend(io::rules(interner));
    rules.extend(debug::rules(interner));
    for rule in rules {
        db.assert(rule);
    }
}
