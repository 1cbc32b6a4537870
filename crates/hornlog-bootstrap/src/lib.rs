//! Bootstrap + prelude loading and the public façade for `hornlog`'s
//! self-hosting story (spec section on the prelude loader / self-hosted
//! parser).
//!
//! `new_database` seeds a fresh `Database` with the built-in catalog and
//! `consult/1`, then gets the self-hosted parser off the ground by loading
//! `lib/bootstrap.pl` through the hand-written `parser::Parser` directly
//! (no AST compiler involved — the clauses it builds are asserted as-is).
//! From there `ws/2` and `parse_rule/3` exist in the database, so
//! `lib/prelude.pl` loads the "real" way, through `facade::interpret`.

pub mod consult;
pub mod error;
pub mod facade;
pub mod parser;

pub use error::BootstrapError;
pub use facade::{interpret, query};

use hornlog_resolver::Database;

const BOOTSTRAP_SOURCE: &str = include_str!("../lib/bootstrap.pl");
const PRELUDE_SOURCE: &str = include_str!("../lib/prelude.pl");

/// A fresh database with the built-in catalog, `consult/1`, and the
/// restricted-dialect bootstrap rules (`ws/2`, `parse_rule/3`) loaded
/// through `parser::Parser` directly, but not the list prelude. For
/// callers (e.g. the CLI's `--parser=bootstrap` mode) that want to read
/// and run the restricted dialect only, without the self-hosted parser's
/// full source syntax.
pub fn bootstrap_only_database() -> Result<Database, BootstrapError> {
    let mut db = Database::new();
    hornlog_builtins::install(&mut db);
    let consult_rule = consult::rule(&mut db.interner);
    db.assert(consult_rule);

    let mut p = parser::Parser::new(BOOTSTRAP_SOURCE);
    for rule in p.database(&mut db.interner) {
        db.assert(rule);
    }
    if !p.is_at_eof() {
        return Err(BootstrapError::TrailingCharacters {
            pos: p.pos(),
            excerpt: BOOTSTRAP_SOURCE[p.pos()..].chars().take(40).collect(),
        });
    }
    Ok(db)
}

/// A fresh database with the built-in catalog, `consult/1`, the
/// self-hosted parser (`ws/2`, `parse_rule/3`), and the standard list
/// prelude (`append/3`, `member/2`, `length/2`, `reverse/2`, `nth0/3`)
/// all loaded.
pub fn new_database() -> Result<Database, BootstrapError> {
    let mut db = bootstrap_only_database()?;
    facade::interpret(&mut db, PRELUDE_SOURCE)?;
    Ok(db)
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn bootstrap_source_is_fully_consumed_by_the_restricted_parser() {
        let mut interner = hornlog_core::Interner::new();
        let mut p = parser::Parser::new(BOOTSTRAP_SOURCE);
        let rules = p.database(&mut interner);
        assert!(!rules.is_empty());
        assert!(p.is_at_eof(), "stopped at byte {} of bootstrap.pl", p.pos());
    }

    #[test]
    fn new_database_loads_bootstrap_and_prelude() {
        let mut db = new_database().expect("bootstrap + prelude should load cleanly");
        let append_ind = hornlog_core::Indicator::new(db.interner.intern("append"), 3);
        assert!(!db.rules(append_ind).is_empty());
    }

    /// Self-hosting (spec scenario S6): once `ws/2` and `parse_rule/3`
    /// are defined, they can parse `bootstrap.pl`'s own source text —
    /// the same dialect they're written in — start to finish.
    #[test]
    fn self_hosted_parser_reparses_its_own_bootstrap_source() {
        let mut db = new_database().expect("bootstrap + prelude should load cleanly");
        facade::interpret(&mut db, BOOTSTRAP_SOURCE).expect("self-hosted parser should fully reparse bootstrap.pl");
    }
}
