//! `consult/1` (spec.md §4.7): "Argument 1 is an Atom naming a file; read it
//! and pass to `Interpret`." Lives here, not in `hornlog-builtins`, because
//! it needs `interpret` (facade.rs), which needs the bootstrap parser one
//! crate layer above `hornlog-builtins`.
//!
//! Grounded on `original_source/prol/builtins.go`'s file-reading builtins
//! and `database.go`'s `Interpret`, which this calls into directly.

use std::fs;
use std::rc::Rc;

use hornlog_builtins::error::resolve_error;
use hornlog_builtins::BuiltinError;
use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, Term};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver, ResolveError};

fn consult(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let arg = deref(&goal.term.args[0], resolver.arena());
    let Term::Atom(path_sym) = arg else {
        return Err(resolve_error(
            "consult/1",
            BuiltinError::TypeMismatch { position: 1, expected: "atom", got: format!("{arg:?}") },
        ));
    };
    let path = resolver.interner().resolve(path_sym).to_string();
    let text = fs::read_to_string(&path).map_err(|e| resolve_error("consult/1", BuiltinError::Io(e)))?;
    crate::facade::interpret(resolver.db_mut(), &text)
        .map_err(|e| ResolveError::builtin("consult/1", e.to_string()))?;
    Ok(UnifyOutcome::Matched(Vec::new()))
}

/// A `Rule::Builtin` for `consult/1`, to be asserted alongside
/// `hornlog_builtins::install`'s catalog.
pub fn rule(interner: &mut Interner) -> Rule {
    let consult_sym = interner.intern("consult");
    Rule::Builtin(Builtin {
        indicator: Indicator::new(consult_sym, 1),
        func: Rc::new(consult),
    })
}

#[cfg(test)]
mod consult_tests {
    use std::io::Write;

    use hornlog_core::Struct;
    use hornlog_resolver::{Bounds, Resolver};
    use indoc::indoc;

    use crate::new_database;

    #[test]
    fn consult_loads_facts_from_a_real_file_on_disk() {
        let mut db = new_database().expect("bootstrap should load");
        let mut file = tempfile::NamedTempFile::new().expect("should create a temp file");
        let source = indoc! {"
            widget(a).
            widget(b).
        "};
        write!(file, "{source}").expect("should write to the temp file");

        let consult_sym = db.interner.intern("consult");
        let path_sym = db.interner.intern(file.path().to_str().unwrap());

        let resolver = Resolver::new(&mut db, Bounds::default());
        let mut solutions = resolver.solve(Struct { name: consult_sym, args: vec![hornlog_core::Term::Atom(path_sym)] });
        assert!(solutions.next().expect("consult should succeed").is_ok());

        let widget = db.interner.intern("widget");
        let ind = hornlog_core::Indicator::new(widget, 1);
        assert_eq!(db.rules(ind).len(), 2);
    }
}
