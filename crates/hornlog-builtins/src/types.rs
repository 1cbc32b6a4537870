//! `atom/1`, `int/1`, `var/1` (spec.md §4.7): type tests on the
//! dereferenced argument.
//!
//! Grounded on `original_source/prol/builtins.go`'s `atomBuiltin`/
//! `varBuiltin` (`Deref` then a type assertion).

use std::rc::Rc;

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, Term};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

fn type_test(pred: fn(&Term) -> bool) -> impl Fn(&mut Resolver, &Goal) -> UnifyResult {
    move |resolver, goal| {
        let term = deref(&goal.term.args[0], resolver.arena());
        Ok(if pred(&term) {
            UnifyOutcome::Matched(Vec::new())
        } else {
            UnifyOutcome::NoMatch
        })
    }
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let specs: [(&str, fn(&Term) -> bool); 3] = [
        ("atom", |t| matches!(t, Term::Atom(_))),
        ("int", |t| matches!(t, Term::Int(_))),
        ("var", |t| matches!(t, Term::Ref(_))),
    ];
    specs
        .into_iter()
        .map(|(name, pred)| {
            let sym = interner.intern(name);
            Rule::Builtin(Builtin {
                indicator: Indicator::new(sym, 1),
                func: Rc::new(type_test(pred)),
            })
        })
        .collect()
}
