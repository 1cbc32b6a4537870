//! `>/2, >=/2, </2, =</2` (spec.md §4.7): both arguments must reduce to
//! Int after Deref.
//!
//! No Go counterpart exists in the retrieved `builtins.go` snapshot;
//! grounded on its `Deref`-then-type-assert shape (`atomBuiltin`/
//! `varBuiltin`) applied to `Int` instead of `Atom`/`Ref`.

use std::cmp::Ordering;
use std::rc::Rc;

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, Term};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

use crate::error::{resolve_error, BuiltinError};

fn deref_int(resolver: &Resolver, t: &Term, position: usize) -> Result<i64, BuiltinError> {
    match deref(t, resolver.arena()) {
        Term::Int(n) => Ok(n),
        other => Err(BuiltinError::TypeMismatch {
            position,
            expected: "Int",
            got: format!("{other:?}"),
        }),
    }
}

fn compare_goal(indicator: &'static str, accept: fn(Ordering) -> bool) -> impl Fn(&mut Resolver, &Goal) -> UnifyResult {
    move |resolver, goal| {
        let a = deref_int(resolver, &goal.term.args[0], 1).map_err(|e| resolve_error(indicator, e))?;
        let b = deref_int(resolver, &goal.term.args[1], 2).map_err(|e| resolve_error(indicator, e))?;
        Ok(if accept(a.cmp(&b)) {
            UnifyOutcome::Matched(Vec::new())
        } else {
            UnifyOutcome::NoMatch
        })
    }
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let specs: [(&str, fn(Ordering) -> bool); 4] = [
        (">", |o| o == Ordering::Greater),
        (">=", |o| o != Ordering::Less),
        ("<", |o| o == Ordering::Less),
        ("=<", |o| o != Ordering::Greater),
    ];
    specs
        .into_iter()
        .map(|(name, accept)| {
            let sym = interner.intern(name);
            Rule::Builtin(Builtin {
                indicator: Indicator::new(sym, 2),
                func: Rc::new(compare_goal(name, accept)),
            })
        })
        .collect()
}
