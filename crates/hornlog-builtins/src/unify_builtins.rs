//! `=/2` and `neq/2`/`\==/2` (spec.md §4.7).
//!
//! Grounded on `original_source/prol/builtins.go`'s `equalsBuiltin`
//! (`s.Unify(arg1, arg2)`); `neq` has no Go counterpart in the retrieved
//! snapshot and is built directly from the resolver's trail primitives
//! (mark/unwind), the same tool `hornlog-resolver::unify` itself uses to
//! try-then-undo a failed rule head.

use std::rc::Rc;

use hornlog_core::{Indicator, Interner};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

fn unify_goal(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let ok = resolver.unify_terms(&goal.term.args[0], &goal.term.args[1]);
    Ok(if ok {
        UnifyOutcome::Matched(Vec::new())
    } else {
        UnifyOutcome::NoMatch
    })
}

/// Attempt unification in a scoped trail snapshot, then undo it
/// immediately: succeeds iff the attempt failed *and* touched no Ref (the
/// terms are syntactically distinct with no variable relating them).
fn neq_goal(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let mark = resolver.trail().mark();
    let before = resolver.trail().len();
    let unified = resolver.unify_terms(&goal.term.args[0], &goal.term.args[1]);
    let touched_anything = resolver.trail().len() > before;
    resolver.unwind_to(mark);

    Ok(if !unified && !touched_anything {
        UnifyOutcome::Matched(Vec::new())
    } else {
        UnifyOutcome::NoMatch
    })
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let eq = interner.intern("=");
    let neq = interner.intern("neq");
    let strict_neq = interner.intern("\\==");
    vec![
        Rule::Builtin(Builtin {
            indicator: Indicator::new(eq, 2),
            func: Rc::new(unify_goal),
        }),
        Rule::Builtin(Builtin {
            indicator: Indicator::new(neq, 2),
            func: Rc::new(neq_goal),
        }),
        Rule::Builtin(Builtin {
            indicator: Indicator::new(strict_neq, 2),
            func: Rc::new(neq_goal),
        }),
    ]
}
