//! Syntactic, occurs-check-free unification (spec.md §4.2).

use hornlog_core::term::deref;
use hornlog_core::{RefArena, Term};

use crate::trail::Trail;

/// Binds `r` to `t` and records the binding on the trail. Callers must
/// already know `r` is unbound (checked by `unify`, and by direct callers
/// such as the `=/2` built-in).
pub fn bind(r: hornlog_core::RefId, t: Term, arena: &mut RefArena, trail: &mut Trail) {
    arena.set_value(r, t);
    trail.record(r);
}

/// Attempts to unify `t1` and `t2`. On failure, bindings made during the
/// attempt are left in place — the caller unwinds to its watermark (the
/// `dfs` loop in `resolver.rs` does this before trying the next rule).
pub fn unify(t1: &Term, t2: &Term, arena: &mut RefArena, trail: &mut Trail) -> bool {
    let t1 = deref(t1, arena);
    let t2 = deref(t2, arena);

    match (&t1, &t2) {
        (Term::Struct(a), Term::Struct(b)) => {
            if a.name != b.name || a.args.len() != b.args.len() {
                return false;
            }
            for (x, y) in a.args.iter().zip(b.args.iter()) {
                if !unify(x, y, arena, trail) {
                    return false;
                }
            }
            true
        }
        (Term::Atom(a), Term::Atom(b)) => a == b,
        (Term::Int(a), Term::Int(b)) => a == b,
        (Term::Ref(a), Term::Ref(b)) if a == b => true,
        (Term::Ref(r), _) => {
            bind(*r, t2.clone(), arena, trail);
            true
        }
        (_, Term::Ref(r)) => {
            bind(*r, t1.clone(), arena, trail);
            true
        }
        (Term::Var(_), _) | (_, Term::Var(_)) => {
            unreachable!("unify called on a source Var; instantiate to a Ref first")
        }
        _ => false,
    }
}
