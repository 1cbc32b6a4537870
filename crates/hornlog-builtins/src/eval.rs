//! `is/2` and the `Eval` arithmetic function (spec.md §4.7): a pure
//! function over terms supporting `+/1, -/1, +/2, -/2` with Int operands
//! after recursive evaluation — deliberately not extended further (see
//! SPEC_FULL.md §9's Open Question resolution).
//!
//! Grounded on `original_source/prol/eval.go`'s `Eval`, rendered as
//! `Result`-threading instead of wrapped `fmt.Errorf` chains.

use std::rc::Rc;

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, RefArena, Term};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

use crate::error::{resolve_error, BuiltinError};

/// Evaluate an arithmetic expression to an `Int`. An unbound Ref is a
/// "nonground" error; any operator other than the four listed is an
/// `UnknownOperator` error.
pub fn eval(term: &Term, arena: &RefArena, interner: &Interner) -> Result<i64, BuiltinError> {
    match deref(term, arena) {
        Term::Int(n) => Ok(n),
        Term::Ref(_) => Err(BuiltinError::NonGround { position: 0 }),
        Term::Struct(s) => {
            let args = s.args.iter().map(|a| eval(a, arena, interner)).collect::<Result<Vec<_>, _>>()?;
            match (interner.try_resolve(s.name), args.as_slice()) {
                (Some("-"), [a]) => Ok(-a),
                (Some("+"), [a]) => Ok(*a),
                (Some("-"), [a, b]) => Ok(a - b),
                (Some("+"), [a, b]) => Ok(a + b),
                _ => Err(BuiltinError::UnknownOperator(
                    Indicator::new(s.name, s.args.len() as u32).display(interner).to_string(),
                )),
            }
        }
        other => Err(BuiltinError::TypeMismatch {
            position: 0,
            expected: "arithmetic term",
            got: format!("{other:?}"),
        }),
    }
}

fn is_goal(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let value = eval(&goal.term.args[1], resolver.arena(), resolver.interner()).map_err(|e| resolve_error("is/2", e))?;
    Ok(if resolver.unify_terms(&goal.term.args[0], &Term::Int(value)) {
        UnifyOutcome::Matched(Vec::new())
    } else {
        UnifyOutcome::NoMatch
    })
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let is = interner.intern("is");
    vec![Rule::Builtin(Builtin {
        indicator: Indicator::new(is, 2),
        func: Rc::new(is_goal),
    })]
}
