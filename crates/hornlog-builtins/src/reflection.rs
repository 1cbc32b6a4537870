//! `assertz/1`, `get_predicate/2`, `put_predicate/2` (spec.md §4.7):
//! database mutation and AST reflection.
//!
//! Grounded on `original_source/prol/database.go`'s `Assert`/
//! `PutPredicate` and `rules.go`'s `ToAST`, via `hornlog_compile`'s
//! forward/reverse AST compilers.

use std::rc::Rc;

use hornlog_core::term::from_list;
use hornlog_core::{Indicator, Interner};
use hornlog_compile::{compile_indicator, compile_rule, rule_to_ast};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

use crate::error::resolve_error;

/// Compile the argument as a rule; if its indicator is `directive/0`,
/// push its body as the current continuation instead of storing it
/// (spec.md §4.7: directives execute at assert time).
fn assertz(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let rule = compile_rule(&goal.term.args[0], resolver.arena(), resolver.interner_mut(), resolver.symbols())
        .map_err(|e| resolve_error("assertz/1", e))?;

    let directive = Indicator::new(resolver.symbols().directive, 0);
    if rule.indicator() == directive {
        let body = match rule {
            Rule::Clause(c) => c.body,
            Rule::Dcg(d) => d.expansion.body,
            Rule::Builtin(_) => Vec::new(),
        };
        return Ok(UnifyOutcome::Matched(body));
    }

    resolver.db_mut().assert(rule);
    Ok(UnifyOutcome::Matched(Vec::new()))
}

fn get_predicate(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let ind = compile_indicator(&goal.term.args[0], resolver.arena(), resolver.interner()).map_err(|e| resolve_error("get_predicate/2", e))?;
    let rules: Vec<Rc<Rule>> = resolver.db().rules(ind).to_vec();
    let (dot, nil) = (resolver.symbols().dot, resolver.symbols().nil);
    let asts = rules
        .iter()
        .map(|r| rule_to_ast(r, resolver.arena(), resolver.interner_mut(), resolver.symbols()))
        .collect::<Vec<_>>();
    let list = from_list(asts, dot, nil);
    Ok(if resolver.unify_terms(&list, &goal.term.args[1]) {
        UnifyOutcome::Matched(Vec::new())
    } else {
        UnifyOutcome::NoMatch
    })
}

fn put_predicate(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let ind = compile_indicator(&goal.term.args[0], resolver.arena(), resolver.interner()).map_err(|e| resolve_error("put_predicate/2", e))?;
    let (dot, nil) = (resolver.symbols().dot, resolver.symbols().nil);
    let (items, tail) = hornlog_core::term::to_list(&goal.term.args[1], resolver.arena(), dot, nil);
    if !tail.is_atom(nil) {
        return Err(resolve_error(
            "put_predicate/2",
            crate::error::BuiltinError::NotAProperList { position: 2 },
        ));
    }
    let rules = items
        .iter()
        .map(|ast| compile_rule(ast, resolver.arena(), resolver.interner_mut(), resolver.symbols()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| resolve_error("put_predicate/2", e))?;
    resolver.db_mut().put_predicate(ind, rules);
    Ok(UnifyOutcome::Matched(Vec::new()))
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let assertz_sym = interner.intern("assertz");
    let get_predicate_sym = interner.intern("get_predicate");
    let put_predicate_sym = interner.intern("put_predicate");
    vec![
        Rule::Builtin(Builtin {
            indicator: Indicator::new(assertz_sym, 1),
            func: Rc::new(assertz),
        }),
        Rule::Builtin(Builtin {
            indicator: Indicator::new(get_predicate_sym, 2),
            func: Rc::new(get_predicate),
        }),
        Rule::Builtin(Builtin {
            indicator: Indicator::new(put_predicate_sym, 2),
            func: Rc::new(put_predicate),
        }),
    ]
}
