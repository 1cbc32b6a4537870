//! `Query`/`Interpret` (spec.md §4.9): drive the self-hosted parser (once
//! `bootstrap.pl`/the prelude have defined `ws/2` and `parse_rule/3`) by
//! solving a small conjunction instead of calling a Rust parser directly.
//!
//! Grounded on `original_source/prol/database.go`'s `Interpret`: each
//! iteration proves `ws(Chars, Rest0), parse_rule(Rule, Rest0, Rest)` (plus,
//! for `interpret`, `assertz(Rule)` chained onto the same query so a
//! directive's body runs immediately, per `assertz/1`'s contract), advances
//! `Chars` to the solution's `Rest`, and repeats until no further rule
//! parses; a final `ws/2` solve then requires the remainder to be empty.

use hornlog_core::term::{from_string, to_string};
use hornlog_core::{Struct, Term};
use hornlog_resolver::rule::Rule;
use hornlog_resolver::{Bounds, Database, Resolver};

use crate::error::BootstrapError;

/// Parse exactly one rule out of `text` using whatever `ws/2`/`parse_rule/3`
/// are currently defined in `db`, requiring the full text to be consumed,
/// then AST-compile it. Does not assert the result.
pub fn query(db: &mut Database, text: &str) -> Result<Rule, BootstrapError> {
    let (dot, nil) = (db.symbols.dot, db.symbols.nil);
    let chars = from_string(text, &mut db.interner, dot, nil);
    let rest0_sym = db.interner.intern("_Rest0");
    let rule_sym = db.interner.intern("Rule");
    let ws_sym = db.interner.intern("ws");
    let parse_rule_sym = db.interner.intern("parse_rule");

    let goals = vec![
        Struct { name: ws_sym, args: vec![chars, Term::Var(rest0_sym)] },
        Struct {
            name: parse_rule_sym,
            args: vec![Term::Var(rule_sym), Term::Var(rest0_sym), Term::Atom(nil)],
        },
    ];

    let mut solutions = Resolver::new(db, Bounds { max_depth: None, limit: Some(1) }).solve_all(goals);
    let solution = solutions.next().ok_or(BootstrapError::NoRuleFound(0))??;
    let rule_ast = solution
        .bindings
        .iter()
        .find(|(name, _)| *name == rule_sym)
        .map(|(_, t)| t.clone())
        .ok_or(BootstrapError::NoRuleFound(0))?;

    let symbols = *solutions.symbols();
    let (arena, interner) = solutions.arena_and_interner_mut();
    let compiled = hornlog_compile::compile_rule(&rule_ast, arena, interner, &symbols)?;
    Ok(compiled)
}

/// Repeatedly parse-and-assert rules out of `text` until no further rule
/// parses, then require the remaining characters to be only whitespace.
pub fn interpret(db: &mut Database, text: &str) -> Result<(), BootstrapError> {
    let (dot, nil) = (db.symbols.dot, db.symbols.nil);
    let mut chars = from_string(text, &mut db.interner, dot, nil);

    loop {
        let rest0_sym = db.interner.intern("_Rest0");
        let rule_sym = db.interner.intern("Rule");
        let rest_sym = db.interner.intern("Rest");
        let ws_sym = db.interner.intern("ws");
        let parse_rule_sym = db.interner.intern("parse_rule");
        let assertz_sym = db.interner.intern("assertz");

        let goals = vec![
            Struct { name: ws_sym, args: vec![chars.clone(), Term::Var(rest0_sym)] },
            Struct {
                name: parse_rule_sym,
                args: vec![Term::Var(rule_sym), Term::Var(rest0_sym), Term::Var(rest_sym)],
            },
            Struct { name: assertz_sym, args: vec![Term::Var(rule_sym)] },
        ];

        let resolver = Resolver::new(db, Bounds { max_depth: None, limit: Some(1) }).solve_all(goals);
        let mut solutions = resolver;
        let Some(result) = solutions.next() else {
            break;
        };
        let solution = result?;
        match solution.bindings.iter().find(|(name, _)| *name == rest_sym) {
            Some((_, t)) => chars = t.clone(),
            None => break,
        }
    }

    // Named without a leading underscore so `build_solution` keeps it in
    // `solution.bindings` (a leading `_` marks a variable as not reported).
    let final_rest_sym = db.interner.intern("FinalRest");
    let ws_sym = db.interner.intern("ws");
    let mut solutions = Resolver::new(db, Bounds { max_depth: None, limit: Some(1) })
        .solve_all(vec![Struct { name: ws_sym, args: vec![chars, Term::Var(final_rest_sym)] }]);
    let result = solutions.next().ok_or(BootstrapError::NoRuleFound(0))??;
    let trailing_term = result
        .bindings
        .iter()
        .find(|(name, _)| *name == final_rest_sym)
        .map(|(_, t)| t.clone())
        .unwrap_or(Term::Atom(nil));

    // Stringify while `solutions`' arena (which the binding's Refs point
    // into) is still alive.
    let trailing = to_string(&trailing_term, solutions.arena(), solutions.interner(), dot, nil).unwrap_or_default();
    if !trailing.is_empty() {
        return Err(BootstrapError::TrailingCharacters { pos: 0, excerpt: trailing });
    }
    Ok(())
}

#[cfg(test)]
mod facade_tests {
    use super::*;
    use crate::new_database;

    #[test]
    fn query_parses_a_single_fact_without_asserting() {
        let mut db = new_database().expect("bootstrap should load");
        let rule = query(&mut db, "greeting.").expect("should parse one fact");
        match rule {
            Rule::Clause(c) => assert!(c.body.is_empty()),
            other => panic!("expected a clause, got {other:?}"),
        }
        let greeting = db.interner.intern("greeting");
        let ind = hornlog_core::Indicator::new(greeting, 0);
        assert!(db.rules(ind).is_empty());
    }

    #[test]
    fn interpret_asserts_every_parsed_rule() {
        use indoc::indoc;
        let mut db = new_database().expect("bootstrap should load");
        let source = indoc! {"
            widget(a).
            widget(b).
        "};
        interpret(&mut db, source).expect("should parse and assert both facts");
        let widget = db.interner.intern("widget");
        let ind = hornlog_core::Indicator::new(widget, 1);
        assert_eq!(db.rules(ind).len(), 2);
    }
}
