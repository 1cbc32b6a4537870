//! The inverse of `ast::compile_rule`/`compile_term`: renders a domain
//! `Rule`/`Term` back into the AST sub-language (spec.md §4.6's shapes),
//! needed by `get_predicate/2` to hand a predicate's rules back to the
//! caller as data.
//!
//! Grounded on `original_source/prol/rules.go`'s `Clause.ToAST`/
//! `DCG.ToAST`/`Builtin.ToAST`: `DCG` there stores the *original*
//! unexpanded struct sequence (`type DCG []Struct`), and `DCG.ToAST`
//! renders directly from that original form, not from the derived
//! `toClause()` conversion `Unify` uses — a DCG's `ToAST` emits `dcg/2`,
//! built from `original_head`/`original_body`, per spec.md §4.3's "its
//! `ToAST` emits the original DCG form" and the AST round-trip property
//! (spec.md §9, Testable Property #5).

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, RefArena, Struct, Term, WellKnownSymbols};
use hornlog_resolver::rule::{Dcg, DcgTerm, Goal, Rule};

fn wrap1(interner: &mut Interner, functor: &str, arg: Term) -> Term {
    let name = interner.intern(functor);
    Term::struct_(name, vec![arg])
}

pub fn term_to_ast(t: &Term, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    match deref(t, arena) {
        Term::Atom(a) => wrap1(interner, "atom", Term::Atom(a)),
        Term::Int(n) => wrap1(interner, "int", Term::Int(n)),
        Term::Var(name) => wrap1(interner, "var", Term::Atom(name)),
        Term::Ref(r) => wrap1(interner, "var", Term::Atom(arena.name(r))),
        Term::Struct(s) => struct_to_ast(&s, arena, interner, symbols),
    }
}

pub fn struct_to_ast(s: &Struct, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    let struct_name = interner.intern("struct");
    let args: Vec<Term> = s.args.iter().map(|a| term_to_ast(a, arena, interner, symbols)).collect();
    let args_list = hornlog_core::term::from_list(args, symbols.dot, symbols.nil);
    Term::struct_(struct_name, vec![Term::Atom(s.name), args_list])
}

fn goal_to_ast(g: &Goal, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    struct_to_ast(&g.term, arena, interner, symbols)
}

/// Render a rule back as AST: a plain clause as `clause(HeadAST,
/// [BodyAST, …])`, a DCG as `dcg(HeadAST, [BodyAST, …])` built from its
/// *original*, un-expanded head/body — not the threaded `expansion`
/// `Clause` `Unify` resolves against.
pub fn rule_to_ast(rule: &Rule, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    match rule {
        Rule::Clause(c) => clause_to_ast(&c.head, &c.body, arena, interner, symbols),
        Rule::Dcg(d) => dcg_to_ast(d, arena, interner, symbols),
        Rule::Builtin(b) => {
            let builtin_name = interner.intern("builtin");
            Term::struct_(builtin_name, vec![indicator_to_ast(b.indicator, interner)])
        }
    }
}

fn clause_to_ast(head: &Struct, body: &[Goal], arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    let clause_name = interner.intern("clause");
    let head_ast = struct_to_ast(head, arena, interner, symbols);
    let body_ast: Vec<Term> = body.iter().map(|g| goal_to_ast(g, arena, interner, symbols)).collect();
    let body_list = hornlog_core::term::from_list(body_ast, symbols.dot, symbols.nil);
    Term::struct_(clause_name, vec![head_ast, body_list])
}

fn dcg_to_ast(d: &Dcg, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    let dcg_name = interner.intern("dcg");
    let head_ast = struct_to_ast(&d.original_head, arena, interner, symbols);
    let body_ast: Vec<Term> = d
        .original_body
        .iter()
        .map(|item| dcg_term_to_ast(item, arena, interner, symbols))
        .collect();
    let body_list = hornlog_core::term::from_list(body_ast, symbols.dot, symbols.nil);
    Term::struct_(dcg_name, vec![head_ast, body_list])
}

/// The inverse of `ast::compile_dcg_term`'s classification: render one
/// un-expanded DCG body element back into the AST shape it was parsed
/// from (a proper list for a terminal, a `{}/1` wrapper around a
/// right-associated `,/2` conjunction for pure goals, or the goal struct
/// itself, untouched, for a callable grammar goal).
fn dcg_term_to_ast(item: &DcgTerm, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Term {
    match item {
        DcgTerm::Terminal(elems) => {
            let domain = if elems.is_empty() {
                Term::Atom(symbols.nil)
            } else {
                hornlog_core::term::from_list(elems.clone(), symbols.dot, symbols.nil)
            };
            term_to_ast(&domain, arena, interner, symbols)
        }
        DcgTerm::Pure(pures) => {
            let comma = interner.intern(",");
            let conjunction = pures
                .iter()
                .rev()
                .map(|g| Term::struct_(g.name, g.args.clone()))
                .reduce(|rest, term| Term::struct_(comma, vec![term, rest]))
                .expect("a DCG pure block always has at least one goal");
            let braces = interner.intern("{}");
            term_to_ast(&Term::struct_(braces, vec![conjunction]), arena, interner, symbols)
        }
        DcgTerm::Goal(g) => struct_to_ast(g, arena, interner, symbols),
    }
}

pub fn indicator_to_ast(ind: Indicator, interner: &mut Interner) -> Term {
    let indicator_name = interner.intern("indicator");
    Term::struct_(indicator_name, vec![Term::Atom(ind.name), Term::Int(ind.arity as i64)])
}

#[cfg(test)]
mod to_ast_tests {
    use super::*;
    use hornlog_core::Interner;

    #[test]
    fn struct_to_ast_round_trips_through_compile_struct() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
        let arena = RefArena::new();
        let f = interner.intern("f");
        let a = interner.intern("a");
        let s = Struct {
            name: f,
            args: vec![Term::Atom(a)],
        };
        let ast = struct_to_ast(&s, &arena, &mut interner, &symbols);
        let recompiled = crate::ast::compile_term(
            match &ast {
                Term::Struct(rc) => rc,
                _ => unreachable!(),
            },
            &arena,
            &interner,
            &symbols,
        )
        .unwrap();
        assert_eq!(recompiled, Term::Struct(std::rc::Rc::new(s)));
    }

    #[test]
    fn dcg_to_ast_renders_the_original_form_and_round_trips() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
        let arena = RefArena::new();
        let greeting = interner.intern("greeting");
        let hello = interner.intern("hello");
        let a = interner.intern("a");

        let mut counter = 0u32;
        let mut gensym = || {
            let sym = interner.intern(&format!("$L{counter}"));
            counter += 1;
            sym
        };
        let dcg = Dcg::expand(
            Struct { name: greeting, args: vec![] },
            vec![DcgTerm::Terminal(vec![Term::Atom(hello)]), DcgTerm::Goal(Struct { name: a, args: vec![] })],
            &symbols,
            &mut gensym,
        );

        let ast = rule_to_ast(&Rule::Dcg(dcg), &arena, &mut interner, &symbols);
        let s = match &ast {
            Term::Struct(s) => s.clone(),
            _ => unreachable!(),
        };
        assert_eq!(interner.resolve(s.name), "dcg");
        assert_eq!(s.args.len(), 2);

        let recompiled = crate::ast::compile_rule(&ast, &arena, &mut interner, &symbols).unwrap();
        match recompiled {
            Rule::Dcg(d) => {
                assert_eq!(d.original_head.name, greeting);
                assert_eq!(d.original_body.len(), 2);
            }
            other => panic!("expected a dcg rule, got {other:?}"),
        }
    }

    #[test]
    fn empty_terminal_renders_as_the_empty_list_and_round_trips() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
        let arena = RefArena::new();
        let greeting = interner.intern("greeting");
        let a = interner.intern("a");

        let mut counter = 0u32;
        let mut gensym = || {
            let sym = interner.intern(&format!("$L{counter}"));
            counter += 1;
            sym
        };
        let dcg = Dcg::expand(
            Struct { name: greeting, args: vec![] },
            vec![DcgTerm::Terminal(Vec::new()), DcgTerm::Goal(Struct { name: a, args: vec![] })],
            &symbols,
            &mut gensym,
        );

        let ast = rule_to_ast(&Rule::Dcg(dcg), &arena, &mut interner, &symbols);
        let recompiled = crate::ast::compile_rule(&ast, &arena, &mut interner, &symbols).unwrap();
        match recompiled {
            Rule::Dcg(d) => match &d.original_body[0] {
                DcgTerm::Terminal(elems) => assert!(elems.is_empty()),
                other => panic!("expected an empty terminal, got {other:?}"),
            },
            other => panic!("expected a dcg rule, got {other:?}"),
        }
    }
}
