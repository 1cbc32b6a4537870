//! AST compiler (spec.md §4.6): lifts a ground Term written in the AST
//! sub-language (`atom/1`, `int/1`, `var/1`, `struct/2`, `clause/2`,
//! `dcg/2`, `indicator/2`) into internal `Rule`/`Term` values.
//!
//! Grounded on `original_source/prol/compiler.go`
//! (`compileRule`/`compileClause`/`compileTerm`/`compileAtom`/
//! `compileVar`/`compileStruct`/`compileTerms`/`compileStructs`, and the
//! `checkAtom`/`checkStruct`/`checkFunctor`/`checkProperList` helpers),
//! rendered with `Result`-threading errors instead of wrapped `fmt.Errorf`
//! chains, matching `plotnik-compiler`'s module-per-concern / explicit
//! `Result<T, CompileError>` idiom.

use std::rc::Rc;

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, RefArena, Struct, Symbol, Term, WellKnownSymbols};
use hornlog_resolver::rule::{Clause, Dcg, DcgTerm, Goal};
use hornlog_resolver::Rule;

use crate::error::CompileError;

fn check_struct(t: &Term, context: &str) -> Result<Rc<Struct>, CompileError> {
    match t {
        Term::Struct(s) => Ok(s.clone()),
        _ => Err(CompileError::NotAStruct {
            context: context.to_string(),
        }),
    }
}

fn check_atom(t: &Term, context: &str) -> Result<Symbol, CompileError> {
    match t {
        Term::Atom(a) => Ok(*a),
        _ => Err(CompileError::NotAnAtom {
            context: context.to_string(),
        }),
    }
}

fn check_int(t: &Term, context: &str) -> Result<i64, CompileError> {
    match t {
        Term::Int(n) => Ok(*n),
        _ => Err(CompileError::NotAnInt {
            context: context.to_string(),
        }),
    }
}

fn check_functor(s: &Struct, name: &str, arity: usize, interner: &Interner, context: &str) -> Result<(), CompileError> {
    if interner.try_resolve(s.name) == Some(name) && s.args.len() == arity {
        return Ok(());
    }
    Err(CompileError::wrong_functor(
        context,
        (name, arity as u32),
        Indicator::new(s.name, s.args.len() as u32),
        interner,
    ))
}

fn check_proper_list(t: &Term, arena: &RefArena, symbols: &WellKnownSymbols, context: &str) -> Result<Vec<Term>, CompileError> {
    let (items, tail) = hornlog_core::term::to_list(t, arena, symbols.dot, symbols.nil);
    if !tail.is_atom(symbols.nil) {
        return Err(CompileError::NotAProperList {
            context: context.to_string(),
        });
    }
    Ok(items)
}

/// Compile one rule AST (`clause/2` or `dcg/2`) into a `Rule`.
///
/// `interner` is taken mutably (rather than as the `&Interner` the rest of
/// this module reads through) because DCG expansion needs to mint fresh
/// `Var` names (spec.md §4.3's gensym scheme) — the interner is reborrowed
/// immutably for every other compile step, and taken mutably only where
/// `compile_dcg` actually generates a name.
pub fn compile_rule(ast: &Term, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Result<Rule, CompileError> {
    let derefed = deref(ast, arena);
    let s = check_struct(&derefed, "compileRule")?;
    match (interner.try_resolve(s.name), s.args.len()) {
        (Some("clause"), 2) => compile_clause(&s, arena, interner, symbols).map(Rule::Clause),
        (Some("dcg"), 2) => compile_dcg(&s, arena, interner, symbols).map(Rule::Dcg),
        _ => Err(CompileError::UnimplementedRule(
            Indicator::new(s.name, s.args.len() as u32)
                .display(interner)
                .to_string(),
        )),
    }
}

fn compile_clause(ast: &Struct, arena: &RefArena, interner: &Interner, symbols: &WellKnownSymbols) -> Result<Clause, CompileError> {
    let arg1 = deref(&ast.args[0], arena);
    let arg2 = deref(&ast.args[1], arena);
    let head_ast = check_struct(&arg1, "clause arg #1")?;
    let body_ast = check_proper_list(&arg2, arena, symbols, "clause arg #2")?;
    let head = compile_struct(&head_ast, arena, interner, symbols)?;
    let body = compile_goal_structs(&body_ast, arena, interner, symbols)?;
    Ok(Clause { head, body })
}

fn compile_dcg(ast: &Struct, arena: &RefArena, interner: &mut Interner, symbols: &WellKnownSymbols) -> Result<Dcg, CompileError> {
    let arg1 = deref(&ast.args[0], arena);
    let arg2 = deref(&ast.args[1], arena);
    let head_ast = check_struct(&arg1, "dcg arg #1")?;
    let body_ast = check_proper_list(&arg2, arena, symbols, "dcg arg #2")?;
    let head = compile_struct(&head_ast, arena, interner, symbols)?;

    let body = body_ast
        .iter()
        .enumerate()
        .map(|(i, g)| {
            compile_dcg_term(g, arena, interner, symbols).map_err(|e| CompileError::AtIndex {
                index: i + 1,
                source: Box::new(e),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut counter = 0u32;
    let gensym = move || {
        let sym = interner.intern(&format!("$L{counter}"));
        counter += 1;
        sym
    };
    Ok(Dcg::expand(head, body, symbols, gensym))
}

/// Classify one already-compiled DCG body element by its domain shape: a
/// proper list is a terminal sequence, a `{}/1` struct is a pure-goal
/// wrapper (the conventional Prolog curly-braces escape — the AST
/// sub-language itself has no dedicated shape for DCG terminals/pure
/// goals, so body elements are compiled as ordinary terms first and then
/// classified by inspecting the interned text of their functor), anything
/// else is a callable grammar goal.
fn compile_dcg_term(g: &Term, arena: &RefArena, interner: &Interner, symbols: &WellKnownSymbols) -> Result<DcgTerm, CompileError> {
    let g_ast = check_struct(&deref(g, arena), "dcg body element")?;
    let compiled = compile_term(&g_ast, arena, interner, symbols)?;
    match &compiled {
        Term::Atom(a) if *a == symbols.nil => Ok(DcgTerm::Terminal(Vec::new())),
        Term::Struct(s) if s.name == symbols.dot && s.args.len() == 2 => {
            let (items, _tail) = hornlog_core::term::to_list(&compiled, arena, symbols.dot, symbols.nil);
            Ok(DcgTerm::Terminal(items))
        }
        Term::Struct(s) if interner.try_resolve(s.name) == Some("{}") && s.args.len() == 1 => Ok(DcgTerm::Pure(
            flatten_conjunction(&s.args[0], arena, interner)
                .into_iter()
                .map(|t| check_struct(&t, "dcg pure goal").map(|rc| (*rc).clone()))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Term::Struct(s) => Ok(DcgTerm::Goal((**s).clone())),
        _ => Err(CompileError::NotAStruct {
            context: "dcg body element".to_string(),
        }),
    }
}

/// Split a right-associated `,/2` conjunction into its conjuncts, in
/// order, recognizing `,` by its interned text (it plays no other role in
/// the core and so is not part of `WellKnownSymbols`).
fn flatten_conjunction(t: &Term, arena: &RefArena, interner: &Interner) -> Vec<Term> {
    let derefed = deref(t, arena);
    match &derefed {
        Term::Struct(s) if s.args.len() == 2 && interner.try_resolve(s.name) == Some(",") => {
            let mut left = flatten_conjunction(&s.args[0], arena, interner);
            left.extend(flatten_conjunction(&s.args[1], arena, interner));
            left
        }
        _ => vec![derefed],
    }
}

pub fn compile_term(ast: &Struct, arena: &RefArena, interner: &Interner, symbols: &WellKnownSymbols) -> Result<Term, CompileError> {
    match (interner.try_resolve(ast.name), ast.args.len()) {
        (Some("atom"), 1) => compile_atom(ast, arena, interner).map(Term::Atom),
        (Some("int"), 1) => compile_int(ast, arena).map(Term::Int),
        (Some("var"), 1) => compile_var(ast, arena, interner).map(Term::Var),
        (Some("struct"), 2) => compile_struct(ast, arena, interner, symbols).map(|s| Term::struct_(s.name, s.args)),
        _ => Err(CompileError::UnimplementedTerm(
            Indicator::new(ast.name, ast.args.len() as u32)
                .display(interner)
                .to_string(),
        )),
    }
}

fn compile_atom(ast: &Struct, arena: &RefArena, interner: &Interner) -> Result<Symbol, CompileError> {
    check_functor(ast, "atom", 1, interner, "compileAtom")?;
    let arg1 = deref(&ast.args[0], arena);
    check_atom(&arg1, "atom name")
}

fn compile_int(ast: &Struct, arena: &RefArena) -> Result<i64, CompileError> {
    let arg1 = deref(&ast.args[0], arena);
    check_int(&arg1, "int value")
}

fn compile_var(ast: &Struct, arena: &RefArena, interner: &Interner) -> Result<Symbol, CompileError> {
    check_functor(ast, "var", 1, interner, "compileVar")?;
    let arg1 = deref(&ast.args[0], arena);
    check_atom(&arg1, "var name")
}

fn compile_struct(ast: &Struct, arena: &RefArena, interner: &Interner, symbols: &WellKnownSymbols) -> Result<Struct, CompileError> {
    check_functor(ast, "struct", 2, interner, "compileStruct")?;
    let arg1 = deref(&ast.args[0], arena);
    let arg2 = deref(&ast.args[1], arena);
    let name = check_atom(&arg1, "struct name")?;
    let args_ast = check_proper_list(&arg2, arena, symbols, "struct args")?;
    let args = compile_terms(&args_ast, arena, interner, symbols)?;
    Ok(Struct { name, args })
}

fn compile_terms(ast: &[Term], arena: &RefArena, interner: &Interner, symbols: &WellKnownSymbols) -> Result<Vec<Term>, CompileError> {
    ast.iter()
        .enumerate()
        .map(|(i, t)| {
            let s = check_struct(&deref(t, arena), "term")?;
            compile_term(&s, arena, interner, symbols).map_err(|e| CompileError::AtIndex {
                index: i + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

fn compile_goal_structs(ast: &[Term], arena: &RefArena, interner: &Interner, symbols: &WellKnownSymbols) -> Result<Vec<Goal>, CompileError> {
    ast.iter()
        .enumerate()
        .map(|(i, t)| {
            let s = check_struct(&deref(t, arena), "goal").map_err(|e| CompileError::AtIndex {
                index: i + 1,
                source: Box::new(e),
            })?;
            let compiled = compile_struct(&s, arena, interner, symbols).map_err(|e| CompileError::AtIndex {
                index: i + 1,
                source: Box::new(e),
            })?;
            Ok(Goal::new(compiled))
        })
        .collect()
}

/// Compile an `indicator(Name, Arity)` AST into an `Indicator`.
pub fn compile_indicator(ast: &Term, arena: &RefArena, interner: &Interner) -> Result<Indicator, CompileError> {
    let derefed = deref(ast, arena);
    let s = check_struct(&derefed, "compileIndicator")?;
    check_functor(&s, "indicator", 2, interner, "compileIndicator")?;
    let name = check_atom(&deref(&s.args[0], arena), "indicator name")?;
    let arity = check_int(&deref(&s.args[1], arena), "indicator arity")?;
    Ok(Indicator::new(name, arity as u32))
}

#[cfg(test)]
mod ast_tests {
    use super::*;
    use hornlog_core::Interner;

    fn ast_struct(name: Symbol, args: Vec<Term>) -> Term {
        Term::struct_(name, args)
    }

    fn ast_atom(interner: &mut Interner, name: &str, inner: &str) -> Term {
        let fname = interner.intern(name);
        let inner = interner.intern(inner);
        ast_struct(fname, vec![Term::Atom(inner)])
    }

    #[test]
    fn compile_clause_roundtrips_head_and_body() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
        let arena = RefArena::new();

        let clause = interner.intern("clause");
        let struct_f = interner.intern("struct");
        let atom_f = interner.intern("atom");
        let bit = interner.intern("bit");
        let zero = interner.intern("0");

        let head_ast = ast_struct(
            struct_f,
            vec![
                ast_atom(&mut interner, "atom", "bit"),
                Term::struct_(symbols.dot, vec![ast_atom(&mut interner, "atom", "0"), Term::Atom(symbols.nil)]),
            ],
        );
        let _ = (bit, zero, atom_f);
        let clause_ast = ast_struct(clause, vec![head_ast, Term::Atom(symbols.nil)]);

        let rule = compile_rule(&clause_ast, &arena, &mut interner, &symbols).unwrap();
        match rule {
            Rule::Clause(c) => {
                assert_eq!(c.head.args.len(), 1);
                assert!(c.body.is_empty());
            }
            _ => panic!("expected a clause"),
        }
    }

    #[test]
    fn compile_indicator_reads_name_and_arity() {
        let mut interner = Interner::new();
        let arena = RefArena::new();
        let indicator = interner.intern("indicator");
        let add = interner.intern("add");
        let ast = ast_struct(indicator, vec![Term::Atom(add), Term::Int(3)]);
        let ind = compile_indicator(&ast, &arena, &interner).unwrap();
        assert_eq!(ind.name, add);
        assert_eq!(ind.arity, 3);
    }

    #[test]
    fn unknown_term_shape_is_an_error() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
        let arena = RefArena::new();
        let mystery = interner.intern("mystery");
        let ast = Struct {
            name: mystery,
            args: vec![],
        };
        let result = compile_term(&ast, &arena, &interner, &symbols);
        assert!(matches!(result, Err(CompileError::UnimplementedTerm(_))));
    }
}
