//! `atom_to_chars/2`, `chars_to_atom/2`, `int_to_chars/2`,
//! `chars_to_int/2`, `atom_length/2` (spec.md §4.7).
//!
//! Grounded on `original_source/prol/builtins.go`'s `atomToCharsBuiltin`/
//! `charsToAtomBuiltin`/`atomLengthBuiltin` (the original's
//! `atomLengthBuiltin` has a known bug — it binds a single *char* built
//! from `len+'0'` rather than an Int — corrected here to bind an `Int` as
//! spec.md §4.7 specifies); `int_to_chars`/`chars_to_int` have no Go
//! counterpart in the retrieved snapshot and are built from the same
//! `Deref`/`to_list`/`from_list` primitives.

use std::rc::Rc;

use hornlog_core::term::{deref, from_list, to_list};
use hornlog_core::{Indicator, Interner, Term};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

use crate::error::{resolve_error, BuiltinError};

fn atom_to_chars(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let arg1 = deref(&goal.term.args[0], resolver.arena());
    let Term::Atom(a) = arg1 else {
        return Err(resolve_error(
            "atom_to_chars/2",
            BuiltinError::TypeMismatch {
                position: 1,
                expected: "Atom",
                got: format!("{arg1:?}"),
            },
        ));
    };
    let text = resolver.interner().resolve(a).to_string();
    let (dot, nil) = (resolver.symbols().dot, resolver.symbols().nil);
    let chars: Vec<Term> = text.chars().map(|c| Term::Atom(resolver.interner_mut().intern(&c.to_string()))).collect();
    let list = from_list(chars, dot, nil);
    Ok(unify_or_nomatch(resolver, &list, &goal.term.args[1]))
}

fn chars_to_atom(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let arg1 = deref(&goal.term.args[0], resolver.arena());
    let (dot, nil) = (resolver.symbols().dot, resolver.symbols().nil);
    let (items, tail) = to_list(&arg1, resolver.arena(), dot, nil);
    if !tail.is_atom(nil) {
        return Err(resolve_error(
            "chars_to_atom/2",
            BuiltinError::NotAProperList { position: 1 },
        ));
    }
    let mut text = String::new();
    for item in &items {
        match deref(item, resolver.arena()) {
            Term::Atom(a) => text.push_str(resolver.interner().resolve(a)),
            other => {
                return Err(resolve_error(
                    "chars_to_atom/2",
                    BuiltinError::TypeMismatch {
                        position: 1,
                        expected: "Atom element",
                        got: format!("{other:?}"),
                    },
                ));
            }
        }
    }
    let atom = resolver.interner_mut().intern(&text);
    Ok(unify_or_nomatch(resolver, &Term::Atom(atom), &goal.term.args[1]))
}

fn int_to_chars(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let arg1 = deref(&goal.term.args[0], resolver.arena());
    let Term::Int(n) = arg1 else {
        return Err(resolve_error(
            "int_to_chars/2",
            BuiltinError::TypeMismatch {
                position: 1,
                expected: "Int",
                got: format!("{arg1:?}"),
            },
        ));
    };
    let (dot, nil) = (resolver.symbols().dot, resolver.symbols().nil);
    let text = n.to_string();
    let chars: Vec<Term> = text.chars().map(|c| Term::Atom(resolver.interner_mut().intern(&c.to_string()))).collect();
    let list = from_list(chars, dot, nil);
    Ok(unify_or_nomatch(resolver, &list, &goal.term.args[1]))
}

fn chars_to_int(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let arg1 = deref(&goal.term.args[0], resolver.arena());
    let (dot, nil) = (resolver.symbols().dot, resolver.symbols().nil);
    let (items, tail) = to_list(&arg1, resolver.arena(), dot, nil);
    if !tail.is_atom(nil) {
        return Err(resolve_error(
            "chars_to_int/2",
            BuiltinError::NotAProperList { position: 1 },
        ));
    }
    let mut text = String::new();
    for item in &items {
        match deref(item, resolver.arena()) {
            Term::Atom(a) => text.push_str(resolver.interner().resolve(a)),
            other => {
                return Err(resolve_error(
                    "chars_to_int/2",
                    BuiltinError::TypeMismatch {
                        position: 1,
                        expected: "Atom element",
                        got: format!("{other:?}"),
                    },
                ));
            }
        }
    }
    let n: i64 = text.parse().map_err(|_| {
        resolve_error(
            "chars_to_int/2",
            BuiltinError::TypeMismatch {
                position: 1,
                expected: "decimal digits",
                got: text.clone(),
            },
        )
    })?;
    Ok(unify_or_nomatch(resolver, &Term::Int(n), &goal.term.args[1]))
}

fn atom_length(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let arg1 = deref(&goal.term.args[0], resolver.arena());
    let Term::Atom(a) = arg1 else {
        return Err(resolve_error(
            "atom_length/2",
            BuiltinError::TypeMismatch {
                position: 1,
                expected: "Atom",
                got: format!("{arg1:?}"),
            },
        ));
    };
    let len = resolver.interner().resolve(a).chars().count() as i64;
    Ok(unify_or_nomatch(resolver, &Term::Int(len), &goal.term.args[1]))
}

fn unify_or_nomatch(resolver: &mut Resolver, built: &Term, target: &Term) -> UnifyOutcome {
    if resolver.unify_terms(built, target) {
        UnifyOutcome::Matched(Vec::new())
    } else {
        UnifyOutcome::NoMatch
    }
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let specs: [(&str, fn(&mut Resolver, &Goal) -> UnifyResult); 5] = [
        ("atom_to_chars", atom_to_chars),
        ("chars_to_atom", chars_to_atom),
        ("int_to_chars", int_to_chars),
        ("chars_to_int", chars_to_int),
        ("atom_length", atom_length),
    ];
    specs
        .into_iter()
        .map(|(name, func)| {
            let sym = interner.intern(name);
            Rule::Builtin(Builtin {
                indicator: Indicator::new(sym, 2),
                func: Rc::new(func),
            })
        })
        .collect()
}
