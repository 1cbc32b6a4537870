//! Rule model (spec.md §3, §4.3): Clause / DCG / Builtin, each exposing the
//! same tri-state `Unify` contract to the resolver.

use std::rc::Rc;

use hornlog_core::{Indicator, RefArena, RefId, Struct, Symbol, Term, WellKnownSymbols};
use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::resolver::Resolver;

/// Opaque tooling payload carried on a `Goal`. The core never inspects it
/// (spec.md §9: "preserves it as opaque and exposes no operations on it").
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LexerState(pub Option<Rc<str>>);

/// A goal submitted to the resolver: a Struct plus an optional opaque
/// tooling tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub term: Rc<Struct>,
    pub lexer_state: LexerState,
}

impl Goal {
    pub fn new(term: Struct) -> Self {
        Self {
            term: Rc::new(term),
            lexer_state: LexerState::default(),
        }
    }

    pub fn indicator(&self) -> Indicator {
        Indicator::new(self.term.name, self.term.args.len() as u32)
    }
}

/// Result of a `Rule::unify` attempt: the tri-state contract from
/// spec.md §4.5.
pub enum UnifyOutcome {
    /// Matched; continue with these goals before the current rest.
    /// Empty `Vec` means "matched, terminal success."
    Matched(Vec<Goal>),
    /// This rule did not match; try the next.
    NoMatch,
}

pub type UnifyResult = Result<UnifyOutcome, ResolveError>;

/// A head goal plus zero or more body goals.
#[derive(Clone, Debug)]
pub struct Clause {
    pub head: Struct,
    pub body: Vec<Goal>,
}

/// A grammar rule: its original (un-expanded) goal sequence, plus the
/// precomputed equivalent Clause used for resolution and for `ToAST`.
#[derive(Clone, Debug)]
pub struct Dcg {
    pub original_head: Struct,
    pub original_body: Vec<DcgTerm>,
    pub expansion: Clause,
}

/// One body element of an un-expanded DCG rule (spec.md §4.3).
#[derive(Clone, Debug)]
pub enum DcgTerm {
    /// A callable grammar goal: threaded through curr/next.
    Goal(Struct),
    /// `[e1, …, ek]`: a literal terminal sequence.
    Terminal(Vec<Term>),
    /// `{ G1, G2, … }`: pure goals, emitted as-is with no threading.
    Pure(Vec<Struct>),
}

/// Host-provided procedure backing a built-in predicate. Matches spec.md
/// §4.5's contract `(solver, goal) -> (continuation goals, success flag,
/// error)` exactly, rendered as a `Result` instead of a three-tuple. The
/// trail and ref arena are reached through `resolver`'s accessors rather
/// than threaded as separate parameters.
pub type BuiltinFn = Rc<dyn Fn(&mut Resolver, &Goal) -> UnifyResult>;

#[derive(Clone)]
pub struct Builtin {
    pub indicator: Indicator,
    pub func: BuiltinFn,
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin")
            .field("indicator", &self.indicator)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub enum Rule {
    Clause(Clause),
    Dcg(Dcg),
    Builtin(Builtin),
}

impl Rule {
    pub fn indicator(&self) -> Indicator {
        match self {
            Rule::Clause(c) => Indicator::new(c.head.name, c.head.args.len() as u32),
            Rule::Dcg(d) => {
                Indicator::new(d.original_head.name, d.original_head.args.len() as u32 + 2)
            }
            Rule::Builtin(b) => b.indicator,
        }
    }

    /// First argument of the rule's head, for first-argument indexing
    /// (spec.md §4.4). `None` for arity-0 predicates or built-ins (the
    /// database does not index those).
    pub fn first_arg(&self) -> Option<&Term> {
        match self {
            Rule::Clause(c) => c.head.args.first(),
            Rule::Dcg(d) => d.original_head.args.first(),
            Rule::Builtin(_) => None,
        }
    }

    /// Instantiate fresh Refs for this rule, unify its head against `goal`,
    /// and report the tri-state outcome.
    pub fn unify(&self, resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
        match self {
            Rule::Clause(clause) => unify_clause(clause, resolver, goal),
            Rule::Dcg(dcg) => unify_clause(&dcg.expansion, resolver, goal),
            Rule::Builtin(b) => (b.func)(resolver, goal),
        }
    }
}

fn unify_clause(clause: &Clause, resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let anon = resolver.symbols().anon;
    let mut fresh = FreshMap::new(anon);
    let head = instantiate_struct(&clause.head, resolver.arena_mut(), &mut fresh);
    let matched = resolver.unify_terms(
        &Term::struct_(goal.term.name, goal.term.args.clone()),
        &Term::struct_(head.name, head.args),
    );
    if !matched {
        return Ok(UnifyOutcome::NoMatch);
    }
    let body = clause
        .body
        .iter()
        .map(|g| Goal {
            term: Rc::new(instantiate_struct(&g.term, resolver.arena_mut(), &mut fresh)),
            lexer_state: g.lexer_state.clone(),
        })
        .collect();
    Ok(UnifyOutcome::Matched(body))
}

/// Per-instantiation map from source Var name to the fresh Ref created for
/// it, so repeated occurrences of the same Var share one Ref. The
/// anonymous name (`_`) is never looked up in the map: every occurrence
/// gets its own fresh Ref (spec.md §3).
struct FreshMap {
    anon: Symbol,
    by_name: IndexMap<Symbol, RefId>,
}

impl FreshMap {
    fn new(anon: Symbol) -> Self {
        Self {
            anon,
            by_name: IndexMap::new(),
        }
    }

    fn ref_for(&mut self, name: Symbol, arena: &mut RefArena) -> RefId {
        if name == self.anon {
            return arena.fresh(name);
        }
        if let Some(&r) = self.by_name.get(&name) {
            return r;
        }
        let r = arena.fresh(name);
        self.by_name.insert(name, r);
        r
    }
}

fn instantiate_term(t: &Term, arena: &mut RefArena, fresh: &mut FreshMap) -> Term {
    match t {
        Term::Var(name) => Term::Ref(fresh.ref_for(*name, arena)),
        Term::Struct(s) => {
            let args = s
                .args
                .iter()
                .map(|a| instantiate_term(a, arena, fresh))
                .collect();
            Term::struct_(s.name, args)
        }
        other => other.clone(),
    }
}

fn instantiate_struct(s: &Struct, arena: &mut RefArena, fresh: &mut FreshMap) -> Struct {
    Struct {
        name: s.name,
        args: s
            .args
            .iter()
            .map(|a| instantiate_term(a, arena, fresh))
            .collect(),
    }
}

/// Instantiate a top-level query's variables to fresh Refs, returning the
/// rewritten Struct plus the root environment: each distinct
/// non-anonymous Var name paired with the Ref created for it, in
/// first-occurrence order (spec.md §4.5: a solution reports the bindings
/// of the query's own variables).
pub fn instantiate_query(
    query: &Struct,
    arena: &mut RefArena,
    symbols: &WellKnownSymbols,
) -> (Struct, Vec<(Symbol, RefId)>) {
    let mut fresh = FreshMap::new(symbols.anon);
    let instantiated = instantiate_struct(query, arena, &mut fresh);
    let root_env = fresh.by_name.into_iter().collect();
    (instantiated, root_env)
}

/// Instantiate a conjunction of top-level goals sharing one fresh-variable
/// environment, so a `Var` name repeated across goals (e.g. a difference
/// list's tail threaded from one goal into the next) resolves to the same
/// `Ref` in every goal — exactly as if the goals were one clause body.
pub fn instantiate_goals(
    goals: &[Struct],
    arena: &mut RefArena,
    symbols: &WellKnownSymbols,
) -> (Vec<Struct>, Vec<(Symbol, RefId)>) {
    let mut fresh = FreshMap::new(symbols.anon);
    let instantiated = goals.iter().map(|g| instantiate_struct(g, arena, &mut fresh)).collect();
    let root_env = fresh.by_name.into_iter().collect();
    (instantiated, root_env)
}

impl Dcg {
    /// Expand a DCG rule into its equivalent Clause, per spec.md §4.3's
    /// difference-list threading algorithm. `gensym` must produce Var
    /// symbols distinct from any legal source variable name; callers wire
    /// this to the interner with a prefix the surface syntax cannot itself
    /// produce (e.g. `$L0`, `$L1`, …).
    pub fn expand(
        head: Struct,
        body: Vec<DcgTerm>,
        symbols: &WellKnownSymbols,
        mut gensym: impl FnMut() -> Symbol,
    ) -> Dcg {
        let l0 = gensym();
        let l_final = gensym();

        let mut new_head_args = head.args.clone();
        new_head_args.push(Term::Var(l0));
        new_head_args.push(Term::Var(l_final));
        let new_head = Struct {
            name: head.name,
            args: new_head_args,
        };

        let mut goals = Vec::new();
        let mut curr = Term::Var(l0);
        for item in &body {
            match item {
                DcgTerm::Terminal(elems) if elems.is_empty() => {
                    // `[]`: no goal emitted, `curr` threads through unchanged.
                }
                DcgTerm::Terminal(elems) => {
                    let next = Term::Var(gensym());
                    let rhs = hornlog_core::term::from_improper_list(
                        elems.clone(),
                        next.clone(),
                        symbols.dot,
                    );
                    goals.push(Goal::new(Struct {
                        name: symbols.eq,
                        args: vec![curr.clone(), rhs],
                    }));
                    curr = next;
                }
                DcgTerm::Pure(pures) => {
                    for g in pures {
                        goals.push(Goal::new(g.clone()));
                    }
                }
                DcgTerm::Goal(g) => {
                    let next = Term::Var(gensym());
                    let mut args = g.args.clone();
                    args.push(curr.clone());
                    args.push(next.clone());
                    goals.push(Goal::new(Struct { name: g.name, args }));
                    curr = next;
                }
            }
        }
        goals.push(Goal::new(Struct {
            name: symbols.eq,
            args: vec![curr, Term::Var(l_final)],
        }));

        Dcg {
            original_head: head,
            original_body: body,
            expansion: Clause {
                head: new_head,
                body: goals,
            },
        }
    }
}

#[cfg(test)]
mod rule_tests {
    use super::*;
    use hornlog_core::Interner;

    #[test]
    fn dcg_expansion_threads_terminal_and_goal() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
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
            Struct {
                name: greeting,
                args: vec![],
            },
            vec![
                DcgTerm::Terminal(vec![Term::Atom(hello)]),
                DcgTerm::Goal(Struct {
                    name: a,
                    args: vec![],
                }),
            ],
            &symbols,
            &mut gensym,
        );

        // head gained two threading args
        assert_eq!(dcg.expansion.head.args.len(), 2);
        // terminal emits one `=` goal, the grammar goal emits one call,
        // plus the final closing `=` goal
        assert_eq!(dcg.expansion.body.len(), 3);
        assert_eq!(Rule::Dcg(dcg).indicator().arity, 2);
    }

    #[test]
    fn empty_terminal_is_skipped_and_curr_threads_through_unchanged() {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
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

        // the `[]` emits no goal: one call for the grammar goal, plus the
        // final closing `=` goal — not three.
        assert_eq!(dcg.expansion.body.len(), 2);
    }
}
