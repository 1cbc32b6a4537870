//! The resolver: an iterative depth-first SLD search, pulled one solution
//! at a time (spec.md §4.5).
//!
//! Grounded on `plotnik-vm::engine::vm`'s `execute_with` dispatch loop,
//! generalized from bytecode-instruction dispatch to SLD-resolution
//! steps. Recursive Prolog-style `solve` would blow the Rust stack on
//! deep recursion (tail calls are not guaranteed), so — exactly as the
//! teacher turns recursive AST walking into an explicit VM loop — this
//! resolver turns the textbook recursive `dfs` into an explicit state
//! machine over two owned stacks: `ContArena` (what remains to prove) and
//! `CheckpointStack` (what remains to try).

use hornlog_core::{Interner, RefArena, RefId, Struct, Symbol, Term, WellKnownSymbols};

use crate::checkpoint::{Checkpoint, CheckpointStack};
use crate::continuation::{Cont, ContArena, ContId};
use crate::database::Database;
use crate::error::ResolveError;
use crate::rule::{self, Goal, UnifyOutcome};
use crate::tracer::{NoopTracer, Tracer};
use crate::trail::{Trail, Watermark};

/// Search bounds. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bounds {
    pub max_depth: Option<u32>,
    pub limit: Option<u32>,
}

/// One answer: the query's own variables, bound to their resolved terms.
/// Unbound variables remain as fresh, never-bound Refs (spec.md §4.5: a
/// variable left unbound by the search is reported as such, not as an
/// error).
#[derive(Clone, Debug)]
pub struct Solution {
    pub bindings: Vec<(Symbol, Term)>,
}

enum Mode {
    /// Try to prove the continuation rooted at `ContId` (or succeed if
    /// `None`, i.e. the continuation is empty).
    Advance(Option<ContId>),
    /// Resume the most recent unexhausted checkpoint.
    Backtrack,
    /// The search can never produce another solution.
    Done,
}

/// Per-search engine state: database handle, root environment, trail,
/// continuation arena, checkpoint stack, depth/solution counters, and a
/// tracer (spec.md §4.5's "state per search" list).
pub struct Resolver<'db> {
    db: &'db mut Database,
    arena: RefArena,
    trail: Trail,
    conts: ContArena,
    checkpoints: CheckpointStack,
    root_env: Vec<(Symbol, RefId)>,
    root_mark: Watermark,
    depth: u32,
    bounds: Bounds,
    num_solutions: u32,
    mode: Mode,
    tracer: Box<dyn Tracer>,
}

impl<'db> Resolver<'db> {
    pub fn new(db: &'db mut Database, bounds: Bounds) -> Self {
        Self {
            db,
            arena: RefArena::new(),
            trail: Trail::new(),
            conts: ContArena::new(),
            checkpoints: CheckpointStack::new(),
            root_env: Vec::new(),
            root_mark: Watermark::default(),
            depth: 0,
            bounds,
            num_solutions: 0,
            mode: Mode::Done,
            tracer: Box::new(NoopTracer),
        }
    }

    pub fn with_tracer(mut self, tracer: Box<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    /// Prepare to search for solutions to `query`. Consumes and returns
    /// `self` so the resolver can be used directly as an iterator:
    /// `resolver.solve(q).next()`.
    pub fn solve(mut self, query: Struct) -> Self {
        let (instantiated, root_env) =
            rule::instantiate_query(&query, &mut self.arena, &self.db.symbols);
        self.root_env = root_env;
        self.root_mark = self.trail.mark();
        let goal = Goal::new(instantiated);
        let head = self.conts.push(goal, None);
        self.mode = Mode::Advance(Some(head));
        self
    }

    /// Like `solve`, but for a conjunction of goals proved left to right
    /// with variables shared across all of them — the ad hoc query a
    /// caller builds instead of asserting a throwaway clause (e.g. the
    /// bootstrap façade's `ws(Chars, Rest0), parse_rule(Rule, Rest0, Rest)`).
    pub fn solve_all(mut self, goals: Vec<Struct>) -> Self {
        let (instantiated, root_env) =
            rule::instantiate_goals(&goals, &mut self.arena, &self.db.symbols);
        self.root_env = root_env;
        self.root_mark = self.trail.mark();
        let mut head = None;
        for g in instantiated.into_iter().rev() {
            head = Some(self.conts.push(Goal::new(g), head));
        }
        self.mode = Mode::Advance(head);
        self
    }

    // --- accessors used by `Rule::unify` and built-in implementations ---

    pub fn db(&self) -> &Database {
        self.db
    }

    pub fn db_mut(&mut self) -> &mut Database {
        self.db
    }

    pub fn interner(&self) -> &Interner {
        &self.db.interner
    }

    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.db.interner
    }

    pub fn symbols(&self) -> &WellKnownSymbols {
        &self.db.symbols
    }

    pub fn arena(&self) -> &RefArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut RefArena {
        &mut self.arena
    }

    /// Disjoint-field borrow of the search arena and the database's
    /// interner at once — needed by callers (e.g. the bootstrap façade)
    /// that must both read a solution's bound terms and intern/compile
    /// against them in the same call, which `arena()`/`interner_mut()`
    /// taken separately can't express without a whole-`self` borrow
    /// conflict.
    pub fn arena_and_interner_mut(&mut self) -> (&RefArena, &mut Interner) {
        (&self.arena, &mut self.db.interner)
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn trail_mut(&mut self) -> &mut Trail {
        &mut self.trail
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn unify_terms(&mut self, a: &Term, b: &Term) -> bool {
        crate::unify::unify(a, b, &mut self.arena, &mut self.trail)
    }

    pub fn bind_ref(&mut self, r: RefId, t: Term) {
        crate::unify::bind(r, t, &mut self.arena, &mut self.trail)
    }

    /// Unbinds every Ref touched since `mark`. Exposed as one call (rather
    /// than `trail_mut()`/`arena_mut()` separately) since undoing a
    /// binding always touches both together — built-ins like `neq/2` that
    /// try a unification in a scoped snapshot use this to undo it.
    pub fn unwind_to(&mut self, mark: Watermark) -> bool {
        self.trail.unwind_to(mark, &mut self.arena)
    }

    /// Enqueue a goal to be proven next, ahead of the resolver's current
    /// continuation — for meta-predicates like `call/1` that defer to an
    /// arbitrary callable term.
    pub fn push_goal(&mut self, goal: Goal, rest: Option<ContId>) -> ContId {
        self.conts.push(goal, rest)
    }

    // --- the search loop itself ---

    fn fail_and_unwind_to_root(&mut self, err: ResolveError) -> Option<Result<Solution, ResolveError>> {
        self.trail.unwind_to(self.root_mark, &mut self.arena);
        self.mode = Mode::Done;
        Some(Err(err))
    }

    /// Run the state machine until a solution, an error, or exhaustion.
    /// `None` means the search is over with no more solutions.
    fn step(&mut self) -> Option<Result<Solution, ResolveError>> {
        loop {
            match std::mem::replace(&mut self.mode, Mode::Done) {
                Mode::Done => return None,
                Mode::Advance(cont) => match self.conts.peek(cont) {
                    Cont::Empty => {
                        self.num_solutions += 1;
                        self.tracer.trace_solution(self.num_solutions);
                        let solution = self.build_solution();
                        self.mode = Mode::Backtrack;
                        if let Some(limit) = self.bounds.limit
                            && self.num_solutions >= limit
                        {
                            // One more solution is still returned; the
                            // *next* pull sees `Mode::Done` via the limit
                            // check below, never re-entering the search.
                            self.mode = Mode::Done;
                        }
                        return Some(Ok(solution));
                    }
                    Cont::Goal(goal, rest) => {
                        self.depth += 1;
                        if let Some(max_depth) = self.bounds.max_depth
                            && self.depth > max_depth
                        {
                            return self.fail_and_unwind_to_root(ResolveError::MaxDepthReached(max_depth));
                        }
                        let ind = goal.indicator();
                        let first_arg = goal.term.args.first();
                        let candidates = match self.db.matching(ind, first_arg, &self.arena) {
                            Some(c) => c,
                            None => {
                                let err = ResolveError::unknown_predicate(ind, &self.db.interner);
                                return self.fail_and_unwind_to_root(err);
                            }
                        };
                        self.tracer
                            .trace_goal_enter(&goal, ind, candidates.len(), &self.db.interner);
                        let checkpoint = Checkpoint {
                            goal,
                            candidates: candidates.into(),
                            next_index: 0,
                            rest,
                            depth: self.depth,
                            trail_mark: self.trail.mark(),
                            cont_mark: self.conts.len(),
                        };
                        self.checkpoints.push(checkpoint);
                        self.tracer.trace_checkpoint_push(self.depth);
                        self.mode = Mode::Backtrack;
                    }
                },
                Mode::Backtrack => match self.advance_top_checkpoint() {
                    Ok(Some(next_mode)) => self.mode = next_mode,
                    Ok(None) => return None,
                    Err(err) => return self.fail_and_unwind_to_root(err),
                },
            }
        }
    }

    /// Retry the top checkpoint's next candidate, popping exhausted
    /// checkpoints as needed. Returns the resulting mode (`Advance` into
    /// the matched rule's body), or `Ok(None)` if the whole stack is
    /// exhausted.
    fn advance_top_checkpoint(&mut self) -> Result<Option<Mode>, ResolveError> {
        loop {
            let Some(cp) = self.checkpoints.top_mut() else {
                return Ok(None);
            };
            self.trail.unwind_to(cp.trail_mark, &mut self.arena);
            self.depth = cp.depth;
            self.conts.prune(cp.cont_mark);

            let Some(rule) = cp.take_next() else {
                self.checkpoints.pop();
                self.tracer.trace_backtrack(self.checkpoints.len());
                continue;
            };
            let goal = cp.goal.clone();
            let rest = cp.rest;
            let rule_index = cp.next_index - 1;

            self.tracer.trace_rule_try(&goal, rule_index, &self.db.interner);
            match rule.unify(self, &goal)? {
                UnifyOutcome::NoMatch => {
                    self.tracer.trace_unify(false);
                }
                UnifyOutcome::Matched(body) => {
                    self.tracer.trace_unify(true);
                    let new_cont = self.conts.push_body(body, rest);
                    return Ok(Some(Mode::Advance(new_cont)));
                }
            }
        }
    }

    fn build_solution(&self) -> Solution {
        let bindings = self
            .root_env
            .iter()
            .filter(|(name, _)| {
                let text = self.db.interner.try_resolve(*name).unwrap_or("");
                !text.starts_with('_')
            })
            .map(|(name, r)| (*name, hornlog_core::term::ref_to_term(&Term::Ref(*r), &self.arena)))
            .collect();
        Solution { bindings }
    }
}

impl Iterator for Resolver<'_> {
    type Item = Result<Solution, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

#[cfg(test)]
mod resolver_tests {
    use super::*;
    use crate::rule::{Clause, Rule};
    use hornlog_core::Struct;

    fn db_with_nat(db: &mut Database) {
        let zero = db.interner.intern("zero");
        let s = db.interner.intern("s");
        let nat = db.interner.intern("nat");
        let x = db.interner.intern("X");

        db.assert(Rule::Clause(Clause {
            head: Struct {
                name: nat,
                args: vec![Term::Atom(zero)],
            },
            body: vec![],
        }));
        db.assert(Rule::Clause(Clause {
            head: Struct {
                name: nat,
                args: vec![Term::struct_(s, vec![Term::Var(x)])],
            },
            body: vec![Goal::new(Struct {
                name: nat,
                args: vec![Term::Var(x)],
            })],
        }));
    }

    #[test]
    fn enumerates_solutions_in_clause_order() {
        let mut db = Database::new();
        db_with_nat(&mut db);
        let nat = db.interner.intern("nat");
        let x = db.interner.intern("X");

        let resolver = Resolver::new(&mut db, Bounds::default());
        let query = Struct {
            name: nat,
            args: vec![Term::Var(x)],
        };
        let mut solutions = resolver.solve(query);

        let first = solutions.next().unwrap().unwrap();
        assert_eq!(first.bindings.len(), 1);
    }

    #[test]
    fn unknown_predicate_is_an_error() {
        let mut db = Database::new();
        let ghost = db.interner.intern("ghost");
        let resolver = Resolver::new(&mut db, Bounds::default());
        let mut solutions = resolver.solve(Struct {
            name: ghost,
            args: vec![],
        });
        let result = solutions.next().unwrap();
        assert!(matches!(result, Err(ResolveError::UnknownPredicate(_))));
    }

    #[test]
    fn fact_with_no_body_yields_exactly_one_solution() {
        let mut db = Database::new();
        let zero = db.interner.intern("zero");
        let nat = db.interner.intern("nat");
        db.assert(Rule::Clause(Clause {
            head: Struct {
                name: nat,
                args: vec![Term::Atom(zero)],
            },
            body: vec![],
        }));

        let resolver = Resolver::new(&mut db, Bounds::default());
        let mut solutions = resolver.solve(Struct {
            name: nat,
            args: vec![Term::Atom(zero)],
        });
        assert!(solutions.next().unwrap().is_ok());
        assert!(solutions.next().is_none());
    }

    #[test]
    fn limit_stops_after_requested_solution_count() {
        let mut db = Database::new();
        db_with_nat(&mut db);
        let nat = db.interner.intern("nat");
        let x = db.interner.intern("X");

        let resolver = Resolver::new(
            &mut db,
            Bounds {
                max_depth: None,
                limit: Some(1),
            },
        );
        let mut solutions = resolver.solve(Struct {
            name: nat,
            args: vec![Term::Var(x)],
        });
        assert!(solutions.next().unwrap().is_ok());
        assert!(solutions.next().is_none());
    }
}
