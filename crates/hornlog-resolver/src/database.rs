//! Database: ordered predicate indicators, per-indicator ordered rule
//! list, first-argument index (spec.md §4.4).
//!
//! Grounded on `original_source/prol/database.go`'s `Database`/`Assert`/
//! `Matching`/`PutPredicate`, with `index0` implemented as an
//! `indexmap::IndexMap` (the teacher's pervasive choice for
//! insertion-ordered maps) rather than the Go original's parallel
//! slice+map.

use std::collections::HashMap;
use std::collections::HashSet;
use std::rc::Rc;

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, RefArena, Term, WellKnownSymbols};
use indexmap::IndexMap;

use crate::rule::Rule;

/// One maximal contiguous run of same-first-argument-shape rules within a
/// predicate's rule list (spec.md §4.4).
enum Block {
    Variable(Vec<Rc<Rule>>),
    NonVariable {
        by_atom: HashMap<hornlog_core::Symbol, Vec<Rc<Rule>>>,
        by_int: HashMap<i64, Vec<Rc<Rule>>>,
        by_struct: HashMap<Indicator, Vec<Rc<Rule>>>,
        rules: Vec<Rc<Rule>>,
    },
}

impl Block {
    fn new_variable() -> Self {
        Block::Variable(Vec::new())
    }

    fn new_non_variable() -> Self {
        Block::NonVariable {
            by_atom: HashMap::new(),
            by_int: HashMap::new(),
            by_struct: HashMap::new(),
            rules: Vec::new(),
        }
    }

    fn is_variable(&self) -> bool {
        matches!(self, Block::Variable(_))
    }

    fn push(&mut self, rule: Rc<Rule>, first_arg: &Term) {
        match self {
            Block::Variable(rules) => rules.push(rule),
            Block::NonVariable {
                by_atom,
                by_int,
                by_struct,
                rules,
            } => {
                match first_arg {
                    Term::Atom(a) => by_atom.entry(*a).or_default().push(rule.clone()),
                    Term::Int(n) => by_int.entry(*n).or_default().push(rule.clone()),
                    Term::Struct(s) => by_struct
                        .entry(Indicator::new(s.name, s.args.len() as u32))
                        .or_default()
                        .push(rule.clone()),
                    _ => {}
                }
                rules.push(rule);
            }
        }
    }

    fn append_matches(&self, goal_first_arg: &Term, out: &mut Vec<Rc<Rule>>) {
        match self {
            Block::Variable(rules) => out.extend(rules.iter().cloned()),
            Block::NonVariable {
                by_atom,
                by_int,
                by_struct,
                ..
            } => match goal_first_arg {
                Term::Atom(a) => {
                    if let Some(rs) = by_atom.get(a) {
                        out.extend(rs.iter().cloned());
                    }
                }
                Term::Int(n) => {
                    if let Some(rs) = by_int.get(n) {
                        out.extend(rs.iter().cloned());
                    }
                }
                Term::Struct(s) => {
                    let ind = Indicator::new(s.name, s.args.len() as u32);
                    if let Some(rs) = by_struct.get(&ind) {
                        out.extend(rs.iter().cloned());
                    }
                }
                _ => {}
            },
        }
    }
}

#[derive(Default)]
struct SecondaryIndex {
    blocks: Vec<Block>,
}

impl SecondaryIndex {
    fn push(&mut self, rule: Rc<Rule>, first_arg: &Term) {
        let is_var = matches!(first_arg, Term::Var(_) | Term::Ref(_));
        let needs_new_block = match self.blocks.last() {
            Some(b) => b.is_variable() != is_var,
            None => true,
        };
        if needs_new_block {
            self.blocks.push(if is_var {
                Block::new_variable()
            } else {
                Block::new_non_variable()
            });
        }
        self.blocks.last_mut().unwrap().push(rule, first_arg);
    }

    fn matching(&self, goal_first_arg: &Term) -> Vec<Rc<Rule>> {
        let mut out = Vec::new();
        for block in &self.blocks {
            block.append_matches(goal_first_arg, &mut out);
        }
        out
    }
}

pub struct Database {
    pub interner: Interner,
    pub symbols: WellKnownSymbols,
    order: IndexMap<Indicator, Vec<Rc<Rule>>>,
    index1: HashMap<Indicator, SecondaryIndex>,
    breakpoints: HashSet<Indicator>,
}

impl Database {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let symbols = WellKnownSymbols::intern(&mut interner);
        Self {
            interner,
            symbols,
            order: IndexMap::new(),
            index1: HashMap::new(),
            breakpoints: HashSet::new(),
        }
    }

    pub fn contains_indicator(&self, ind: Indicator) -> bool {
        self.order.contains_key(&ind)
    }

    /// Indexed rules are only kept for predicates of arity >= 1 that are
    /// not built-ins (spec.md §4.4: "Built-in rules and clauses of arity 0
    /// are not indexed").
    fn indexable(rule: &Rule) -> bool {
        !matches!(rule, Rule::Builtin(_)) && rule.indicator().arity >= 1
    }

    /// Appends `rule` to its predicate's list, creating the entry if new,
    /// and updates the secondary index.
    pub fn assert(&mut self, rule: Rule) {
        let ind = rule.indicator();
        let rule = Rc::new(rule);
        self.order.entry(ind).or_default().push(rule.clone());
        if Self::indexable(&rule)
            && let Some(first_arg) = rule.first_arg()
        {
            self.index1
                .entry(ind)
                .or_default()
                .push(rule.clone(), first_arg);
        }
    }

    /// Deletes `ind`'s existing entry (both indices) and re-asserts each
    /// rule in order, preserving `Assert`'s user-visible ordering.
    pub fn put_predicate(&mut self, ind: Indicator, rules: Vec<Rule>) {
        self.order.shift_remove(&ind);
        self.index1.remove(&ind);
        for rule in rules {
            debug_assert_eq!(rule.indicator(), ind, "put_predicate: indicator mismatch");
            self.assert(rule);
        }
    }

    /// Returns a snapshot (never a live view — spec.md §9's
    /// indexing-invalidation rule) of rules that might match `goal`, or
    /// `None` if the indicator has never been asserted.
    pub fn matching(&self, ind: Indicator, goal_first_arg: Option<&Term>, arena: &RefArena) -> Option<Vec<Rc<Rule>>> {
        let all = self.order.get(&ind)?;
        let Some(index1) = self.index1.get(&ind) else {
            return Some(all.clone());
        };
        let Some(first_arg) = goal_first_arg else {
            return Some(all.clone());
        };
        let derefed = deref(first_arg, arena);
        if matches!(derefed, Term::Ref(_)) {
            return Some(all.clone());
        }
        Some(index1.matching(&derefed))
    }

    pub fn put_breakpoint(&mut self, ind: Indicator) {
        self.breakpoints.insert(ind);
    }

    pub fn clear_breakpoint(&mut self, ind: Indicator) {
        self.breakpoints.remove(&ind);
    }

    pub fn has_breakpoint(&self, ind: Indicator) -> bool {
        self.breakpoints.contains(&ind)
    }

    pub fn rules(&self, ind: Indicator) -> &[Rc<Rule>] {
        self.order.get(&ind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Shallow clone: shares immutable rule values (`Rc`) but duplicates
    /// the index maps, per spec.md §5's isolation contract. The interner
    /// is duplicated too since two independent databases must not alias
    /// each other's future symbol allocations.
    pub fn deep_clone_indices(&self) -> Self {
        Self {
            interner: self.interner.clone(),
            symbols: self.symbols,
            order: self.order.clone(),
            index1: self
                .index1
                .iter()
                .map(|(ind, idx)| (*ind, idx.shallow_copy()))
                .collect(),
            breakpoints: self.breakpoints.clone(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl SecondaryIndex {
    fn shallow_copy(&self) -> Self {
        Self {
            blocks: self
                .blocks
                .iter()
                .map(|b| match b {
                    Block::Variable(rules) => Block::Variable(rules.clone()),
                    Block::NonVariable {
                        by_atom,
                        by_int,
                        by_struct,
                        rules,
                    } => Block::NonVariable {
                        by_atom: by_atom.clone(),
                        by_int: by_int.clone(),
                        by_struct: by_struct.clone(),
                        rules: rules.clone(),
                    },
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod database_tests {
    use super::*;
    use crate::rule::{Clause, Goal};
    use hornlog_core::Struct;

    fn fact(db: &mut Database, name: &str, arg: Term) {
        let sym = db.interner.intern(name);
        db.assert(Rule::Clause(Clause {
            head: Struct {
                name: sym,
                args: vec![arg],
            },
            body: vec![],
        }));
    }

    #[test]
    fn unknown_indicator_is_distinguished_from_empty_match() {
        let db = Database::new();
        let bit = hornlog_core::Indicator::new(
            hornlog_core::Symbol::from_raw(9999),
            1,
        );
        assert!(!db.contains_indicator(bit));
    }

    #[test]
    fn insertion_order_preserved_across_blocks() {
        let mut db = Database::new();
        fact(&mut db, "bit", Term::Int(0));
        fact(&mut db, "bit", Term::Int(1));
        let sym = db.interner.intern("bit");
        let ind = Indicator::new(sym, 1);
        assert!(db.contains_indicator(ind));
        let rules = db.rules(ind);
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn matching_prunes_by_first_argument() {
        let mut db = Database::new();
        fact(&mut db, "bit", Term::Int(0));
        fact(&mut db, "bit", Term::Int(1));
        let sym = db.interner.intern("bit");
        let ind = Indicator::new(sym, 1);
        let arena = RefArena::new();
        let goal = Goal::new(Struct {
            name: sym,
            args: vec![Term::Int(1)],
        });
        let result = db
            .matching(ind, goal.term.args.first(), &arena)
            .expect("indicator exists");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn put_predicate_replaces_rules_atomically() {
        let mut db = Database::new();
        fact(&mut db, "bit", Term::Int(0));
        let sym = db.interner.intern("bit");
        let ind = Indicator::new(sym, 1);
        db.put_predicate(
            ind,
            vec![Rule::Clause(Clause {
                head: Struct {
                    name: sym,
                    args: vec![Term::Int(7)],
                },
                body: vec![],
            })],
        );
        assert_eq!(db.rules(ind).len(), 1);
    }
}
