//! The term model: Atom / Int / Var / Struct / Ref.
//!
//! `Ref` cells live in a `RefArena`, one per search (per spec design note:
//! "Model Refs as indices into a per-search arena"). Indices stay valid for
//! the arena's whole lifetime — cells are never removed, only bound/unbound.

use std::fmt;
use std::rc::Rc;

use crate::interner::Symbol;

/// A compound term: a name plus an ordered argument list. Its indicator is
/// `(name, args.len())`. Cons-lists use name `.` with two args.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Struct {
    pub name: Symbol,
    pub args: Vec<Term>,
}

/// A value. Atoms/Ints/Structs are value-typed (freely cloned — `Struct` is
/// `Rc`-shared so cloning a compound term is O(1)); `Var` only occurs in
/// source rules and ASTs, never post-instantiation; `Ref` is a handle into
/// a `RefArena`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Atom(Symbol),
    Int(i64),
    /// Static-time variable name. Replaced by a fresh `Ref` the first time
    /// a rule is instantiated or a query is evaluated. The name `_` means
    /// "anonymous": every occurrence gets its own fresh `Ref`.
    Var(Symbol),
    Struct(Rc<Struct>),
    Ref(RefId),
}

impl Term {
    pub fn struct_(name: Symbol, args: Vec<Term>) -> Term {
        Term::Struct(Rc::new(Struct { name, args }))
    }

    pub fn is_atom(&self, sym: Symbol) -> bool {
        matches!(self, Term::Atom(a) if *a == sym)
    }
}

/// Handle to a mutable binding cell, an index into a `RefArena`.
///
/// Two `RefId`s are equal iff they name the same cell in the same arena
/// (invariant: "equality on Refs is identity of the cell").
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RefId(u32);

struct Slot {
    name: Symbol,
    display_id: u64,
    value: Option<Term>,
}

/// Append-only arena of Ref cells for one search. Cells are created by
/// `fresh`, bound by `set_value` (recorded on the trail by the caller),
/// and unbound by `clear_value` during backtracking unwind.
#[derive(Default)]
pub struct RefArena {
    slots: Vec<Slot>,
    next_display_id: u64,
}

impl RefArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fresh(&mut self, name: Symbol) -> RefId {
        let display_id = self.next_display_id;
        self.next_display_id += 1;
        let idx = self.slots.len() as u32;
        self.slots.push(Slot {
            name,
            display_id,
            value: None,
        });
        RefId(idx)
    }

    #[inline]
    pub fn value(&self, r: RefId) -> Option<&Term> {
        self.slots[r.0 as usize].value.as_ref()
    }

    #[inline]
    pub fn is_bound(&self, r: RefId) -> bool {
        self.slots[r.0 as usize].value.is_some()
    }

    /// Binds the cell. Callers in `hornlog-resolver` are responsible for
    /// recording this on the trail before calling this method.
    #[inline]
    pub fn set_value(&mut self, r: RefId, t: Term) {
        self.slots[r.0 as usize].value = Some(t);
    }

    /// Unbinds the cell. Used only by trail unwind.
    #[inline]
    pub fn clear_value(&mut self, r: RefId) {
        self.slots[r.0 as usize].value = None;
    }

    #[inline]
    pub fn name(&self, r: RefId) -> Symbol {
        self.slots[r.0 as usize].name
    }

    #[inline]
    pub fn display_id(&self, r: RefId) -> u64 {
        self.slots[r.0 as usize].display_id
    }
}

/// Follow `Ref` links until a non-Ref or an unbound Ref is reached.
/// Loop-free: binding never introduces a cycle through this chain.
pub fn deref(t: &Term, arena: &RefArena) -> Term {
    let mut cur = t.clone();
    while let Term::Ref(r) = cur {
        match arena.value(r) {
            Some(bound) => cur = bound.clone(),
            None => return Term::Ref(r),
        }
    }
    cur
}

/// Deep copy that replaces bound Refs with their resolved contents,
/// leaving unbound Refs in place. Safe to hand to a caller outside the
/// search (no aliasing with the live arena after this call, except
/// through any unbound Refs it still mentions).
pub fn ref_to_term(t: &Term, arena: &RefArena) -> Term {
    match deref(t, arena) {
        Term::Struct(s) => {
            let args = s.args.iter().map(|a| ref_to_term(a, arena)).collect();
            Term::struct_(s.name, args)
        }
        other => other,
    }
}

/// Build a proper cons-list from `items`, closed by the atom `nil`.
pub fn from_list(items: Vec<Term>, dot: Symbol, nil: Symbol) -> Term {
    from_improper_list(items, Term::Atom(nil), dot)
}

/// Build a cons-list from `items`, closed by an arbitrary `tail` term
/// (which need not be `[]` — used for difference lists).
pub fn from_improper_list(items: Vec<Term>, tail: Term, dot: Symbol) -> Term {
    let mut acc = tail;
    for item in items.into_iter().rev() {
        acc = Term::struct_(dot, vec![item, acc]);
    }
    acc
}

/// Walk the cons spine, dereferencing each tail cell. Returns the prefix of
/// cons cells found plus the first non-cons tail (`[]`, an unbound Ref, or
/// anything else for an improper list).
pub fn to_list(t: &Term, arena: &RefArena, dot: Symbol, nil: Symbol) -> (Vec<Term>, Term) {
    let _ = nil;
    let mut items = Vec::new();
    let mut cur = deref(t, arena);
    loop {
        match &cur {
            Term::Struct(s) if s.name == dot && s.args.len() == 2 => {
                items.push(s.args[0].clone());
                cur = deref(&s.args[1], arena);
            }
            _ => break,
        }
    }
    (items, cur)
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StringConversionError {
    #[error("list is improper (no `[]` tail)")]
    ImproperList,
    #[error("list element is not an atom")]
    NotAnAtom,
    #[error("list element atom is not exactly one character")]
    NotSingleChar,
}

/// Build a cons-list of single-character atoms from a Rust string.
pub fn from_string(
    s: &str,
    interner: &mut crate::interner::Interner,
    dot: Symbol,
    nil: Symbol,
) -> Term {
    let mut buf = [0u8; 4];
    let items = s
        .chars()
        .map(|c| Term::Atom(interner.intern(c.encode_utf8(&mut buf))))
        .collect();
    from_list(items, dot, nil)
}

/// Inverse of `from_string`: fails if any element is not a single-char
/// atom or the list is improper.
pub fn to_string(
    t: &Term,
    arena: &RefArena,
    interner: &crate::interner::Interner,
    dot: Symbol,
    nil: Symbol,
) -> Result<String, StringConversionError> {
    let (items, tail) = to_list(t, arena, dot, nil);
    if !tail.is_atom(nil) {
        return Err(StringConversionError::ImproperList);
    }
    let mut out = String::new();
    for item in items {
        match deref(&item, arena) {
            Term::Atom(a) => {
                let text = interner.resolve(a);
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => out.push(c),
                    _ => return Err(StringConversionError::NotSingleChar),
                }
            }
            _ => return Err(StringConversionError::NotAnAtom),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod term_tests {
    use super::*;
    use crate::interner::Interner;

    fn syms(interner: &mut Interner) -> (Symbol, Symbol) {
        (interner.intern("."), interner.intern("[]"))
    }

    #[test]
    fn deref_stops_at_unbound_ref() {
        let mut interner = Interner::new();
        let mut arena = RefArena::new();
        let x = interner.intern("X");
        let r = arena.fresh(x);
        assert_eq!(deref(&Term::Ref(r), &arena), Term::Ref(r));
    }

    #[test]
    fn deref_follows_chain_to_fixed_point() {
        let mut interner = Interner::new();
        let mut arena = RefArena::new();
        let x = interner.intern("X");
        let a = interner.intern("a");
        let r1 = arena.fresh(x);
        let r2 = arena.fresh(x);
        arena.set_value(r1, Term::Ref(r2));
        arena.set_value(r2, Term::Atom(a));
        assert_eq!(deref(&Term::Ref(r1), &arena), Term::Atom(a));
    }

    #[test]
    fn ref_to_term_resolves_nested_structs() {
        let mut interner = Interner::new();
        let mut arena = RefArena::new();
        let (dot, nil) = syms(&mut interner);
        let x = interner.intern("X");
        let a = interner.intern("a");
        let r = arena.fresh(x);
        arena.set_value(r, Term::Atom(a));
        let list = from_list(vec![Term::Ref(r), Term::Atom(nil)], dot, nil);
        let resolved = ref_to_term(&list, &arena);
        let (items, tail) = to_list(&resolved, &arena, dot, nil);
        assert_eq!(items, vec![Term::Atom(a), Term::Atom(nil)]);
        assert_eq!(tail, Term::Atom(nil));
    }

    #[test]
    fn list_string_round_trip() {
        let mut interner = Interner::new();
        let arena = RefArena::new();
        let (dot, nil) = syms(&mut interner);
        let t = from_string("abc", &mut interner, dot, nil);
        let s = to_string(&t, &arena, &interner, dot, nil).unwrap();
        assert_eq!(s, "abc");
    }

    #[test]
    fn to_list_reports_improper_tail() {
        let mut interner = Interner::new();
        let arena = RefArena::new();
        let (dot, nil) = syms(&mut interner);
        let x = interner.intern("X");
        let tail = Term::Var(x);
        let t = from_improper_list(vec![Term::Int(1), Term::Int(2)], tail.clone(), dot);
        let (items, found_tail) = to_list(&t, &arena, dot, nil);
        assert_eq!(items, vec![Term::Int(1), Term::Int(2)]);
        assert_eq!(found_tail, tail);
    }
}
