//! Printing rules (used by logs and tests, not by wire formats): atoms are
//! quoted unless they look like identifiers, operator runs, or `[]`; proper
//! char-lists print as double-quoted strings; other proper lists print as
//! `[e1, e2, …]`; improper-but-cons-prefixed terms print as `[e1, …|tail]`;
//! Refs print as `Name@id`.

use std::fmt;

use crate::interner::{Interner, Symbol};
use crate::term::{RefArena, Term, deref, to_list};

const SYMBOLIC_CHARS: &str = "=<>+*/^\\-";

fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn is_symbolic_run(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| SYMBOLIC_CHARS.contains(c))
}

fn quote_atom(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
            out.push('\'');
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

fn write_atom_text(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if s == "[]" || is_plain_identifier(s) || is_symbolic_run(s) {
        write!(f, "{s}")
    } else {
        write!(f, "{}", quote_atom(s))
    }
}

/// Bundles the borrowed context a `Term` needs to render itself:
/// the interner (atom/var text) and the ref arena (deref + bindings).
pub struct Printer<'a> {
    pub interner: &'a Interner,
    pub arena: &'a RefArena,
    pub dot: Symbol,
    pub nil: Symbol,
}

impl<'a> Printer<'a> {
    pub fn new(interner: &'a Interner, arena: &'a RefArena, dot: Symbol, nil: Symbol) -> Self {
        Self {
            interner,
            arena,
            dot,
            nil,
        }
    }

    pub fn display(&'a self, term: &'a Term) -> TermDisplay<'a> {
        TermDisplay { p: self, term }
    }

    fn fmt_term(&self, f: &mut fmt::Formatter<'_>, term: &Term) -> fmt::Result {
        match term {
            Term::Atom(a) => write_atom_text(f, self.interner.resolve(*a)),
            Term::Int(n) => write!(f, "{n}"),
            Term::Var(v) => write!(f, "{}", self.interner.resolve(*v)),
            Term::Ref(r) => {
                write!(
                    f,
                    "{}@{}",
                    self.interner.resolve(self.arena.name(*r)),
                    self.arena.display_id(*r)
                )
            }
            Term::Struct(s) if s.name == self.dot && s.args.len() == 2 => {
                self.fmt_cons(f, term)
            }
            Term::Struct(s) => {
                write_atom_text(f, self.interner.resolve(s.name))?;
                write!(f, "(")?;
                for (i, a) in s.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.fmt_term(f, a)?;
                }
                write!(f, ")")
            }
        }
    }

    fn fmt_cons(&self, f: &mut fmt::Formatter<'_>, term: &Term) -> fmt::Result {
        let (items, tail) = to_list(term, self.arena, self.dot, self.nil);
        let proper = tail.is_atom(self.nil);

        if proper && self.all_single_char_atoms(&items) {
            write!(f, "\"")?;
            for item in &items {
                if let Term::Atom(a) = deref(item, self.arena) {
                    let text = self.interner.resolve(a);
                    if text == "\"" {
                        write!(f, "\"\"")?;
                    } else {
                        write!(f, "{text}")?;
                    }
                }
            }
            return write!(f, "\"");
        }

        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.fmt_term(f, item)?;
        }
        if !proper {
            write!(f, "|")?;
            self.fmt_term(f, &tail)?;
        }
        write!(f, "]")
    }

    fn all_single_char_atoms(&self, items: &[Term]) -> bool {
        !items.is_empty()
            && items.iter().all(|item| match deref(item, self.arena) {
                Term::Atom(a) => self.interner.resolve(a).chars().count() == 1,
                _ => false,
            })
    }
}

pub struct TermDisplay<'a> {
    p: &'a Printer<'a>,
    term: &'a Term,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.p.fmt_term(f, self.term)
    }
}
