//! The bootstrap parser (spec.md §4.8): a small hand-written, regex-driven
//! parser for the restricted surface syntax `bootstrap.pl` is written in.
//! Builds `Clause` values directly — no AST sub-language round-trip, since
//! this parser exists only to get `bootstrap.pl` itself off the ground,
//! before `hornlog-compile`'s AST compiler is reachable through any rule
//! this file defines.
//!
//! Grounded on `original_source/prol/bootstrap_parser.go`'s `parser`
//! struct and its `match`/`match2`/`database`/`clause`/`terms`/`term`/
//! `atom`/`var_`/`ws` methods.

use std::sync::LazyLock;

use hornlog_core::{Interner, Struct, Symbol, Term};
use hornlog_resolver::rule::{Clause, Goal, Rule};
use regex::Regex;

static ESCAPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\\(?s:.)").unwrap());
static ATOM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([a-z][A-Za-z0-9_]*|\[\])").unwrap());
static VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z_][A-Za-z0-9_]*").unwrap());
static INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+").unwrap());
static WS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \n\t\r]*").unwrap());
static DOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\.").unwrap());
static NECK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^:-").unwrap());
static COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^,").unwrap());
static LPAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\(").unwrap());
static RPAREN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\)").unwrap());

pub struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_at_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn try_match(&mut self, re: &Regex) -> Option<String> {
        let m = re.find(&self.text[self.pos..])?;
        let matched = m.as_str().to_string();
        self.pos += matched.len();
        Some(matched)
    }

    fn ws(&mut self) {
        self.try_match(&WS);
    }

    /// Parse as many clauses as the grammar admits, stopping (without
    /// consuming further input) at the first position that is not the
    /// start of a valid clause.
    pub fn database(&mut self, interner: &mut Interner) -> Vec<Rule> {
        let mut rules = Vec::new();
        self.ws();
        while !self.is_at_eof() {
            let checkpoint = self.pos;
            match self.clause(interner) {
                Some(rule) => rules.push(rule),
                None => {
                    self.pos = checkpoint;
                    break;
                }
            }
            self.ws();
        }
        rules
    }

    /// `clause := term ( '.' | ':-' terms '.' )`
    pub fn clause(&mut self, interner: &mut Interner) -> Option<Rule> {
        let checkpoint = self.pos;
        let head = match self.term(interner)? {
            Term::Struct(s) => (*s).clone(),
            Term::Atom(a) => Struct { name: a, args: vec![] },
            _ => {
                self.pos = checkpoint;
                return None;
            }
        };
        self.ws();
        if self.try_match(&DOT).is_some() {
            return Some(Rule::Clause(Clause { head, body: Vec::new() }));
        }
        if self.try_match(&NECK).is_none() {
            self.pos = checkpoint;
            return None;
        }
        self.ws();
        let body_terms = self.terms(interner)?;
        let body = body_terms
            .into_iter()
            .map(|t| match t {
                Term::Struct(s) => Goal::new((*s).clone()),
                Term::Atom(a) => Goal::new(Struct { name: a, args: vec![] }),
                _ => unreachable!("terms() only yields callable goals"),
            })
            .collect();
        if self.try_match(&DOT).is_none() {
            self.pos = checkpoint;
            return None;
        }
        Some(Rule::Clause(Clause { head, body }))
    }

    /// `terms := term (',' term)*`
    fn terms(&mut self, interner: &mut Interner) -> Option<Vec<Term>> {
        let mut terms = Vec::new();
        loop {
            let checkpoint = self.pos;
            let Some(term) = self.term(interner) else {
                self.pos = checkpoint;
                break;
            };
            terms.push(term);
            self.ws();
            if self.try_match(&COMMA).is_none() {
                break;
            }
            self.ws();
        }
        if terms.is_empty() { None } else { Some(terms) }
    }

    /// `term := atom ( '(' (terms | ε) ')' )? | var | int`
    fn term(&mut self, interner: &mut Interner) -> Option<Term> {
        if let Some(name) = self.atom(interner) {
            if self.try_match(&LPAREN).is_none() {
                return Some(Term::Atom(name));
            }
            self.ws();
            if self.try_match(&RPAREN).is_some() {
                return Some(Term::struct_(name, Vec::new()));
            }
            let args = self.terms(interner)?;
            self.try_match(&RPAREN)?;
            return Some(Term::struct_(name, args));
        }
        if let Some(name) = self.var_(interner) {
            return Some(Term::Var(name));
        }
        let digits = self.try_match(&INT)?;
        digits.parse::<i64>().ok().map(Term::Int)
    }

    /// `atom := '\' CHAR | /[a-z][A-Za-z0-9_]*/ | '[]'`
    fn atom(&mut self, interner: &mut Interner) -> Option<Symbol> {
        if let Some(m) = self.try_match(&ESCAPE) {
            let ch = m.strip_prefix('\\').expect("matched the escape pattern");
            return Some(interner.intern(ch));
        }
        let m = self.try_match(&ATOM)?;
        Some(interner.intern(&m))
    }

    /// `var := /[A-Z_][A-Za-z0-9_]*/`
    fn var_(&mut self, interner: &mut Interner) -> Option<Symbol> {
        let m = self.try_match(&VAR)?;
        Some(interner.intern(&m))
    }
}
