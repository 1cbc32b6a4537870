//! `print/1` (spec.md §4.7): side-effecting debug output of a term.
//!
//! Grounded on `hornlog_core::print::Printer`, the same term renderer the
//! tracer and CLI use — `print/1` is a program-level counterpart to those,
//! not routed through `Tracer` (which only ever sees the resolver's own
//! goals, not arbitrary terms a program asks to display).

use std::rc::Rc;

use hornlog_core::term::deref;
use hornlog_core::{Indicator, Interner, Printer};
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

fn print_goal(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let term = deref(&goal.term.args[0], resolver.arena());
    let printer = Printer::new(resolver.interner(), resolver.arena(), resolver.symbols().dot, resolver.symbols().nil);
    println!("{}", printer.display(&term));
    Ok(UnifyOutcome::Matched(Vec::new()))
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let print = interner.intern("print");
    vec![Rule::Builtin(Builtin {
        indicator: Indicator::new(print, 1),
        func: Rc::new(print_goal),
    })]
}
