//! `put_breakpoint/1`, `clear_breakpoint/1` (spec.md §4.7): toggle a
//! per-indicator breakpoint flag consulted by the resolver's tracer.
//!
//! Grounded on `original_source/prol/debugger.go`'s `putBreakpoint`/
//! `clearBreakpoint`, backed here by `Database::put_breakpoint`/
//! `clear_breakpoint` instead of a bare `map[Indicator]struct{}`.

use std::rc::Rc;

use hornlog_core::{Indicator, Interner};
use hornlog_compile::compile_indicator;
use hornlog_resolver::rule::{Goal, Rule, UnifyOutcome, UnifyResult};
use hornlog_resolver::{Builtin, Resolver};

use crate::error::resolve_error;

fn put_breakpoint(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let ind = compile_indicator(&goal.term.args[0], resolver.arena(), resolver.interner()).map_err(|e| resolve_error("put_breakpoint/1", e))?;
    resolver.db_mut().put_breakpoint(ind);
    Ok(UnifyOutcome::Matched(Vec::new()))
}

fn clear_breakpoint(resolver: &mut Resolver, goal: &Goal) -> UnifyResult {
    let ind = compile_indicator(&goal.term.args[0], resolver.arena(), resolver.interner()).map_err(|e| resolve_error("clear_breakpoint/1", e))?;
    resolver.db_mut().clear_breakpoint(ind);
    Ok(UnifyOutcome::Matched(Vec::new()))
}

pub fn rules(interner: &mut Interner) -> Vec<Rule> {
    let put = interner.intern("put_breakpoint");
    let clear = interner.intern("clear_breakpoint");
    vec![
        Rule::Builtin(Builtin {
            indicator: Indicator::new(put, 1),
            func: Rc::new(put_breakpoint),
        }),
        Rule::Builtin(Builtin {
            indicator: Indicator::new(clear, 1),
            func: Rc::new(clear_breakpoint),
        }),
    ]
}
