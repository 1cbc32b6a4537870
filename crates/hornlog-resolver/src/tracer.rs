//! Tracing hooks for resolver execution.
//!
//! # Design: zero-cost abstraction
//!
//! `NoopTracer`'s methods are `#[inline(always)]` empty bodies; with it
//! installed the compiler eliminates every call site and its arguments.
//! Tracing-only state (e.g. the goal text shown on backtrack) lives in the
//! tracer implementation, not in `Resolver` or `Checkpoint` — this keeps
//! the core search structures free of observability concerns.
//!
//! Grounded on `plotnik-lib::engine::trace::Tracer`.

use hornlog_core::{Indicator, Interner};

use crate::rule::Goal;

/// Resolver execution instrumentation. Each method fires at one specific
/// point in `Resolver::step` (spec.md §4.5).
pub trait Tracer {
    /// A goal was reached and its candidate list was fetched.
    fn trace_goal_enter(&mut self, goal: &Goal, indicator: Indicator, candidate_count: usize, interner: &Interner);

    /// About to attempt unifying `goal` against one candidate rule.
    fn trace_rule_try(&mut self, goal: &Goal, rule_index: usize, interner: &Interner);

    /// A rule's head did or did not unify with `goal`.
    fn trace_unify(&mut self, matched: bool);

    /// A new choice point was pushed.
    fn trace_checkpoint_push(&mut self, depth: u32);

    /// Backtracked into an existing choice point (or popped an exhausted
    /// one and kept looking further down the stack).
    fn trace_backtrack(&mut self, remaining_checkpoints: usize);

    /// A solution was produced.
    fn trace_solution(&mut self, count: u32);
}

/// Tracer that gets optimized away completely.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_goal_enter(&mut self, _goal: &Goal, _indicator: Indicator, _candidate_count: usize, _interner: &Interner) {}

    #[inline(always)]
    fn trace_rule_try(&mut self, _goal: &Goal, _rule_index: usize, _interner: &Interner) {}

    #[inline(always)]
    fn trace_unify(&mut self, _matched: bool) {}

    #[inline(always)]
    fn trace_checkpoint_push(&mut self, _depth: u32) {}

    #[inline(always)]
    fn trace_backtrack(&mut self, _remaining_checkpoints: usize) {}

    #[inline(always)]
    fn trace_solution(&mut self, _count: u32) {}
}

/// Output format for `LogTracer`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// `key=value` pairs, one per line.
    #[default]
    Logfmt,
    /// One JSON object per line.
    Json,
}

/// Tracer that writes one line per event to a sink, in either logfmt or
/// JSON. No external logging crate is introduced — the teacher's own
/// tracer is hand-rolled, so this one is too; `serde_json` (already a
/// workspace dependency) backs the JSON branch.
pub struct LogTracer<W: std::io::Write> {
    sink: W,
    format: LogFormat,
}

impl<W: std::io::Write> LogTracer<W> {
    pub fn new(sink: W, format: LogFormat) -> Self {
        Self { sink, format }
    }

    fn emit(&mut self, event: &str, fields: &[(&str, String)]) {
        match self.format {
            LogFormat::Logfmt => {
                let mut line = format!("event={event}");
                for (k, v) in fields {
                    line.push(' ');
                    line.push_str(k);
                    line.push('=');
                    line.push_str(v);
                }
                let _ = writeln!(self.sink, "{line}");
            }
            LogFormat::Json => {
                let mut obj = serde_json::Map::new();
                obj.insert("event".to_string(), serde_json::Value::String(event.to_string()));
                for (k, v) in fields {
                    obj.insert((*k).to_string(), serde_json::Value::String(v.clone()));
                }
                let _ = writeln!(self.sink, "{}", serde_json::Value::Object(obj));
            }
        }
    }
}

impl<W: std::io::Write> Tracer for LogTracer<W> {
    fn trace_goal_enter(&mut self, goal: &Goal, indicator: Indicator, candidate_count: usize, interner: &Interner) {
        self.emit(
            "goal_enter",
            &[
                ("indicator", indicator.display(interner).to_string()),
                ("candidates", candidate_count.to_string()),
                ("goal", format!("{:?}", goal.term)),
            ],
        );
    }

    fn trace_rule_try(&mut self, _goal: &Goal, rule_index: usize, _interner: &Interner) {
        self.emit("rule_try", &[("index", rule_index.to_string())]);
    }

    fn trace_unify(&mut self, matched: bool) {
        self.emit("unify", &[("matched", matched.to_string())]);
    }

    fn trace_checkpoint_push(&mut self, depth: u32) {
        self.emit("checkpoint_push", &[("depth", depth.to_string())]);
    }

    fn trace_backtrack(&mut self, remaining_checkpoints: usize) {
        self.emit("backtrack", &[("remaining", remaining_checkpoints.to_string())]);
    }

    fn trace_solution(&mut self, count: u32) {
        self.emit("solution", &[("count", count.to_string())]);
    }
}

#[cfg(test)]
mod tracer_tests {
    use super::*;

    #[test]
    fn logfmt_line_contains_event_and_fields() {
        let mut buf = Vec::new();
        let mut tracer = LogTracer::new(&mut buf, LogFormat::Logfmt);
        tracer.trace_solution(3);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("event=solution"));
        assert!(text.contains("count=3"));
    }

    #[test]
    fn json_line_is_valid_json() {
        let mut buf = Vec::new();
        let mut tracer = LogTracer::new(&mut buf, LogFormat::Json);
        tracer.trace_backtrack(2);
        let text = String::from_utf8(buf).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["event"], "backtrack");
        assert_eq!(parsed["remaining"], "2");
    }
}
