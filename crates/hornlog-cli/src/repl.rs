//! The read-eval-print loop (spec.md §6): query entry at the `?- ` prompt,
//! then solution iteration at the `;) continue .) stop ` prompt, one
//! solution pulled from the resolver at a time.
//!
//! Grounded on `plotnik-cli::commands::exec::run`'s plain-args-in,
//! print-or-exit-with-code shape, adapted from one-shot execution to a
//! loop because spec.md's CLI is interactive.

use std::io::{self, BufRead, Write};
use std::ops::Range;

use hornlog_core::{Interner, Printer, RefArena, Struct, WellKnownSymbols};
use hornlog_resolver::rule::Rule;
use hornlog_resolver::{Bounds, Database, LogTracer, Resolver, Solution};

use crate::cli::{Cli, ParserMode};
use crate::diagnostics;

/// Run the loop to completion (`exit` or end-of-input on the query prompt).
pub fn run(db: &mut Database, cli: &Cli) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_flush("?- ")?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let input = line?;
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" {
            return Ok(());
        }

        let goals = match parse_query(db, cli.parser, input) {
            Ok(goals) => goals,
            Err((message, span)) => {
                println!("{}", diagnostics::render(&message, Some(input), span));
                continue;
            }
        };

        if !run_query(db, cli, goals, &mut lines)? {
            return Ok(());
        }
    }
}

/// Parse `input` into a goal conjunction using whichever parser `mode`
/// names, by wrapping it as a throwaway clause/directive and reusing the
/// already-compiled body the bootstrap crate's own entry points produce —
/// there is no public "compile a bare goal list" function to call
/// directly (`hornlog_compile::ast::compile_goal_structs` is private).
fn parse_query(db: &mut Database, mode: ParserMode, input: &str) -> Result<Vec<Struct>, (String, Option<Range<usize>>)> {
    match mode {
        ParserMode::Bootstrap => {
            let wrapped = format!("query :- {input}.");
            let mut parser = hornlog_bootstrap::parser::Parser::new(&wrapped);
            match parser.clause(&mut db.interner) {
                Some(Rule::Clause(clause)) => Ok(clause.body.into_iter().map(|g| (*g.term).clone()).collect()),
                _ => Err(("could not parse query in the bootstrap dialect".to_string(), None)),
            }
        }
        ParserMode::Prelude => {
            let wrapped = format!(":- {input}.");
            match hornlog_bootstrap::facade::query(db, &wrapped) {
                Ok(Rule::Clause(clause)) => Ok(clause.body.into_iter().map(|g| (*g.term).clone()).collect()),
                Ok(other) => Err((format!("query did not parse as a directive: {other:?}"), None)),
                Err(e) => {
                    let span = diagnostics::bootstrap_error_span(&e);
                    Err((e.to_string(), span))
                }
            }
        }
    }
}

/// Drive one query's solution iteration. Returns `false` if end-of-input
/// was hit mid-iteration (the whole REPL should stop), `true` otherwise.
fn run_query(
    db: &mut Database,
    cli: &Cli,
    goals: Vec<Struct>,
    lines: &mut io::Lines<io::StdinLock<'_>>,
) -> io::Result<bool> {
    let bounds = Bounds { max_depth: cli.max_depth, limit: None };
    let mut resolver = Resolver::new(db, bounds);
    if cli.trace {
        resolver = resolver.with_tracer(Box::new(LogTracer::new(io::stderr(), cli.log_format.into())));
    }
    let mut solutions = resolver.solve_all(goals);

    loop {
        match solutions.next() {
            None => {
                println!("false.");
                return Ok(true);
            }
            Some(Err(e)) if e.is_internal_signal() => {
                return Ok(true);
            }
            Some(Err(e)) => {
                println!("{}", diagnostics::render(&e.to_string(), None, None));
                return Ok(true);
            }
            Some(Ok(solution)) => {
                print_solution(&solution, solutions.interner(), solutions.arena(), solutions.symbols());
                print_flush(";) continue .) stop ")?;
                let Some(line) = lines.next() else {
                    return Ok(false);
                };
                let response = line?;
                if response.trim() != ";" {
                    return Ok(true);
                }
            }
        }
    }
}

fn print_solution(solution: &Solution, interner: &Interner, arena: &RefArena, symbols: &WellKnownSymbols) {
    if solution.bindings.is_empty() {
        println!("true.");
        return;
    }
    let printer = Printer::new(interner, arena, symbols.dot, symbols.nil);
    let rendered: Vec<String> = solution
        .bindings
        .iter()
        .map(|(name, term)| format!("{} = {}", interner.resolve(*name), printer.display(term)))
        .collect();
    println!("{}", rendered.join(",\n"));
}

fn print_flush(prompt: &str) -> io::Result<()> {
    print!("{prompt}");
    io::stdout().flush()
}
