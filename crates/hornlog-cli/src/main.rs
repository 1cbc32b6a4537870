//! `hornlog`: a read-eval-print loop over the hornlog logic-programming
//! database (spec.md §6). Not part of the core — a thin driver over
//! `hornlog-bootstrap`'s database constructors and `hornlog-resolver`'s
//! `Resolver`.
//!
//! Grounded on `plotnik-cli::main`'s dispatch-then-exit shape, simplified
//! since this binary has one mode (the loop) rather than subcommands.

mod cli;
mod diagnostics;
mod repl;

use std::fs;
use std::ops::Range;
use std::process::ExitCode;

use clap::Parser as _;
use cli::{Cli, ParserMode};
use hornlog_resolver::Database;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut db = match build_database(cli.parser) {
        Ok(db) => db,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    for path in &cli.consult_paths {
        if let Err(message) = consult(&mut db, path) {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    }

    match repl::run(&mut db, &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("i/o error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_database(mode: ParserMode) -> Result<Database, String> {
    let result = match mode {
        ParserMode::Bootstrap => hornlog_bootstrap::bootstrap_only_database(),
        ParserMode::Prelude => hornlog_bootstrap::new_database(),
    };
    result.map_err(|e| render_bootstrap_error(&e, None))
}

fn consult(db: &mut Database, path: &std::path::Path) -> Result<(), String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    hornlog_bootstrap::interpret(db, &text).map_err(|e| render_bootstrap_error(&e, Some(&text)))
}

fn render_bootstrap_error(err: &hornlog_bootstrap::BootstrapError, source: Option<&str>) -> String {
    let span: Option<Range<usize>> = diagnostics::bootstrap_error_span(err);
    diagnostics::render(&err.to_string(), source, span)
}
