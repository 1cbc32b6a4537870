//! Command-line flags (spec.md §6's CLI flags).
//!
//! Grounded on `plotnik-cli::cli`'s `clap`-derive `Parser`/`ValueEnum`
//! shape (`plotnik`'s `Cli { command: Command }`), simplified here to a
//! subcommand-free binary since spec.md describes exactly one mode: the
//! REPL.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Which parser the database is loaded up to, and which one the REPL uses
/// to read query lines (spec.md §6: "`--parser=(bootstrap|prelude)` selects
/// which parser to load").
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum ParserMode {
    /// Load only `lib/bootstrap.pl`, through the hand-written restricted-
    /// dialect `Parser`. Queries are read with that same parser.
    Bootstrap,
    /// Load `lib/bootstrap.pl` and `lib/prelude.pl`, the latter through the
    /// self-hosted parser it defines. Queries are read through the
    /// self-hosted parser too (spec.md's full source syntax).
    #[default]
    Prelude,
}

/// Output format for `--log-format`, mirroring `hornlog_resolver::tracer::LogFormat`.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq)]
pub enum LogFormatArg {
    #[default]
    Logfmt,
    Json,
}

impl From<LogFormatArg> for hornlog_resolver::LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Logfmt => hornlog_resolver::LogFormat::Logfmt,
            LogFormatArg::Json => hornlog_resolver::LogFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "hornlog", bin_name = "hornlog")]
#[command(about = "A read-eval-print loop over the hornlog logic-programming database")]
pub struct Cli {
    /// Which parser to load the database up to.
    #[arg(long, value_enum, default_value_t = ParserMode::Prelude)]
    pub parser: ParserMode,

    /// Comma-separated list of files to consult before entering the loop.
    #[arg(long = "consult-paths", value_delimiter = ',', value_name = "PATHS")]
    pub consult_paths: Vec<PathBuf>,

    /// Emit a structured trace of every resolver step to stderr.
    #[arg(long)]
    pub trace: bool,

    /// Format for `--trace` output.
    #[arg(long = "log-format", value_enum, default_value_t = LogFormatArg::Logfmt)]
    pub log_format: LogFormatArg,

    /// Search depth bound. No bound by default.
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<u32>,
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn defaults_to_prelude_parser_and_logfmt_with_no_flags() {
        let cli = Cli::try_parse_from(["hornlog"]).expect("no flags should parse");
        assert_eq!(cli.parser, ParserMode::Prelude);
        assert_eq!(cli.log_format, LogFormatArg::Logfmt);
        assert!(cli.consult_paths.is_empty());
        assert!(!cli.trace);
    }

    #[test]
    fn consult_paths_splits_on_commas() {
        let cli = Cli::try_parse_from(["hornlog", "--consult-paths", "a.pl,b.pl"]).expect("should parse");
        assert_eq!(cli.consult_paths, vec![PathBuf::from("a.pl"), PathBuf::from("b.pl")]);
    }

    #[test]
    fn parser_flag_selects_bootstrap_mode() {
        let cli = Cli::try_parse_from(["hornlog", "--parser", "bootstrap"]).expect("should parse");
        assert_eq!(cli.parser, ParserMode::Bootstrap);
    }
}
