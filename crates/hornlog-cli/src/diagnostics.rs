//! Error rendering, grounded on
//! `plotnik-lib::diagnostics::printer::DiagnosticsPrinter`'s builder,
//! simplified to the single-error-at-a-time shape the REPL needs: most of
//! `hornlog`'s error types (`ResolveError`, `CompileError`, most of
//! `BootstrapError`) carry no source span, so only `BootstrapError::
//! TrailingCharacters` ever gets the annotated-source treatment.

use std::ops::Range;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

/// Render `message` against `source`, underlining `span`, when both are
/// available; otherwise fall back to `message` verbatim.
pub fn render(message: &str, source: Option<&str>, span: Option<Range<usize>>) -> String {
    let (Some(source), Some(span)) = (source, span) else {
        return message.to_string();
    };
    let span = widen_empty_span(span, source.len());
    let snippet = Snippet::source(source)
        .line_start(1)
        .annotation(AnnotationKind::Primary.span(span).label(message));
    let report = Level::ERROR.primary_title(message).element(snippet);
    Renderer::plain().render(&[report]).to_string()
}

fn widen_empty_span(span: Range<usize>, limit: usize) -> Range<usize> {
    if span.start == span.end {
        span.start..(span.start + 1).min(limit)
    } else {
        span
    }
}

/// The byte span a `BootstrapError` carries, if any (only
/// `TrailingCharacters` has one — spec.md §7).
pub fn bootstrap_error_span(err: &hornlog_bootstrap::BootstrapError) -> Option<Range<usize>> {
    match err {
        hornlog_bootstrap::BootstrapError::TrailingCharacters { pos, excerpt } => {
            Some(*pos..(*pos + excerpt.len().max(1)))
        }
        _ => None,
    }
}
