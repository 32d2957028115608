//! Error rendering using ariadne
//!
//! Errors carry byte spans but not the source text, so every function here
//! takes the source the expression was compiled from.

use std::io::Write;

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};

use crate::{Diagnostic, Error, Severity};

const SOURCE_ID: &str = "<expression>";

/// Render an error to stderr.
///
/// # Example
/// ```no_run
/// use tally::{Engine, EngineOptions, render_error};
///
/// let engine = Engine::new(EngineOptions::default());
/// let source = "max(1,";
/// if let Err(e) = engine.compile(source) {
///     render_error(&e, source);
/// }
/// ```
pub fn render_error(error: &Error, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer.
pub fn render_error_to(error: &Error, source: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String, with colors.
pub fn render_error_to_string(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Same as [`render_error_to_string`] without ANSI color codes.
pub fn render_error_to_string_no_color(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    render_diagnostic(source, &error.to_diagnostic(), writer, use_color)
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    // Spans past the end (e.g. an error at end of input) are clamped so the
    // label still points at the source.
    let clamp = |range: std::ops::Range<usize>| {
        let end = range.end.min(source.len());
        range.start.min(end)..end
    };
    let span = clamp(diag.span.0.clone());

    let mut report = Report::build(kind, (SOURCE_ID, span.clone()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new((SOURCE_ID, span))
            .with_message(&diag.message)
            .with_color(colors.next()),
    );

    for related in &diag.related {
        report = report.with_label(
            Label::new((SOURCE_ID, clamp(related.span.0.clone())))
                .with_message(&related.message)
                .with_color(colors.next()),
        );
    }

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bindings, Engine, EngineOptions};

    #[test]
    fn test_render_parse_error() {
        let engine = Engine::new(EngineOptions::default());
        let source = "(1 + 2";
        let err = engine.compile(source).unwrap_err();

        let output = render_error_to_string_no_color(&err, source);
        assert!(output.contains("Error"));
        assert!(output.contains("P002"));
        assert!(output.contains("(1 + 2"));
        assert!(output.contains("opened here"));
    }

    #[test]
    fn test_render_unknown_function() {
        let engine = Engine::new(EngineOptions::default());
        let source = "exec('ls')";
        let err = engine.compile(source).unwrap_err();

        let output = render_error_to_string_no_color(&err, source);
        assert!(output.contains("Unknown function `exec`"));
    }

    #[test]
    fn test_render_evaluation_error() {
        let engine = Engine::new(EngineOptions::default());
        let source = "10 / (x - 1)";
        let expr = engine.compile(source).unwrap();
        let err = expr.evaluate(&Bindings::new().with("x", 1)).unwrap_err();

        let output = render_error_to_string_no_color(&err, source);
        assert!(output.contains("E001"));
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_to_writer() {
        let engine = Engine::new(EngineOptions::default());
        let source = "1 +";
        let err = engine.compile(source).unwrap_err();

        let mut buf = Vec::new();
        render_error_to(&err, source, &mut buf).unwrap();
        assert!(!buf.is_empty());
    }
}
