//! Rendering errors for the terminal.
//!
//! Errors with a source span get an `ariadne` snippet; everything else is a
//! single `error: <message>` line. Runtime errors read the same as in a
//! compiled program.

use std::ops::Range;

use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use ml_ir::CompilationError;

use crate::driver::DriverError;

/// Render `err` raised while processing `source`, read from `path`.
pub fn render(err: &DriverError, path: &str, source: &str, color: bool) -> String {
    match err {
        DriverError::Compilation(err) => render_compilation(err, path, source, color),
        DriverError::Runtime(err) => format!("Runtime error: {err}\n"),
        other => format!("error: {other}\n"),
    }
}

fn render_compilation(err: &CompilationError, path: &str, source: &str, color: bool) -> String {
    let Some(span) = err.span else {
        return plain(err, path);
    };
    let range = clamp(span.start as usize..span.end as usize, source.len());

    let config = Config::default()
        .with_color(color)
        .with_index_type(IndexType::Byte);
    let report = Report::build(ReportKind::Custom("error", Color::Red), path, range.start)
        .with_config(config)
        .with_message(&err.message)
        .with_label(Label::new((path, range)).with_message(&err.message))
        .finish();

    let mut out = Vec::new();
    if report.write((path, Source::from(source)), &mut out).is_err() {
        return plain(err, path);
    }
    // A custom kind ignores the config's colour switch, so the header line
    // is written here.
    let rendered = String::from_utf8_lossy(&out);
    let body = rendered.split_once('\n').map_or("", |(_, body)| body);
    format!(
        "{} {}\n{body}",
        "error:".fg(color.then_some(Color::Red)),
        err.message
    )
}

/// `error: path:line:column: message`, without a snippet.
fn plain(err: &CompilationError, path: &str) -> String {
    match err.location() {
        Some(location) => format!("error: {path}:{location}: {}\n", err.message),
        None => format!("error: {}\n", err.message),
    }
}

/// Keep a label inside the source; an empty span still marks one byte when
/// there is one to mark.
fn clamp(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.clamp(start, len);
    if start == end && end < len {
        start..end + 1
    } else {
        start..end
    }
}
