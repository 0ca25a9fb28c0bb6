//! Error reporting in cargo-style format.
//!
//! Separate from the core so the extractor can be used as a library.

use std::io::Write;

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::errors::{ExtractError, Report, ReportLocation};

/// Print an extraction error with its location, source snippet and notes.
///
/// ```text
/// error[parse-failure]: unknown command 'call'
///   --> templates/app.soy:3:3
///    |
///  3 |   {call .other /}
///    |   ^
/// ```
pub fn print_error<W: Write>(err: &ExtractError, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}{}",
        format!("error[{}]", err.kind()).bold().red(),
        format!(": {}", err.message()).bold()
    );

    let location = err.location();
    let gutter = gutter_width(&location);

    match location {
        ReportLocation::Source {
            file,
            line,
            col,
            source_line,
        } => {
            let _ = writeln!(writer, "{:>gutter$}{} {}:{}:{}", "", "-->".blue(), file, line, col);
            print_snippet(writer, gutter, line, col, source_line);
        }
        ReportLocation::Line { file, line } => {
            let _ = writeln!(writer, "{:>gutter$}{} {}:{}", "", "-->".blue(), file, line);
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "{:>gutter$}{} {}", "", "-->".blue(), path);
        }
    }

    if let Some(details) = err.details() {
        let _ = writeln!(writer, "{:>gutter$} {} {} {}", "", "=".blue(), "note:".bold(), details);
    }
    if let Some(hint) = err.hint() {
        let _ = writeln!(
            writer,
            "{:>gutter$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint
        );
    }
}

fn print_snippet<W: Write>(writer: &mut W, gutter: usize, line: usize, col: usize, source_line: &str) {
    let _ = writeln!(writer, "{:>gutter$} {}", "", "|".blue());
    let _ = writeln!(
        writer,
        "{:>gutter$} {} {}",
        line.to_string().blue(),
        "|".blue(),
        source_line
    );

    // col is 1-based and counted in characters
    let prefix: String = source_line.chars().take(col.saturating_sub(1)).collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>gutter$} {} {:>caret_padding$}{}",
        "",
        "|".blue(),
        "",
        "^".red()
    );
}

/// Width of the line-number gutter; at least one column so the arrow is
/// indented like cargo's.
fn gutter_width(location: &ReportLocation<'_>) -> usize {
    match location {
        ReportLocation::Source { line, .. } => line.to_string().len() + 1,
        ReportLocation::Line { .. } | ReportLocation::File { .. } => 1,
    }
}
