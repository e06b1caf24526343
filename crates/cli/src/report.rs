//! rustc-style rendering of diagnostics against their source text
//!
//! ```text
//! error: Expected field number, found ';'
//!  --> person.proto:2:17
//!   |
//! 2 |   string name = ;
//!   |                 ^ expected number literal
//! ```

use crate::Diagnostic;
use colored::Colorize;

const TAB_WIDTH: usize = 4;

/// Rendering of one diagnostic
pub struct Report<'a> {
    diagnostic: &'a Diagnostic,
    source: &'a str,
    filename: &'a str,
}

impl<'a> Report<'a> {
    pub fn new(diagnostic: &'a Diagnostic, source: &'a str) -> Self {
        Self {
            diagnostic,
            source,
            filename: "input",
        }
    }

    pub fn filename(mut self, filename: &'a str) -> Self {
        self.filename = filename;
        self
    }

    pub fn format(&self) -> String {
        let position = self.diagnostic.position;
        let mut out = format!(
            "{}: {}\n",
            "error".red().bold(),
            self.diagnostic.message.bold()
        );

        let gutter = " ".repeat(position.line.to_string().len());
        out.push_str(&format!(
            "{}{} {}:{}:{}\n",
            gutter,
            "-->".blue().bold(),
            self.filename,
            position.line,
            position.column
        ));

        let Some(line) = self.source.lines().nth(position.line.saturating_sub(1)) else {
            return out;
        };

        let pipe = "|".blue().bold();
        out.push_str(&format!("{} {}\n", gutter, pipe));
        out.push_str(&format!(
            "{} {} {}\n",
            position.line.to_string().blue().bold(),
            pipe,
            line.replace('\t', &" ".repeat(TAB_WIDTH))
        ));

        let (offset, width) = caret_span(line, position.column, position.len());
        let caret = format!("{}{}", " ".repeat(offset), "^".repeat(width));
        let label = annotation(self.diagnostic);
        out.push_str(&format!(
            "{} {} {} {}\n",
            gutter,
            pipe,
            caret.red().bold(),
            label.red().bold()
        ));

        out
    }
}

/// Render every diagnostic, separated by blank lines
pub fn render_all(diagnostics: &[Diagnostic], source: &str, filename: &str) -> String {
    diagnostics
        .iter()
        .map(|d| Report::new(d, source).filename(filename).format())
        .collect::<Vec<_>>()
        .join("\n")
}

fn annotation(diagnostic: &Diagnostic) -> String {
    if diagnostic.expected.is_empty() {
        return String::new();
    }
    let kinds: Vec<&str> = diagnostic.expected.iter().map(|k| k.describe()).collect();
    format!("expected {}", kinds.join(" or "))
}

/// Display offset and width of the caret under `line`, for a span starting
/// at 1-based character `column` and `len` bytes long. Tabs count as
/// `TAB_WIDTH` columns; the caret never runs past the end of the line.
fn caret_span(line: &str, column: usize, len: usize) -> (usize, usize) {
    let before = column.saturating_sub(1);
    let offset: usize = line
        .chars()
        .take(before)
        .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
        .sum();

    let remaining = line.chars().count().saturating_sub(before);
    let width = len.min(remaining).max(1);
    (offset, width)
}
