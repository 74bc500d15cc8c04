//! Terminal output for the command-line front end.
//!
//! Operational messages go through `tracing`; this module only covers what is
//! meant for a person at a terminal: warnings raised before logging exists and
//! the optional end-of-run summary table.

use crate::file_organizer::PassReport;
use colored::*;

/// Prints an error message in red with an X mark.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a warning message in yellow with a warning symbol.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints a section header.
pub fn header(header: &str) {
    println!("\n{}", header.bold());
}

/// What a summary line shows; decides how it is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Rule,
    Header,
    Category,
    Moved,
    Unmatched,
    Failed,
}

/// One line of the summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub kind: RowKind,
    pub text: String,
}

/// Renders the per-category counts of a pass as table rows.
///
/// Kept separate from printing so the layout can be tested. Widths count
/// characters, matching how `{:<width$}` pads.
pub fn summary_rows(report: &PassReport) -> Vec<SummaryRow> {
    let width = report
        .by_category
        .keys()
        .map(|name| name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Unmatched".len());

    let plural = |n: usize| if n == 1 { "file" } else { "files" };
    let row = |kind: RowKind, text: String| SummaryRow { kind, text };
    let total = |kind: RowKind, label: &str, n: usize| {
        row(kind, format!("{label:<width$} | {n} {}", plural(n)))
    };
    let mut rows = Vec::with_capacity(report.by_category.len() + 6);

    rows.push(row(RowKind::Header, format!("{:<width$} | Files", "Category")));
    rows.push(row(RowKind::Rule, "-".repeat(width + 10)));
    for (category, count) in &report.by_category {
        rows.push(total(RowKind::Category, category.as_str(), *count));
    }
    rows.push(row(RowKind::Rule, "-".repeat(width + 10)));
    rows.push(total(RowKind::Moved, "Moved", report.moved));
    if report.unmatched > 0 {
        rows.push(total(RowKind::Unmatched, "Unmatched", report.unmatched));
    }
    if report.failed > 0 {
        rows.push(total(RowKind::Failed, "Failed", report.failed));
    }
    rows
}

/// Prints the summary table of a pass.
pub fn summary_table(report: &PassReport, dry_run: bool) {
    header(if dry_run { "SUMMARY (dry run)" } else { "SUMMARY" });
    for row in summary_rows(report) {
        match row.kind {
            RowKind::Header => println!("{}", row.text.bold()),
            RowKind::Moved => println!("{}", row.text.green().bold()),
            RowKind::Failed => println!("{}", row.text.red()),
            RowKind::Rule | RowKind::Category | RowKind::Unmatched => println!("{}", row.text),
        }
    }
}
