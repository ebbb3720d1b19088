//! Plain-text table for the terminal.

use super::format::PercentCategory;
use super::table::{CellStyle, TableBody, COLUMNS};
use std::fmt::Write as _;

/// Renders the table with right-aligned numbers, centered dates and percents.
/// Negative percents get a trailing `▼`, positive or zero a `▲`.
/// `limit` caps the number of data rows (newest first).
pub fn render_table(table: &TableBody, limit: Option<usize>) -> String {
    let rows = match table {
        TableBody::Failure(message) => return format!("{}\n", message),
        TableBody::Empty => &[][..],
        TableBody::Rows(rows) => &rows[..limit.unwrap_or(rows.len()).min(rows.len())],
    };

    let grid: Vec<Vec<(String, CellStyle)>> = rows
        .iter()
        .map(|row| {
            row.cells()
                .iter()
                .map(|cell| {
                    let text = match cell.style {
                        CellStyle::Percent(Some(PercentCategory::Negative)) => format!("{} ▼", cell.text),
                        CellStyle::Percent(Some(PercentCategory::PositiveOrZero)) => format!("{} ▲", cell.text),
                        _ => cell.text.to_string(),
                    };
                    (text, cell.style)
                })
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.chars().count()).collect();
    for row in &grid {
        for (i, (text, _)) in row.iter().enumerate() {
            widths[i] = widths[i].max(text.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = COLUMNS
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:^w$}", c, w = *w))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in &grid {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|((text, style), w)| match style {
                CellStyle::Date | CellStyle::Percent(_) => format!("{:^w$}", text, w = *w),
                CellStyle::Plain | CellStyle::Headline => format!("{:>w$}", text, w = *w),
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" | ").trim_end());
    }

    out
}
