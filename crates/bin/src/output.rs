//! Output formatting helpers for human-readable and JSON output.

use serde::Serialize;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length. The header line
/// is printed even when there are no rows.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

/// Lay out a table as lines: the header line followed by one line per row.
pub fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    // column width is the widest of the header and every cell
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let align = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .into_iter()
            .enumerate()
            .take(col_count)
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(align(headers.to_vec()));
    for row in rows {
        lines.push(align(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
