//! Table rendering for result sets

use shelfdb_engine::storage::{Cell, FIELD_NAMES};
use shelfdb_engine::Record;

/// Render records as an aligned text table with a header line
pub fn render_table(records: &[Record]) -> String {
    let rows: Vec<[String; 4]> = records
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.name.clone(),
                r.author.clone(),
                Cell::Float(r.cost).to_string(),
            ]
        })
        .collect();

    let mut widths = FIELD_NAMES.map(|name| name.chars().count());
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &FIELD_NAMES.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, values: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, width)| {
            let pad = width - value.chars().count();
            format!("{}{}", value, " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
