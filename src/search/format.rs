//! Rendering of ranked schema matches.
//!
//! Produces the grouped table → column → description text handed back to
//! callers of the schema-search operation.

use super::RankedMatch;

/// Rendered output for an empty match sequence.
pub const NO_MATCHES_MESSAGE: &str = "no matching schema elements";

/// Renders ranked matches into a deterministic, human-readable block per
/// table.
///
/// Tables appear in the rank order of their first match; within a table,
/// matches keep their relative rank order. Column-level matches render as
/// indented `column: description` lines; table-level matches render their
/// description alone.
pub fn format_matches(matches: &[RankedMatch]) -> String {
    if matches.is_empty() {
        return NO_MATCHES_MESSAGE.to_string();
    }

    let mut table_order: Vec<&str> = Vec::new();
    for m in matches {
        if !table_order.contains(&m.element.table.as_str()) {
            table_order.push(&m.element.table);
        }
    }

    let mut lines: Vec<String> = Vec::new();
    for table in table_order {
        lines.push(format!("{table}:"));
        for m in matches.iter().filter(|m| m.element.table == table) {
            match &m.element.column {
                Some(column) => lines.push(format!("  {column}: {}", m.element.description)),
                None => lines.push(format!("  {}", m.element.description)),
            }
        }
    }

    lines.join("\n")
}
