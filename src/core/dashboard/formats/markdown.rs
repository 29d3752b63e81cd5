//! Markdown dashboard renderer
//!
//! Renders every panel as a Markdown table. Charts are not drawn; the
//! report is meant for diffing, pasting into issues, or quick reading in a
//! terminal.

use super::{filter_lines, summary_line};
use crate::core::dashboard::{record_cells, Dashboard, DashboardRenderer, Panel, RECORD_HEADERS};
use crate::core::error::Result;
use std::fmt::Write;

/// Embedded Markdown dashboard template
const MARKDOWN_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/dashboard.md"
));

/// Markdown dashboard renderer
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new Markdown renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, dashboard: &Dashboard) -> String {
        let values = [
            ("title", dashboard.title.clone()),
            ("summary", summary_line(dashboard)),
            ("filters", Self::generate_filters(dashboard)),
            ("panels", Self::generate_panels(dashboard)),
            ("record_count", dashboard.records().len().to_string()),
            ("records", Self::generate_records(dashboard)),
        ];
        fill_template(MARKDOWN_TEMPLATE, &values)
    }

    fn generate_filters(dashboard: &Dashboard) -> String {
        let mut list = String::new();
        for (label, values) in filter_lines(&dashboard.selection) {
            let _ = writeln!(list, "- **{label}:** {values}");
        }
        list
    }

    fn generate_panels(dashboard: &Dashboard) -> String {
        let mut out = String::new();
        for panel in &dashboard.panels {
            Self::write_panel(&mut out, panel);
        }
        out
    }

    fn write_panel(out: &mut String, panel: &Panel) {
        let _ = writeln!(out, "### {}\n", panel.title);
        let _ = writeln!(out, "_Source: {}_\n", panel.source.label());

        match &panel.outcome {
            Err(e) => {
                let _ = writeln!(out, "> ⚠️ Unavailable: {e}\n");
            }
            Ok(table) if table.is_empty() => {
                out.push_str("_No data for the current filters._\n\n");
            }
            Ok(table) => {
                let headers: Vec<&str> = table.headers.iter().map(String::as_str).collect();
                write_table(out, &headers, table.rows.iter().map(Vec::as_slice));
                out.push('\n');
            }
        }
    }

    fn generate_records(dashboard: &Dashboard) -> String {
        let rows: Vec<[String; 6]> = dashboard.records().iter().map(record_cells).collect();
        let mut table = String::new();
        write_table(&mut table, &RECORD_HEADERS, rows.iter().map(|r| r.as_slice()));
        table
    }
}

/// Substitute `{{name}}` placeholders in one pass over `template`.
///
/// Inserted values are never scanned again, so dataset text that happens to
/// look like a placeholder is copied through verbatim. Unknown names are
/// left in place.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        let name = &after[..end];
        match values.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Escape characters that would break a table cell
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

fn write_table<'a, I>(out: &mut String, headers: &[&str], rows: I)
where
    I: Iterator<Item = &'a [String]>,
{
    let _ = writeln!(out, "| {} |", headers.join(" | "));
    let _ = writeln!(out, "|{}", "---|".repeat(headers.len()));
    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardRenderer for MarkdownRenderer {
    fn render(&self, dashboard: &Dashboard) -> Result<String> {
        Ok(self.render_template(dashboard))
    }
}
