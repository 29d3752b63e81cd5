//! HTML dashboard renderer
//!
//! Produces a single page: summary, filters, one card per panel with a
//! Vega-Lite chart and its data table, then the raw student rows. Charts are
//! drawn client-side by `vega-embed`; the page needs no server.

use super::{filter_lines, summary_line};
use crate::core::dashboard::{record_cells, Dashboard, DashboardRenderer, RECORD_HEADERS};
use crate::core::error::Result;
use askama::Template;

/// Page context for `templates/dashboard.html`
#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage<'a> {
    title: &'a str,
    summary: String,
    filters: [(&'static str, String); 3],
    panels: Vec<PanelView<'a>>,
    headers: &'a [&'a str],
    records: Vec<[String; 6]>,
    version: &'static str,
}

/// One panel card
struct PanelView<'a> {
    id: &'a str,
    title: &'a str,
    source: &'a str,
    /// Vega-Lite JSON, safe to inline in a `<script>` element
    spec: Option<String>,
    error: Option<String>,
    headers: &'a [String],
    rows: &'a [Vec<String>],
}

/// Serialize a chart spec for inlining. `</` is escaped so cell values can
/// never close the surrounding script element.
fn inline_json(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// HTML dashboard renderer with interactive charts
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Create a new HTML renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn page<'a>(dashboard: &'a Dashboard) -> Result<DashboardPage<'a>> {
        let panels = dashboard
            .panels
            .iter()
            .map(|panel| {
                let spec = panel.vega_lite().as_ref().map(inline_json).transpose()?;
                let (headers, rows) = match panel.table() {
                    Some(table) => (table.headers.as_slice(), table.rows.as_slice()),
                    None => (Default::default(), Default::default()),
                };
                Ok(PanelView {
                    id: panel.id,
                    title: panel.title,
                    source: panel.source.label(),
                    spec,
                    error: panel.error().map(ToString::to_string),
                    headers,
                    rows,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(DashboardPage {
            title: &dashboard.title,
            summary: summary_line(dashboard),
            filters: filter_lines(&dashboard.selection),
            panels,
            headers: &RECORD_HEADERS,
            records: dashboard.records().iter().map(record_cells).collect(),
            version: crate::shared::get_version(),
        })
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardRenderer for HtmlRenderer {
    fn render(&self, dashboard: &Dashboard) -> Result<String> {
        Ok(Self::page(dashboard)?.render()?)
    }
}
