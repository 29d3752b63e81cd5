//! Dashboard output formats
//!
//! HTML pages embed one Vega-Lite spec per panel; Markdown reports show the
//! panel tables only.

pub mod html;
pub mod markdown;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;

use super::{Dashboard, DashboardRenderer};
use crate::core::filter::Selection;
use std::fmt;
use std::str::FromStr;

/// Supported dashboard formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Markdown tables
    Markdown,
    /// Self-contained HTML page with interactive charts
    #[default]
    Html,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    /// Renderer for this format
    #[must_use]
    pub fn renderer(&self) -> Box<dyn DashboardRenderer> {
        match self {
            Self::Markdown => Box::new(MarkdownRenderer::new()),
            Self::Html => Box::new(HtmlRenderer::new()),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// `"a, b, c"`, or `"none"` for an empty list
fn join_or_none<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let joined = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

/// (label, values) pairs describing the active filters
pub(crate) fn filter_lines(selection: &Selection) -> [(&'static str, String); 3] {
    [
        ("Programs", join_or_none(&selection.programs)),
        ("Entry years", join_or_none(&selection.years)),
        ("Statuses", join_or_none(&selection.statuses)),
    ]
}

/// One line describing the dataset and filtered row counts
pub(crate) fn summary_line(dashboard: &Dashboard) -> String {
    format!(
        "{} of {} students shown. Dataset: {}.",
        dashboard.filtered.recognized, dashboard.dataset.recognized, dashboard.dataset
    )
}
