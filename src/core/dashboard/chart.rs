//! Chart specifications
//!
//! A [`ChartSpec`] names the fields of an aggregate row that go on each axis.
//! Rendering happens in the browser; [`ChartSpec::to_vega_lite`] only emits
//! the Vega-Lite document that `vega-embed` draws.

use serde_json::{json, Value};

/// Vega-Lite schema the emitted specs target
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Chart mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Vertical bars
    Bar,
    /// Connected line with points
    Line,
}

impl Mark {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
        }
    }
}

/// Vega-Lite measurement type of an encoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Unordered categories
    Nominal,
    /// Ordered categories (periods, years)
    Ordinal,
    /// Numbers
    Quantitative,
}

impl FieldType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Nominal => "nominal",
            Self::Ordinal => "ordinal",
            Self::Quantitative => "quantitative",
        }
    }
}

/// One encoded axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axis {
    /// Row field
    pub field: &'static str,
    /// Measurement type
    pub kind: FieldType,
    /// Axis title
    pub title: &'static str,
}

impl Axis {
    /// Create an axis
    #[must_use]
    pub const fn new(field: &'static str, kind: FieldType, title: &'static str) -> Self {
        Self { field, kind, title }
    }

    fn encode(&self, sort_ascending: bool) -> Value {
        let mut encoding = json!({
            "field": self.field,
            "type": self.kind.as_str(),
            "title": self.title,
        });
        // Keep ordinal axes in row order (rows already come sorted).
        if sort_ascending && self.kind != FieldType::Quantitative {
            encoding["sort"] = Value::Null;
        }
        encoding
    }
}

/// Which fields of an aggregate go where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    /// Mark type
    pub mark: Mark,
    /// Horizontal axis
    pub x: Axis,
    /// Vertical axis
    pub y: Axis,
    /// Optional nominal field for color (grouped series)
    pub color: Option<&'static str>,
    /// Fields shown on hover
    pub tooltip: Vec<&'static str>,
}

impl ChartSpec {
    /// Bar chart of `y` by `x`
    #[must_use]
    pub const fn bar(x: Axis, y: Axis) -> Self {
        Self {
            mark: Mark::Bar,
            x,
            y,
            color: None,
            tooltip: Vec::new(),
        }
    }

    /// Line chart of `y` over `x`
    #[must_use]
    pub const fn line(x: Axis, y: Axis) -> Self {
        Self {
            mark: Mark::Line,
            x,
            y,
            color: None,
            tooltip: Vec::new(),
        }
    }

    /// Split series by `field`
    #[must_use]
    pub const fn color(mut self, field: &'static str) -> Self {
        self.color = Some(field);
        self
    }

    /// Fields shown on hover
    #[must_use]
    pub fn tooltip(mut self, fields: &[&'static str]) -> Self {
        self.tooltip = fields.to_vec();
        self
    }

    /// Vega-Lite document for this chart over `values` (an array of rows).
    #[must_use]
    pub fn to_vega_lite(&self, title: &str, values: &Value) -> Value {
        let mark = match self.mark {
            Mark::Bar => json!({ "type": self.mark.as_str() }),
            Mark::Line => json!({ "type": self.mark.as_str(), "point": true }),
        };

        let mut encoding = json!({
            "x": self.x.encode(true),
            "y": self.y.encode(false),
        });
        if let Some(field) = self.color {
            encoding["color"] = json!({ "field": field, "type": "nominal" });
        }
        if !self.tooltip.is_empty() {
            encoding["tooltip"] = self
                .tooltip
                .iter()
                .map(|field| json!({ "field": field }))
                .collect();
        }

        json!({
            "$schema": VEGA_LITE_SCHEMA,
            "title": title,
            "width": "container",
            "data": { "values": values },
            "mark": mark,
            "encoding": encoding,
        })
    }
}
