//! Renderer-agnostic chart specifications
//!
//! Every view transform produces a [`ChartSpec`]: a self-contained, immutable
//! description of one chart that an external renderer can consume as JSON.
//! The presentation defaults (backgrounds, title and axis colors, palettes)
//! live here so all views style consistently.
//!
//! # Color Stability
//!
//! Activity labels map to palette entries by label value, not by which
//! labels happen to survive the current filter. Label 3 is the same color in
//! every chart of every recomputation.

use serde::{Deserialize, Serialize};

use crate::error::{FlowScopeError, Result};
use crate::types::ActivityLabel;
use crate::views::box_plot::BoxChart;
use crate::views::heatmap::HeatmapChart;
use crate::views::histogram::HistogramChart;
use crate::views::polar::PolarChart;
use crate::views::scatter::ScatterChart;
use crate::views::sunburst::SunburstChart;

/// Fully transparent background used for paper and plot areas
pub const TRANSPARENT: &str = "rgba(0,0,0,0)";

/// Chart title color
pub const TITLE_COLOR: &str = "#408ec6";

/// Axis title color
pub const AXIS_LABEL_COLOR: &str = "#BBBBBB";

/// Background of the polar plotting area
pub const POLAR_BACKGROUND: &str = "rgb(17, 17, 17)";

/// Continuous color scale for value-colored charts
pub const CONTINUOUS_SCALE: &str = "YlGnBu";

/// Series color of the histogram bars
pub const HISTOGRAM_SERIES_COLOR: &str = "rgb(51,34,136)";

/// Qualitative palette for categorical series (colorblind-safe)
pub const LABEL_PALETTE: [&str; 11] = [
    "rgb(136,204,238)",
    "rgb(204,102,119)",
    "rgb(221,204,119)",
    "rgb(17,119,51)",
    "rgb(51,34,136)",
    "rgb(170,68,153)",
    "rgb(68,170,153)",
    "rgb(153,153,51)",
    "rgb(136,34,85)",
    "rgb(102,17,0)",
    "rgb(102,153,204)",
];

/// Stable palette color for an activity label
pub fn label_color(label: ActivityLabel) -> &'static str {
    LABEL_PALETTE[label.as_u8() as usize]
}

/// "x vs. y" chart title
pub fn versus_title(x: &str, y: &str) -> String {
    format!("{x} vs. {y}")
}

/// The six views the dispatcher can recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[serde(rename = "box")]
    BoxPlot,
    Sunburst,
    Scatter,
    Heatmap,
    Polar,
    Histogram,
}

impl ViewKind {
    /// Get all views in declaration order
    pub fn all() -> &'static [ViewKind] {
        &[
            ViewKind::BoxPlot,
            ViewKind::Sunburst,
            ViewKind::Scatter,
            ViewKind::Heatmap,
            ViewKind::Polar,
            ViewKind::Histogram,
        ]
    }

    /// Short name used in messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKind::BoxPlot => "box",
            ViewKind::Sunburst => "sunburst",
            ViewKind::Scatter => "scatter",
            ViewKind::Heatmap => "heatmap",
            ViewKind::Polar => "polar",
            ViewKind::Histogram => "histogram",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation defaults shared by every chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub paper_background: String,
    pub plot_background: String,
    pub title_color: String,
    pub axis_label_color: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            paper_background: TRANSPARENT.to_string(),
            plot_background: TRANSPARENT.to_string(),
            title_color: TITLE_COLOR.to_string(),
            axis_label_color: AXIS_LABEL_COLOR.to_string(),
        }
    }
}

/// View-specific chart payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    GroupedBoxes(BoxChart),
    Hierarchy(SunburstChart),
    Points(ScatterChart),
    Grid(HeatmapChart),
    PolarSeries(PolarChart),
    Bins(HistogramChart),
}

/// Self-contained description of one rendered chart
///
/// Immutable once returned by a view transform. Serializes to the JSON an
/// external renderer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub view: ViewKind,
    pub title: String,
    pub layout: ChartLayout,
    pub data: ChartData,
}

impl ChartSpec {
    /// Serialize this specification for an external renderer
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| FlowScopeError::Serialization(e.to_string()))
    }
}
