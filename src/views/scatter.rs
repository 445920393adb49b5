//! Point-set transform
//!
//! One point per record at (x metric, y metric), marker size weighted by the
//! y metric in area mode, colored by activity label through the stable
//! palette. Each point carries the hover payload the renderer shows.

use serde::{Deserialize, Serialize};

use crate::chart::{label_color, versus_title, ChartData, ChartLayout, ChartSpec, ViewKind};
use crate::filter::FilteredView;
use crate::types::{ActivityLabel, MetricField};

/// Marker size of the largest point
pub const MAX_MARKER_SIZE: f64 = 20.0;

/// Marker symbol for every point
pub const MARKER_SYMBOL: &str = "pentagon";

/// Area-mode marker sizing metadata
///
/// A point's rendered area is its y value divided by `size_ref`, capped so
/// the largest point draws at `max_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSizing {
    pub mode: String,
    pub max_size: f64,
    pub size_ref: f64,
}

/// Hover payload of one point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointTooltip {
    pub source_address: String,
    pub label: ActivityLabel,
    pub y: u64,
    pub x: u64,
    pub description: String,
}

/// One plotted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: u64,
    pub y: u64,
    pub label: ActivityLabel,
    pub color: String,
    pub tooltip: PointTooltip,
}

/// Payload of the point-set chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterChart {
    pub x_label: String,
    pub y_label: String,
    pub symbol: String,
    pub sizing: MarkerSizing,
    /// Points in subset order
    pub points: Vec<ScatterPoint>,
}

/// Compute the point-set chart for a filtered subset
pub fn compute(subset: &FilteredView<'_>, x: MetricField, y: MetricField) -> ChartSpec {
    let points: Vec<ScatterPoint> = subset
        .iter()
        .map(|record| {
            let label = record.label();
            ScatterPoint {
                x: record.metric(x),
                y: record.metric(y),
                label,
                color: label_color(label).to_string(),
                tooltip: PointTooltip {
                    source_address: record.source_address.clone(),
                    label,
                    y: record.metric(y),
                    x: record.metric(x),
                    description: record.description().to_string(),
                },
            }
        })
        .collect();

    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0) as f64;
    let sizing = MarkerSizing {
        mode: "area".to_string(),
        max_size: MAX_MARKER_SIZE,
        size_ref: 2.0 * max_y / (MAX_MARKER_SIZE * MAX_MARKER_SIZE),
    };

    ChartSpec {
        view: ViewKind::Scatter,
        title: versus_title(x.display_name(), y.display_name()),
        layout: ChartLayout::default(),
        data: ChartData::Points(ScatterChart {
            x_label: x.display_name().to_string(),
            y_label: y.display_name().to_string(),
            symbol: MARKER_SYMBOL.to_string(),
            sizing,
            points,
        }),
    }
}
