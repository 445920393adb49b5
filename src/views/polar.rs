//! Polar aggregation transform
//!
//! Plots the chosen metric at the angular position of each record's hour
//! bucket, one series per activity label. Series are ordered by ascending
//! label and use the same stable palette as the point-set view; points
//! within a series keep subset order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::{
    label_color, versus_title, ChartData, ChartLayout, ChartSpec, ViewKind, POLAR_BACKGROUND,
};
use crate::filter::FilteredView;
use crate::types::{ActivityLabel, MetricField};

/// One radial sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarPoint {
    /// Hour bucket display name at this angular position
    pub theta: String,
    pub angle_degrees: f64,
    pub r: u64,
}

/// All samples of one activity label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarSeries {
    pub label: ActivityLabel,
    pub color: String,
    pub points: Vec<PolarPoint>,
}

/// Payload of the polar-aggregation chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarChart {
    pub value_label: String,
    pub background: String,
    /// Series in ascending label order
    pub series: Vec<PolarSeries>,
}

/// Compute the polar-aggregation chart for a filtered subset
pub fn compute(subset: &FilteredView<'_>, metric: MetricField) -> ChartSpec {
    let mut by_label: BTreeMap<ActivityLabel, Vec<PolarPoint>> = BTreeMap::new();
    for record in subset.iter() {
        by_label
            .entry(record.label())
            .or_default()
            .push(PolarPoint {
                theta: record.hour.display_name().to_string(),
                angle_degrees: record.hour.angle_degrees(),
                r: record.metric(metric),
            });
    }

    let series = by_label
        .into_iter()
        .map(|(label, points)| PolarSeries {
            label,
            color: label_color(label).to_string(),
            points,
        })
        .collect();

    ChartSpec {
        view: ViewKind::Polar,
        title: versus_title(metric.display_name(), "time"),
        layout: ChartLayout::default(),
        data: ChartData::PolarSeries(PolarChart {
            value_label: metric.display_name().to_string(),
            background: POLAR_BACKGROUND.to_string(),
            series,
        }),
    }
}
