//! Grouped statistics transform
//!
//! Groups the subset by a categorical field and computes box statistics of a
//! chosen metric per group: quartiles by linear interpolation, Tukey
//! whiskers at the furthest points inside the 1.5 IQR fences, and the
//! outlier points beyond them. Whiskers are clamped to the box edges so the
//! whisker/quartile ordering holds for every non-empty group.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chart::{versus_title, ChartData, ChartLayout, ChartSpec, ViewKind};
use crate::filter::FilteredView;
use crate::types::{GroupField, MetricField};

/// Box statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGroup {
    /// Display value of the grouping field
    pub name: String,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Points beyond the whisker fences
    pub outliers: Vec<f64>,
}

/// Payload of the grouped-statistics chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxChart {
    pub x_label: String,
    pub y_label: String,
    /// Groups in first-seen subset order
    pub groups: Vec<BoxGroup>,
}

/// Compute the grouped-statistics chart for a filtered subset
pub fn compute(
    subset: &FilteredView<'_>,
    group_field: GroupField,
    metric: MetricField,
) -> ChartSpec {
    let mut order: Vec<String> = Vec::new();
    let mut values: HashMap<String, Vec<f64>> = HashMap::new();
    for record in subset.iter() {
        let key = record.group_value(group_field);
        if !values.contains_key(&key) {
            order.push(key.clone());
        }
        values
            .entry(key)
            .or_default()
            .push(record.metric(metric) as f64);
    }

    let groups = order
        .into_iter()
        .map(|name| {
            let mut group_values = values.remove(&name).unwrap_or_default();
            group_values.sort_by(f64::total_cmp);
            summarize(name, &group_values)
        })
        .collect();

    ChartSpec {
        view: ViewKind::BoxPlot,
        title: versus_title(group_field.display_name(), metric.display_name()),
        layout: ChartLayout::default(),
        data: ChartData::GroupedBoxes(BoxChart {
            x_label: group_field.display_name().to_string(),
            y_label: metric.display_name().to_string(),
            groups,
        }),
    }
}

/// Quantile of a sorted slice by linear interpolation between closest ranks
fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = q * (n - 1) as f64;
            let base = pos.floor() as usize;
            let frac = pos - base as f64;
            if base + 1 < n {
                sorted[base] + frac * (sorted[base + 1] - sorted[base])
            } else {
                sorted[n - 1]
            }
        }
    }
}

fn summarize(name: String, sorted: &[f64]) -> BoxGroup {
    let q1 = quantile(sorted, 0.25);
    let median = quantile(sorted, 0.5);
    let q3 = quantile(sorted, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;

    // Furthest in-fence points, clamped so whiskers never cross the box
    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|v| *v >= low_fence)
        .unwrap_or(q1)
        .min(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|v| *v <= high_fence)
        .unwrap_or(q3)
        .max(q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    BoxGroup {
        name,
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    }
}
