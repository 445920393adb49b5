//! Binned sum transform
//!
//! Bins the chosen metric and sums record counts per bin. The bin count
//! target comes from Sturges' rule, snapped to a 1/2/5 decade width with
//! edges aligned to width multiples. Bins are half-open except the last,
//! which keeps a value landing exactly on the final edge inside the chart.

use serde::{Deserialize, Serialize};

use crate::chart::{
    versus_title, ChartData, ChartLayout, ChartSpec, ViewKind, HISTOGRAM_SERIES_COLOR,
};
use crate::filter::FilteredView;
use crate::types::MetricField;

/// One bin of the histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Payload of the binned-sum chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramChart {
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
}

impl HistogramChart {
    /// Sum of all bin counts
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Compute the binned-sum chart for a filtered subset
pub fn compute(subset: &FilteredView<'_>, metric: MetricField) -> ChartSpec {
    let values: Vec<f64> = subset.iter().map(|r| r.metric(metric) as f64).collect();

    let (bin_width, bins) = if values.is_empty() {
        (0.0, Vec::new())
    } else {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let target_bins = (values.len() as f64).log2().ceil() as usize + 1;
        let width = nice_width((max - min) / target_bins as f64);

        let first = (min / width).floor() * width;
        let bin_count = ((max - first) / width).floor() as usize + 1;

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                start: first + i as f64 * width,
                end: first + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();
        for value in &values {
            let index = (((value - first) / width).floor() as usize).min(bin_count - 1);
            bins[index].count += 1;
        }
        (width, bins)
    };

    ChartSpec {
        view: ViewKind::Histogram,
        title: versus_title(metric.display_name(), "count"),
        layout: ChartLayout::default(),
        data: ChartData::Bins(HistogramChart {
            x_label: metric.display_name().to_string(),
            y_label: "count".to_string(),
            color: HISTOGRAM_SERIES_COLOR.to_string(),
            bin_width,
            bins,
        }),
    }
}

/// Snap a raw width up to 1, 2 or 5 times a power of ten
fn nice_width(raw: f64) -> f64 {
    if raw <= 0.0 {
        return 1.0;
    }
    let base = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / base;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply, FilterPredicate};
    use crate::store::FlowStore;
    use crate::types::{FlowRecord, HourBucket};
    use chrono::NaiveDate;

    fn record(packets: u64) -> FlowRecord {
        FlowRecord::new(
            NaiveDate::from_ymd_opt(2020, 12, 4).unwrap(),
            HourBucket::H02,
            "10.0.0.1",
        )
        .with_packets(packets)
    }

    fn chart_of(spec: ChartSpec) -> HistogramChart {
        match spec.data {
            ChartData::Bins(chart) => chart,
            other => panic!("wrong payload: {other:?}"),
        }
    }

    #[test]
    fn test_nice_widths() {
        assert_eq!(nice_width(0.3), 0.5);
        assert_eq!(nice_width(1.0), 1.0);
        assert_eq!(nice_width(1.8), 2.0);
        assert_eq!(nice_width(4.2), 5.0);
        assert_eq!(nice_width(7.0), 10.0);
        assert_eq!(nice_width(130.0), 200.0);
        assert_eq!(nice_width(0.0), 1.0);
    }

    #[test]
    fn test_known_binning() {
        let store = FlowStore::new((1..=10).map(record).collect());
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Packets));

        // ten values 1..=10: Sturges targets 5 bins, raw width 1.8 snaps to 2
        assert_eq!(chart.bin_width, 2.0);
        assert_eq!(chart.bins[0].start, 0.0);
        let counts: Vec<u64> = chart.bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 2, 2, 2, 2, 1]);
        assert_eq!(chart.total(), 10);
    }

    #[test]
    fn test_edges_aligned_to_width() {
        let store = FlowStore::new(vec![record(37), record(91), record(405)]);
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Packets));

        for bin in &chart.bins {
            let multiple = bin.start / chart.bin_width;
            assert!((multiple - multiple.round()).abs() < 1e-9, "{bin:?}");
            assert!((bin.end - bin.start - chart.bin_width).abs() < 1e-9);
        }
        assert_eq!(chart.total(), 3);
    }

    #[test]
    fn test_counts_preserved_on_sample_store() {
        let store = FlowStore::sample();
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Bytes));

        assert_eq!(chart.total(), store.len() as u64);
        assert!(chart.bins.iter().any(|b| b.count > 0));
    }

    #[test]
    fn test_single_value_subset() {
        let store = FlowStore::new(vec![record(42), record(42)]);
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Packets));

        assert_eq!(chart.bin_width, 1.0);
        assert_eq!(chart.bins.len(), 1);
        assert_eq!(chart.bins[0].start, 42.0);
        assert_eq!(chart.bins[0].count, 2);
    }

    #[test]
    fn test_empty_subset() {
        let store = FlowStore::new(vec![]);
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let spec = compute(&view, MetricField::Communications);

        assert_eq!(spec.title, "communications vs. count");
        let chart = chart_of(spec);
        assert!(chart.bins.is_empty());
        assert_eq!(chart.bin_width, 0.0);
        assert_eq!(chart.y_label, "count");
        assert_eq!(chart.color, "rgb(51,34,136)");
    }
}
