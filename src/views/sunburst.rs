//! Hierarchical count transform
//!
//! Builds the fixed three-level hierarchy label -> day group -> working-hour
//! group over the subset. Node size is the record count under the node, node
//! color value is the mean of the chosen metric among its records, and every
//! node carries its share of the parent count for percent-of-parent display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chart::{ChartData, ChartLayout, ChartSpec, ViewKind, CONTINUOUS_SCALE};
use crate::filter::FilteredView;
use crate::types::{ActivityLabel, DayGroup, MetricField, WorkingHourGroup};

/// One ring segment of the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstNode {
    /// Path-style identifier, unique within the chart ("3/weekend/non_working")
    pub id: String,
    /// Identifier of the parent segment, absent on the label ring
    pub parent: Option<String>,
    /// Display value of the path element this segment represents
    pub name: String,
    /// Records under this segment
    pub count: u64,
    /// Mean of the chosen metric over those records
    pub mean_value: f64,
    /// This segment's share of its parent's count
    pub fraction_of_parent: f64,
}

/// Payload of the hierarchical-count chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstChart {
    /// Display name of the metric coloring the segments
    pub value_label: String,
    pub color_scale: String,
    /// Total records in the subset (the implicit root)
    pub total: u64,
    /// Segments listed ring by ring, labels first
    pub nodes: Vec<SunburstNode>,
}

/// Compute the hierarchical-count chart for a filtered subset
pub fn compute(subset: &FilteredView<'_>, metric: MetricField) -> ChartSpec {
    type Leaf = (ActivityLabel, DayGroup, WorkingHourGroup);
    let mut leaves: BTreeMap<Leaf, (u64, u64)> = BTreeMap::new();
    for record in subset.iter() {
        let entry = leaves
            .entry((record.label(), record.day_group, record.working_hour_group))
            .or_insert((0, 0));
        entry.0 += record.count();
        entry.1 += record.metric(metric);
    }

    let mut labels: BTreeMap<ActivityLabel, (u64, u64)> = BTreeMap::new();
    let mut pairs: BTreeMap<(ActivityLabel, DayGroup), (u64, u64)> = BTreeMap::new();
    let mut total = 0u64;
    for (&(label, day, _), &(count, sum)) in &leaves {
        total += count;
        let l = labels.entry(label).or_insert((0, 0));
        l.0 += count;
        l.1 += sum;
        let p = pairs.entry((label, day)).or_insert((0, 0));
        p.0 += count;
        p.1 += sum;
    }

    let mut nodes = Vec::with_capacity(labels.len() + pairs.len() + leaves.len());
    for (&label, &(count, sum)) in &labels {
        nodes.push(SunburstNode {
            id: label.to_string(),
            parent: None,
            name: label.to_string(),
            count,
            mean_value: sum as f64 / count as f64,
            fraction_of_parent: count as f64 / total as f64,
        });
    }
    for (&(label, day), &(count, sum)) in &pairs {
        let parent_count = labels.get(&label).map(|l| l.0).unwrap_or(count);
        nodes.push(SunburstNode {
            id: format!("{label}/{day}"),
            parent: Some(label.to_string()),
            name: day.to_string(),
            count,
            mean_value: sum as f64 / count as f64,
            fraction_of_parent: count as f64 / parent_count as f64,
        });
    }
    for (&(label, day, group), &(count, sum)) in &leaves {
        let parent_count = pairs.get(&(label, day)).map(|p| p.0).unwrap_or(count);
        nodes.push(SunburstNode {
            id: format!("{label}/{day}/{group}"),
            parent: Some(format!("{label}/{day}")),
            name: group.to_string(),
            count,
            mean_value: sum as f64 / count as f64,
            fraction_of_parent: count as f64 / parent_count as f64,
        });
    }

    ChartSpec {
        view: ViewKind::Sunburst,
        title: metric.display_name().to_string(),
        layout: ChartLayout::default(),
        data: ChartData::Hierarchy(SunburstChart {
            value_label: metric.display_name().to_string(),
            color_scale: CONTINUOUS_SCALE.to_string(),
            total,
            nodes,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply, FilterPredicate};
    use crate::store::FlowStore;
    use crate::types::{FlowRecord, HourBucket};
    use chrono::NaiveDate;

    fn record(day: u32, bytes: u64, group: WorkingHourGroup, packets: u64) -> FlowRecord {
        FlowRecord::new(
            NaiveDate::from_ymd_opt(2020, 12, day).unwrap(),
            HourBucket::H10,
            "10.0.0.1",
        )
        .with_bytes(bytes)
        .with_working_hours(group)
        .with_packets(packets)
    }

    fn chart_of(spec: ChartSpec) -> SunburstChart {
        match spec.data {
            ChartData::Hierarchy(chart) => chart,
            other => panic!("wrong payload: {other:?}"),
        }
    }

    #[test]
    fn test_three_ring_hierarchy() {
        // 2020-12-05 is a Saturday, 2020-12-07 a Monday
        let store = FlowStore::new(vec![
            record(5, 500, WorkingHourGroup::NonWorking, 10),
            record(5, 500, WorkingHourGroup::PrimaryWorking, 30),
            record(7, 500, WorkingHourGroup::NonWorking, 50),
            record(7, 90_000, WorkingHourGroup::NonWorking, 70),
        ]);
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Packets));

        assert_eq!(chart.total, 4);

        let label0 = chart.nodes.iter().find(|n| n.id == "0").unwrap();
        assert_eq!(label0.count, 3);
        assert_eq!(label0.parent, None);
        assert!((label0.fraction_of_parent - 0.75).abs() < 1e-9);
        assert!((label0.mean_value - 30.0).abs() < 1e-9);

        let weekend = chart.nodes.iter().find(|n| n.id == "0/weekend").unwrap();
        assert_eq!(weekend.count, 2);
        assert_eq!(weekend.parent.as_deref(), Some("0"));
        assert!((weekend.fraction_of_parent - 2.0 / 3.0).abs() < 1e-9);

        let leaf = chart
            .nodes
            .iter()
            .find(|n| n.id == "0/weekend/non_working")
            .unwrap();
        assert_eq!(leaf.count, 1);
        assert_eq!(leaf.parent.as_deref(), Some("0/weekend"));
        assert!((leaf.fraction_of_parent - 0.5).abs() < 1e-9);
        assert!((leaf.mean_value - 10.0).abs() < 1e-9);

        let label4 = chart.nodes.iter().find(|n| n.id == "4").unwrap();
        assert_eq!(label4.count, 1);
        assert!((label4.mean_value - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_children_fractions_sum_to_one() {
        let store = FlowStore::sample();
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Flows));

        let label_sum: f64 = chart
            .nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.fraction_of_parent)
            .sum();
        assert!((label_sum - 1.0).abs() < 1e-9);

        for parent in chart.nodes.iter().filter(|n| n.parent.is_none()) {
            let child_sum: f64 = chart
                .nodes
                .iter()
                .filter(|n| n.parent.as_deref() == Some(parent.id.as_str()))
                .map(|n| n.fraction_of_parent)
                .sum();
            assert!((child_sum - 1.0).abs() < 1e-9, "children of {}", parent.id);
        }
    }

    #[test]
    fn test_label_ring_is_ascending() {
        let store = FlowStore::sample();
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Bytes));

        let ring: Vec<_> = chart
            .nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.name.clone())
            .collect();
        assert_eq!(ring, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_empty_subset() {
        let store = FlowStore::new(vec![]);
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let chart = chart_of(compute(&view, MetricField::Packets));

        assert_eq!(chart.total, 0);
        assert!(chart.nodes.is_empty());
        assert_eq!(chart.color_scale, "YlGnBu");
    }

    #[test]
    fn test_title_is_bare_metric() {
        let store = FlowStore::new(vec![]);
        let view = apply(&FilterPredicate::unrestricted(), &store);
        let spec = compute(&view, MetricField::FlowDuration);
        assert_eq!(spec.title, "flow duration");
    }
}
