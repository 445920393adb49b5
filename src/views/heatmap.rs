//! Cross-tabulation transform
//!
//! Sums record counts over the full working-hour-group by day-group grid.
//! The grid shape is fixed by the enums, so cells a filter empties out are
//! present with a zero, never absent.

use serde::{Deserialize, Serialize};

use crate::chart::{versus_title, ChartData, ChartLayout, ChartSpec, ViewKind, CONTINUOUS_SCALE};
use crate::filter::FilteredView;
use crate::types::{DayGroup, GroupField, WorkingHourGroup};

/// Payload of the cross-tabulation chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapChart {
    pub x_label: String,
    pub y_label: String,
    pub color_scale: String,
    /// Working-hour tokens in declaration order
    pub x_categories: Vec<String>,
    /// Day-group tokens in declaration order
    pub y_categories: Vec<String>,
    /// Summed counts, indexed `cells[y][x]`
    pub cells: Vec<Vec<u64>>,
}

impl HeatmapChart {
    /// Sum over the whole grid
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// Cell value for a specific pair
    pub fn cell(&self, group: WorkingHourGroup, day: DayGroup) -> u64 {
        self.cells[day as usize][group as usize]
    }
}

/// Compute the cross-tabulation chart for a filtered subset
pub fn compute(subset: &FilteredView<'_>) -> ChartSpec {
    let mut cells = vec![vec![0u64; WorkingHourGroup::all().len()]; DayGroup::all().len()];
    for record in subset.iter() {
        cells[record.day_group as usize][record.working_hour_group as usize] += record.count();
    }

    ChartSpec {
        view: ViewKind::Heatmap,
        title: versus_title(
            GroupField::WorkingHourGroup.display_name(),
            GroupField::DayGroup.display_name(),
        ),
        layout: ChartLayout::default(),
        data: ChartData::Grid(HeatmapChart {
            x_label: GroupField::WorkingHourGroup.display_name().to_string(),
            y_label: GroupField::DayGroup.display_name().to_string(),
            color_scale: CONTINUOUS_SCALE.to_string(),
            x_categories: WorkingHourGroup::all().iter().map(|g| g.to_string()).collect(),
            y_categories: DayGroup::all().iter().map(|d| d.to_string()).collect(),
            cells,
        }),
    }
}
