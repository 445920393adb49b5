//! Selector state and the selector-to-view dependency map

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::chart::ViewKind;
use crate::filter::{FilterSelectors, Selection};

/// One selector change from the control layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectorEvent {
    /// The date-range picker changed (either bound may be absent)
    DateRange {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// The label multi-select changed
    Labels(Selection<u8>),
    /// The working-hour multi-select changed
    WorkingHours(Selection<String>),
    /// The box chart's categorical axis changed
    BoxGroupBy(String),
    /// The x-metric selector changed
    XMetric(String),
    /// The y-metric selector changed
    YMetric(String),
}

impl SelectorEvent {
    /// Views whose output depends on this selector
    pub fn affected_views(&self) -> &'static [ViewKind] {
        match self {
            SelectorEvent::DateRange { .. }
            | SelectorEvent::Labels(_)
            | SelectorEvent::WorkingHours(_) => ViewKind::all(),
            SelectorEvent::BoxGroupBy(_) => &[ViewKind::BoxPlot],
            SelectorEvent::XMetric(_) => &[ViewKind::Scatter, ViewKind::Histogram],
            SelectorEvent::YMetric(_) => &[
                ViewKind::BoxPlot,
                ViewKind::Sunburst,
                ViewKind::Scatter,
                ViewKind::Polar,
            ],
        }
    }
}

/// Current raw selector values
///
/// Field selectors are kept as the raw strings the control layer sent, so an
/// unknown field name fails only the views that read it, when they read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorState {
    pub filters: FilterSelectors,
    pub box_group_by: String,
    pub x_metric: String,
    pub y_metric: String,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self {
            filters: FilterSelectors::default(),
            box_group_by: "k".to_string(),
            x_metric: "flows".to_string(),
            y_metric: "packets".to_string(),
        }
    }
}

impl SelectorState {
    /// Fold one selector change into the state
    pub fn apply_event(&mut self, event: &SelectorEvent) {
        match event {
            SelectorEvent::DateRange { start, end } => {
                self.filters.start_date = *start;
                self.filters.end_date = *end;
            }
            SelectorEvent::Labels(labels) => self.filters.labels = labels.clone(),
            SelectorEvent::WorkingHours(groups) => {
                self.filters.working_hours = groups.clone();
            }
            SelectorEvent::BoxGroupBy(field) => self.box_group_by = field.clone(),
            SelectorEvent::XMetric(field) => self.x_metric = field.clone(),
            SelectorEvent::YMetric(field) => self.y_metric = field.clone(),
        }
    }
}
