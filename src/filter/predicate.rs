//! Canonical filter predicates and their normalization
//!
//! The normalizer is the single place where selector shapes are dealt with.
//! Everything downstream of it works with [`FilterPredicate`] values only.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FlowScopeError, Result};
use crate::store::ALL_WORKING_HOURS;
use crate::types::{ActivityLabel, FlowRecord, WorkingHourGroup};

/// A selector value that may arrive as a single scalar or a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Selection<T> {
    /// View the selection as a slice, promoting a scalar to one element
    pub fn as_slice(&self) -> &[T] {
        match self {
            Selection::One(value) => std::slice::from_ref(value),
            Selection::Many(values) => values,
        }
    }
}

/// Raw filter selectors as they arrive from the control layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelectors {
    /// Start bound of the date selection, if any
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// End bound of the date selection, if any
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Selected activity labels (numeric form)
    pub labels: Selection<u8>,
    /// Selected working-hour tokens, possibly containing the "all" sentinel
    pub working_hours: Selection<String>,
}

impl Default for FilterSelectors {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            labels: Selection::Many(ActivityLabel::all().iter().map(|l| l.as_u8()).collect()),
            working_hours: Selection::One(ALL_WORKING_HOURS.to_string()),
        }
    }
}

/// Date component of a predicate
///
/// A single supplied bound means equality on that date, not an open-ended
/// range. Both bounds mean an inclusive range, which matches nothing when
/// the end precedes the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    Unrestricted,
    On(NaiveDate),
    Between { start: NaiveDate, end: NaiveDate },
}

impl DateFilter {
    /// Build the filter from optional start and end bounds
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> DateFilter {
        match (start, end) {
            (None, None) => DateFilter::Unrestricted,
            (Some(date), None) | (None, Some(date)) => DateFilter::On(date),
            (Some(start), Some(end)) => DateFilter::Between { start, end },
        }
    }

    /// Whether a date passes this filter
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::Unrestricted => true,
            DateFilter::On(only) => date == *only,
            DateFilter::Between { start, end } => *start <= date && date <= *end,
        }
    }
}

/// Working-hour component of a predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkingHourFilter {
    /// No restriction (the "all" sentinel was selected)
    All,
    /// Restrict to the given groups; an empty set matches nothing
    Only(BTreeSet<WorkingHourGroup>),
}

impl WorkingHourFilter {
    /// Whether a group passes this filter
    pub fn matches(&self, group: WorkingHourGroup) -> bool {
        match self {
            WorkingHourFilter::All => true,
            WorkingHourFilter::Only(groups) => groups.contains(&group),
        }
    }
}

/// Canonical immutable filter predicate
///
/// Built fresh from [`FilterSelectors`] on every selector change and passed
/// by reference into the filter engine. Value equality makes predicates
/// comparable across recomputations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub dates: DateFilter,
    pub labels: BTreeSet<ActivityLabel>,
    pub working_hours: WorkingHourFilter,
}

impl FilterPredicate {
    /// Normalize raw selectors into a canonical predicate
    ///
    /// Fails with [`FlowScopeError::InvalidSelection`] when the label
    /// selection is empty or contains an unknown value, or when a
    /// working-hour token is not a known group. An explicitly deselected
    /// label set is a user error distinct from a query that happens to
    /// match nothing.
    pub fn normalize(selectors: &FilterSelectors) -> Result<FilterPredicate> {
        let raw_labels = selectors.labels.as_slice();
        if raw_labels.is_empty() {
            return Err(FlowScopeError::InvalidSelection(
                "empty label selection".to_string(),
            ));
        }
        let mut labels = BTreeSet::new();
        for &value in raw_labels {
            let label = ActivityLabel::try_from(value)
                .map_err(FlowScopeError::InvalidSelection)?;
            labels.insert(label);
        }

        let raw_groups = selectors.working_hours.as_slice();
        let working_hours = if raw_groups.iter().any(|g| g == ALL_WORKING_HOURS) {
            WorkingHourFilter::All
        } else {
            let mut groups = BTreeSet::new();
            for token in raw_groups {
                let group = WorkingHourGroup::parse(token).ok_or_else(|| {
                    FlowScopeError::InvalidSelection(format!(
                        "unknown working hour group `{token}`"
                    ))
                })?;
                groups.insert(group);
            }
            WorkingHourFilter::Only(groups)
        };

        Ok(FilterPredicate {
            dates: DateFilter::from_bounds(selectors.start_date, selectors.end_date),
            labels,
            working_hours,
        })
    }

    /// Predicate that lets every record through
    pub fn unrestricted() -> FilterPredicate {
        FilterPredicate {
            dates: DateFilter::Unrestricted,
            labels: ActivityLabel::all().iter().copied().collect(),
            working_hours: WorkingHourFilter::All,
        }
    }

    /// Whether a record passes all predicate components
    pub fn matches(&self, record: &FlowRecord) -> bool {
        self.dates.matches(record.date)
            && self.labels.contains(&record.label())
            && self.working_hours.matches(record.working_hour_group)
    }
}
