//! In-memory record store
//!
//! The [`FlowStore`] holds every flow record the process works with. It is
//! populated once at startup (from a JSON file or the bundled sample data)
//! and never mutated afterwards, so filter and view computations can share
//! it freely across threads without locking.
//!
//! The store also derives a [`SelectorCatalog`], the distinct values an
//! external UI needs to populate its filter controls.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{FlowScopeError, Result, ResultExt};
use crate::types::{ActivityLabel, FlowRecord, HourBucket, Subnet, WorkingHourGroup};

/// Selector token that lifts the working-hour restriction
pub const ALL_WORKING_HOURS: &str = "all";

/// Immutable table of flow records
#[derive(Debug, Clone, Default)]
pub struct FlowStore {
    records: Vec<FlowRecord>,
}

impl FlowStore {
    /// Create a store from a set of records
    pub fn new(records: Vec<FlowRecord>) -> Self {
        Self { records }
    }

    /// Load a store from a JSON array of records
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(FlowScopeError::from)
            .with_context(|| format!("Failed to open record file {}", path.display()))?;
        let records: Vec<FlowRecord> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| FlowScopeError::Serialization(e.to_string()))
            .with_context(|| format!("Failed to parse record file {}", path.display()))?;
        Ok(Self::new(records))
    }

    /// All records in insertion order
    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at the given index
    pub fn get(&self, index: usize) -> Option<&FlowRecord> {
        self.records.get(index)
    }

    /// Distinct selector values observed in this store
    pub fn catalog(&self) -> SelectorCatalog {
        let mut dates = BTreeSet::new();
        let mut labels = BTreeSet::new();
        let mut groups = BTreeSet::new();
        for record in &self.records {
            dates.insert(record.date);
            labels.insert(record.label());
            groups.insert(record.working_hour_group);
        }

        let mut working_hour_groups = vec![ALL_WORKING_HOURS.to_string()];
        working_hour_groups.extend(groups.into_iter().map(|g| g.as_str().to_string()));

        SelectorCatalog {
            dates: dates.into_iter().collect(),
            labels: labels.into_iter().collect(),
            working_hour_groups,
        }
    }

    /// Deterministic sample dataset covering two weeks of flows
    ///
    /// Cycles dates, hour buckets, subnets, risk categories and working-hour
    /// groups so that every label band and every grid cell of the
    /// cross-tabulation is populated. Useful for demos and tests.
    pub fn sample() -> Self {
        let base = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap_or_default();
        let byte_bands: [u64; 6] = [200, 900, 3_500, 12_000, 45_000, 120_000];

        let mut records = Vec::with_capacity(420);
        for i in 0..420u64 {
            let date = base + chrono::Duration::days((i % 14) as i64);
            let hour = HourBucket::all()[(i % 6) as usize];
            let subnet = (i % 5) as u8;
            let host = 1 + (i * 3) % 250;
            let groups = WorkingHourGroup::all();

            records.push(
                FlowRecord::new(date, hour, format!("192.168.{subnet}.{host}"))
                    .with_flows(1 + (i * 7) % 50)
                    .with_bytes(byte_bands[(i % 6) as usize] + (i * 37) % 400)
                    .with_packets(10 + (i * 13) % 900)
                    .with_flow_duration(30 + (i * 11) % 4_000)
                    .with_communications(1 + i % 9)
                    .with_country(i % 25)
                    .with_k(2 + (i % 6) as u8)
                    .with_working_hours(groups[(i % 3) as usize])
                    .with_subnet(Subnet(subnet)),
            );
        }
        Self::new(records)
    }
}

/// Distinct selector values observed in a store, for populating UI controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorCatalog {
    /// Distinct dates in ascending order
    pub dates: Vec<NaiveDate>,
    /// Distinct activity labels in ascending order
    pub labels: Vec<ActivityLabel>,
    /// Working-hour tokens with the "all" sentinel first
    pub working_hour_groups: Vec<String>,
}

impl SelectorCatalog {
    /// First and last observed date, if any records exist
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}
