//! Core data types for flowscope
//!
//! This module contains the fundamental data structures used throughout
//! the crate for representing flow records and their categorical fields.
//!
//! # Main Types
//!
//! - [`FlowRecord`] - One observed network flow with its metrics and categories
//! - [`ActivityLabel`] - Five ordered activity/risk levels derived from byte volume
//! - [`HourBucket`] - The fixed set of time-of-day buckets records fall into
//! - [`MetricField`] / [`GroupField`] - Field selectors the views accept
//!
//! # Activity Labels
//!
//! A record's label is a pure function of its `bytes` value: the byte bands
//! in [`LABEL_BYTE_BOUNDS`] map to labels 0 through 3 (upper bound inclusive)
//! and everything above the last band is label 4. The human description is
//! derived 1:1 from the label. Neither can be set independently.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper byte-volume bound (inclusive) for activity labels 0 through 3.
/// Byte volumes above the last bound carry the highest label.
pub const LABEL_BYTE_BOUNDS: [u64; 4] = [1_000, 5_000, 30_000, 80_000];

/// Time-of-day bucket a flow record is assigned to
///
/// Records are observed at one of six fixed wall-clock instants. The bucket
/// also fixes the angular position used by the polar aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HourBucket {
    #[serde(rename = "02:00:00")]
    H02,
    #[serde(rename = "06:00:00")]
    H06,
    #[serde(rename = "10:00:00")]
    H10,
    #[serde(rename = "14:00:00")]
    H14,
    #[serde(rename = "18:00:00")]
    H18,
    #[serde(rename = "22:00:00")]
    H22,
}

impl HourBucket {
    /// Get all hour buckets in chronological order
    pub fn all() -> &'static [HourBucket] {
        &[
            HourBucket::H02,
            HourBucket::H06,
            HourBucket::H10,
            HourBucket::H14,
            HourBucket::H18,
            HourBucket::H22,
        ]
    }

    /// Get display name for this bucket ("02:00:00", "06:00:00", ...)
    pub fn display_name(&self) -> &'static str {
        match self {
            HourBucket::H02 => "02:00:00",
            HourBucket::H06 => "06:00:00",
            HourBucket::H10 => "10:00:00",
            HourBucket::H14 => "14:00:00",
            HourBucket::H18 => "18:00:00",
            HourBucket::H22 => "22:00:00",
        }
    }

    /// Position of this bucket in chronological order (0-5)
    pub fn index(&self) -> usize {
        match self {
            HourBucket::H02 => 0,
            HourBucket::H06 => 1,
            HourBucket::H10 => 2,
            HourBucket::H14 => 3,
            HourBucket::H18 => 4,
            HourBucket::H22 => 5,
        }
    }

    /// Angular position for polar charts, with the six buckets spread
    /// evenly over the full circle
    pub fn angle_degrees(&self) -> f64 {
        self.index() as f64 * 60.0
    }

    /// Parse a display name back into a bucket
    pub fn parse(s: &str) -> Option<HourBucket> {
        HourBucket::all()
            .iter()
            .copied()
            .find(|h| h.display_name() == s)
    }
}

impl std::fmt::Display for HourBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Working-hour classification of a record's time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingHourGroup {
    NonWorking,
    PrimaryWorking,
    SecondaryWorking,
}

impl WorkingHourGroup {
    /// Get all working-hour groups in declaration order
    pub fn all() -> &'static [WorkingHourGroup] {
        &[
            WorkingHourGroup::NonWorking,
            WorkingHourGroup::PrimaryWorking,
            WorkingHourGroup::SecondaryWorking,
        ]
    }

    /// The selector token for this group ("non_working", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkingHourGroup::NonWorking => "non_working",
            WorkingHourGroup::PrimaryWorking => "primary_working",
            WorkingHourGroup::SecondaryWorking => "secondary_working",
        }
    }

    /// Parse a selector token back into a group
    pub fn parse(s: &str) -> Option<WorkingHourGroup> {
        WorkingHourGroup::all().iter().copied().find(|g| g.as_str() == s)
    }
}

impl std::fmt::Display for WorkingHourGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weekday/weekend classification of a record's date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayGroup {
    Weekday,
    Weekend,
}

impl DayGroup {
    /// Get all day groups in declaration order
    pub fn all() -> &'static [DayGroup] {
        &[DayGroup::Weekday, DayGroup::Weekend]
    }

    /// The selector token for this group
    pub fn as_str(&self) -> &'static str {
        match self {
            DayGroup::Weekday => "weekday",
            DayGroup::Weekend => "weekend",
        }
    }

    /// Classify a calendar date
    pub fn from_date(date: NaiveDate) -> DayGroup {
        use chrono::Datelike;
        match date.weekday().number_from_monday() {
            6 | 7 => DayGroup::Weekend,
            _ => DayGroup::Weekday,
        }
    }
}

impl std::fmt::Display for DayGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Activity/risk label derived from a record's byte volume
///
/// Ordered from lowest to highest activity. The numeric form (0-4) is what
/// selectors and chart legends use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ActivityLabel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ActivityLabel {
    /// Get all labels in ascending order
    pub fn all() -> &'static [ActivityLabel] {
        &[
            ActivityLabel::VeryLow,
            ActivityLabel::Low,
            ActivityLabel::Medium,
            ActivityLabel::High,
            ActivityLabel::VeryHigh,
        ]
    }

    /// Derive the label for a byte volume
    pub fn from_bytes(bytes: u64) -> ActivityLabel {
        for (i, bound) in LABEL_BYTE_BOUNDS.iter().enumerate() {
            if bytes <= *bound {
                return ActivityLabel::all()[i];
            }
        }
        ActivityLabel::VeryHigh
    }

    /// Numeric form of the label (0-4)
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    /// Human description, derived 1:1 from the label
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLabel::VeryLow => "very low activity and risk",
            ActivityLabel::Low => "low activity and risk",
            ActivityLabel::Medium => "medium activity and risk",
            ActivityLabel::High => "high activity and risk",
            ActivityLabel::VeryHigh => "very high activity and risk",
        }
    }
}

impl From<ActivityLabel> for u8 {
    fn from(label: ActivityLabel) -> u8 {
        label.as_u8()
    }
}

impl TryFrom<u8> for ActivityLabel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        ActivityLabel::all()
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("activity label out of range: {value}"))
    }
}

impl std::fmt::Display for ActivityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Subnet a record's source address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subnet(pub u8);

impl std::fmt::Display for Subnet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric metric fields a view can plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    #[default]
    Flows,
    Bytes,
    Packets,
    FlowDuration,
    Communications,
    Country,
}

impl MetricField {
    /// Get all metric fields in declaration order
    pub fn all() -> &'static [MetricField] {
        &[
            MetricField::Flows,
            MetricField::Bytes,
            MetricField::Packets,
            MetricField::FlowDuration,
            MetricField::Communications,
            MetricField::Country,
        ]
    }

    /// The selector token for this field ("flows", "flow_duration", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::Flows => "flows",
            MetricField::Bytes => "bytes",
            MetricField::Packets => "packets",
            MetricField::FlowDuration => "flow_duration",
            MetricField::Communications => "communications",
            MetricField::Country => "country",
        }
    }

    /// Display name with underscores opened up ("flow duration")
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricField::Flows => "flows",
            MetricField::Bytes => "bytes",
            MetricField::Packets => "packets",
            MetricField::FlowDuration => "flow duration",
            MetricField::Communications => "communications",
            MetricField::Country => "country",
        }
    }

    /// Parse a selector token back into a field
    pub fn parse(s: &str) -> Option<MetricField> {
        MetricField::all().iter().copied().find(|m| m.as_str() == s)
    }
}

impl std::fmt::Display for MetricField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Categorical fields the grouped-statistics view can group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    #[default]
    K,
    Subnet,
    WorkingHourGroup,
    DayGroup,
}

impl GroupField {
    /// Get all group fields in declaration order
    pub fn all() -> &'static [GroupField] {
        &[
            GroupField::K,
            GroupField::Subnet,
            GroupField::WorkingHourGroup,
            GroupField::DayGroup,
        ]
    }

    /// The selector token for this field ("k", "working_hour_group", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupField::K => "k",
            GroupField::Subnet => "subnet",
            GroupField::WorkingHourGroup => "working_hour_group",
            GroupField::DayGroup => "day_group",
        }
    }

    /// Display name with underscores opened up ("working hour group")
    pub fn display_name(&self) -> &'static str {
        match self {
            GroupField::K => "k",
            GroupField::Subnet => "subnet",
            GroupField::WorkingHourGroup => "working hour group",
            GroupField::DayGroup => "day group",
        }
    }

    /// Parse a selector token back into a field
    pub fn parse(s: &str) -> Option<GroupField> {
        GroupField::all().iter().copied().find(|g| g.as_str() == s)
    }
}

impl std::fmt::Display for GroupField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed network flow
///
/// Records are immutable once constructed. The activity label and its
/// description are derived from `bytes` and exposed through methods so they
/// can never drift from the byte volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    /// Calendar date the flow was observed on
    pub date: NaiveDate,
    /// Time-of-day bucket
    pub hour: HourBucket,
    /// Source address of the flow
    pub source_address: String,
    /// Number of flows aggregated into this record
    pub flows: u64,
    /// Total byte volume
    pub bytes: u64,
    /// Total packet count
    pub packets: u64,
    /// Accumulated flow duration
    pub flow_duration: u64,
    /// Number of distinct communications
    pub communications: u64,
    /// Country code metric
    pub country: u64,
    /// Risk category (small positive integer)
    pub k: u8,
    /// Working-hour classification
    pub working_hour_group: WorkingHourGroup,
    /// Weekday/weekend classification
    pub day_group: DayGroup,
    /// Source subnet
    pub subnet: Subnet,
}

impl FlowRecord {
    /// Create a new record with zeroed metrics
    pub fn new(date: NaiveDate, hour: HourBucket, source_address: impl Into<String>) -> Self {
        Self {
            date,
            hour,
            source_address: source_address.into(),
            flows: 0,
            bytes: 0,
            packets: 0,
            flow_duration: 0,
            communications: 0,
            country: 0,
            k: 2,
            working_hour_group: WorkingHourGroup::NonWorking,
            day_group: DayGroup::from_date(date),
            subnet: Subnet(0),
        }
    }

    /// Set the flow count
    pub fn with_flows(mut self, flows: u64) -> Self {
        self.flows = flows;
        self
    }

    /// Set the byte volume (also determines the activity label)
    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = bytes;
        self
    }

    /// Set the packet count
    pub fn with_packets(mut self, packets: u64) -> Self {
        self.packets = packets;
        self
    }

    /// Set the accumulated flow duration
    pub fn with_flow_duration(mut self, flow_duration: u64) -> Self {
        self.flow_duration = flow_duration;
        self
    }

    /// Set the communications count
    pub fn with_communications(mut self, communications: u64) -> Self {
        self.communications = communications;
        self
    }

    /// Set the country metric
    pub fn with_country(mut self, country: u64) -> Self {
        self.country = country;
        self
    }

    /// Set the risk category
    pub fn with_k(mut self, k: u8) -> Self {
        self.k = k;
        self
    }

    /// Set the working-hour group
    pub fn with_working_hours(mut self, group: WorkingHourGroup) -> Self {
        self.working_hour_group = group;
        self
    }

    /// Set the subnet
    pub fn with_subnet(mut self, subnet: Subnet) -> Self {
        self.subnet = subnet;
        self
    }

    /// Activity label derived from the byte volume
    pub fn label(&self) -> ActivityLabel {
        ActivityLabel::from_bytes(self.bytes)
    }

    /// Human description of the activity label
    pub fn description(&self) -> &'static str {
        self.label().description()
    }

    /// Aggregation weight of this record
    pub fn count(&self) -> u64 {
        1
    }

    /// Value of a numeric metric field
    pub fn metric(&self, field: MetricField) -> u64 {
        match field {
            MetricField::Flows => self.flows,
            MetricField::Bytes => self.bytes,
            MetricField::Packets => self.packets,
            MetricField::FlowDuration => self.flow_duration,
            MetricField::Communications => self.communications,
            MetricField::Country => self.country,
        }
    }

    /// Display value of a categorical grouping field
    pub fn group_value(&self, field: GroupField) -> String {
        match field {
            GroupField::K => self.k.to_string(),
            GroupField::Subnet => self.subnet.to_string(),
            GroupField::WorkingHourGroup => self.working_hour_group.to_string(),
            GroupField::DayGroup => self.day_group.to_string(),
        }
    }
}
