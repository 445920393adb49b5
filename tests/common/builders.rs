//! Test data builders for creating test stores

use chrono::NaiveDate;
use flowscope::store::FlowStore;
use flowscope::types::{FlowRecord, HourBucket, Subnet, WorkingHourGroup};

/// Byte values sitting safely inside each of the five label bands.
/// A jitter below 100 never crosses a band boundary.
const BAND_BYTES: [u64; 5] = [500, 3_000, 20_000, 60_000, 150_000];

/// Deterministic 1000-record store spanning 2020-12-01 through 2020-12-14.
///
/// Bytes cycle through all five label bands and every hour bucket,
/// working-hour group, and subnet appears, so any filter combination keeps
/// some records and drops others.
pub fn scenario_store() -> FlowStore {
    let base = NaiveDate::from_ymd_opt(2020, 12, 1).unwrap();
    let records = (0..1000u64)
        .map(|i| {
            let date = base + chrono::Days::new(i % 14);
            let hour = HourBucket::all()[(i % 6) as usize];
            let address = format!("10.{}.{}.{}", i % 4, (i / 4) % 200, 1 + i % 250);
            FlowRecord::new(date, hour, address)
                .with_flows(1 + i % 40)
                .with_bytes(BAND_BYTES[(i % 5) as usize] + i % 100)
                .with_packets(5 + (i * 7) % 500)
                .with_flow_duration(60 + (i * 11) % 3_000)
                .with_communications(1 + i % 8)
                .with_country(i % 30)
                .with_k(2 + (i % 5) as u8)
                .with_working_hours(WorkingHourGroup::all()[(i % 3) as usize])
                .with_subnet(Subnet((i % 4) as u8))
        })
        .collect();
    FlowStore::new(records)
}

/// A single record on the given date with the given byte count.
pub fn record_on(date: NaiveDate, bytes: u64) -> FlowRecord {
    FlowRecord::new(date, HourBucket::H10, "10.0.0.1").with_bytes(bytes)
}
