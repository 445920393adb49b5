//! FlowScope - Demo Entry Point
//!
//! Drives the dispatcher through a scripted sequence of selector changes and
//! prints a one-line summary of every chart payload it produces. A renderer
//! would consume the same `ChartSpec` JSON; this binary just shows the
//! reactive loop working end to end.
//!
//! Usage: `flowscope [config.toml]`

use anyhow::Context;
use flowscope::{
    chart::ChartData,
    config::DashboardConfig,
    dispatch::{DashboardBridge, DispatchMessage, Dispatcher, SelectorEvent},
    filter::Selection,
    store::FlowStore,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How long to wait for one round of recomputes before giving up.
const ROUND_TIMEOUT: Duration = Duration::from_secs(5);

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| flowscope::config::CONFIG_FILE.to_string());
    let config = DashboardConfig::load_or_default(&config_path);

    // Initialize logging, optionally teeing into a daily-rotated file
    let (file_layer, _guard) = if config.logging.log_to_file {
        let appender = tracing_appender::rolling::daily(&config.logging.log_dir, "flowscope.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flowscope=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    tracing::info!("Starting FlowScope");

    let store = match &config.data.records_path {
        Some(path) => Arc::new(
            FlowStore::load_json(path)
                .with_context(|| format!("loading flow records from {:?}", path))?,
        ),
        None => Arc::new(FlowStore::sample()),
    };
    let catalog = store.catalog();
    tracing::info!(
        records = store.len(),
        dates = catalog.dates.len(),
        "Store ready"
    );

    // Spawn the dispatcher thread
    let (bridge, cmd_rx, msg_tx) = DashboardBridge::new();
    let running = Arc::new(AtomicBool::new(true));
    let state = config.selectors.initial_state();
    let dispatcher_store = store.clone();
    let dispatcher_running = running.clone();
    let handle = std::thread::spawn(move || {
        Dispatcher::new(dispatcher_store, state, cmd_rx, msg_tx, dispatcher_running).run()
    });

    // Initial render: every view computes once under the configured selectors
    println!("-- initial render --");
    report_round(&bridge, 6);

    println!("-- narrow the date range --");
    bridge.select(SelectorEvent::DateRange {
        start: NaiveDate::from_ymd_opt(2020, 12, 3),
        end: NaiveDate::from_ymd_opt(2020, 12, 7),
    });
    report_round(&bridge, 6);

    println!("-- keep only the two highest labels --");
    bridge.select(SelectorEvent::Labels(Selection::Many(vec![3, 4])));
    report_round(&bridge, 6);

    println!("-- switch the y axis to bytes --");
    bridge.select(SelectorEvent::YMetric("bytes".to_string()));
    report_round(&bridge, 4);

    println!("-- regroup the box chart by day --");
    bridge.select(SelectorEvent::BoxGroupBy("day_group".to_string()));
    report_round(&bridge, 1);

    println!("-- an unknown x metric fails only the views that read it --");
    bridge.select(SelectorEvent::XMetric("bandwidth".to_string()));
    report_round(&bridge, 2);

    println!("-- restore a valid x metric --");
    bridge.select(SelectorEvent::XMetric("flows".to_string()));
    report_round(&bridge, 2);

    tracing::info!("Shutting down");
    bridge.shutdown();
    if handle.join().is_err() {
        tracing::error!("Dispatcher thread panicked");
    }

    Ok(())
}

/// Wait for one recompute round and print a line per delivered view.
fn report_round(bridge: &DashboardBridge, expected: usize) {
    let deadline = Instant::now() + ROUND_TIMEOUT;
    let mut seen = BTreeSet::new();
    while seen.len() < expected && Instant::now() < deadline {
        let Some(msg) = bridge.recv_timeout(Duration::from_millis(50)) else {
            continue;
        };
        match msg {
            DispatchMessage::ChartReady {
                view,
                generation,
                spec,
            } => {
                seen.insert(view);
                println!(
                    "  {:<9} gen {:>2}  \"{}\"  {}",
                    view.as_str(),
                    generation,
                    spec.title,
                    describe(&spec.data)
                );
            }
            DispatchMessage::ViewError {
                view,
                generation,
                message,
            } => {
                seen.insert(view);
                println!("  {:<9} gen {:>2}  error: {}", view.as_str(), generation, message);
            }
            DispatchMessage::Shutdown => return,
        }
    }
    if seen.len() < expected {
        tracing::warn!(
            expected,
            received = seen.len(),
            "Round did not complete before the timeout"
        );
    }
}

/// One-line shape summary of a chart payload.
fn describe(data: &ChartData) -> String {
    match data {
        ChartData::GroupedBoxes(chart) => format!("{} groups", chart.groups.len()),
        ChartData::Hierarchy(chart) => {
            format!("{} nodes over {} records", chart.nodes.len(), chart.total)
        }
        ChartData::Points(chart) => format!("{} points", chart.points.len()),
        ChartData::Grid(chart) => format!(
            "{}x{} grid, {} records",
            chart.y_categories.len(),
            chart.x_categories.len(),
            chart.total()
        ),
        ChartData::PolarSeries(chart) => format!("{} series", chart.series.len()),
        ChartData::Bins(chart) => {
            format!("{} bins of width {}", chart.bins.len(), chart.bin_width)
        }
    }
}
