//! # FlowScope: Reactive Analytics over Network Flow Records
//!
//! An interactive-analytics core for network flow records. A filter layer
//! narrows an immutable record store down to a subset, and six pure view
//! transforms turn that subset into renderer-agnostic chart payloads. A
//! dispatcher recomputes exactly the views a selector change touches and
//! guarantees that, per view, only the newest result is ever delivered.
//!
//! ## Architecture
//!
//! - **Store**: Immutable in-memory flow records, loaded from JSON or built
//!   from the deterministic sample
//! - **Filter**: Normalizes raw selector values into a `FilterPredicate` and
//!   projects the store down to a `FilteredView` of matching records
//! - **Views**: Pure transforms producing box, sunburst, scatter, heatmap,
//!   polar, and histogram chart payloads
//! - **Dispatch**: A dedicated recompute thread with per-view generation
//!   counters, talking to the control thread over crossbeam channels
//!
//! ## Example
//!
//! ```ignore
//! use flowscope::{
//!     config::DashboardConfig,
//!     dispatch::{DashboardBridge, Dispatcher},
//!     store::FlowStore,
//! };
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! fn main() {
//!     let config = DashboardConfig::load_or_default("flowscope.toml");
//!     let store = Arc::new(FlowStore::sample());
//!
//!     let (bridge, cmd_rx, msg_tx) = DashboardBridge::new();
//!     let running = Arc::new(AtomicBool::new(true));
//!     let state = config.selectors.initial_state();
//!
//!     let dispatcher_running = running.clone();
//!     let handle = std::thread::spawn(move || {
//!         Dispatcher::new(store, state, cmd_rx, msg_tx, dispatcher_running).run()
//!     });
//!
//!     // ... send selector events through the bridge, drain chart payloads ...
//!
//!     bridge.shutdown();
//!     handle.join().ok();
//! }
//! ```

pub mod chart;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod store;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use chart::{ChartData, ChartSpec, ViewKind};
pub use config::DashboardConfig;
pub use dispatch::{DashboardBridge, DispatchCommand, DispatchMessage, Dispatcher};
pub use error::{FlowScopeError, Result};
pub use filter::{FilterPredicate, FilterSelectors, FilteredView};
pub use store::FlowStore;
pub use types::{FlowRecord, GroupField, MetricField};
