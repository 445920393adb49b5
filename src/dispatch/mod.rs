//! Recompute dispatcher
//!
//! The dispatcher owns the current selector state and turns selector-change
//! events into fresh chart specifications. It runs on a dedicated thread and
//! talks to the control layer over bounded channels.
//!
//! # Architecture
//!
//! - [`bridge`] carries [`bridge::DispatchCommand`]s in and
//!   [`bridge::DispatchMessage`]s out.
//! - [`state`] holds the raw selector values and maps each selector to the
//!   views that depend on it.
//! - [`engine`] is the loop: drain and coalesce commands, bump the issued
//!   generation of every affected view, recompute dirty views one at a time,
//!   and discard any result whose generation was superseded while it was
//!   being computed.

pub mod bridge;
pub mod engine;
pub mod state;

pub use bridge::{DashboardBridge, DispatchCommand, DispatchMessage};
pub use engine::Dispatcher;
pub use state::{SelectorEvent, SelectorState};
