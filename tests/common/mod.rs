//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use flowscope::dispatch::{DashboardBridge, DispatchMessage};
use std::time::{Duration, Instant};

/// Create a test timeout duration
pub fn test_timeout() -> Duration {
    Duration::from_secs(2)
}

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Collect view messages (chart or error) until `count` distinct views have
/// reported or the timeout elapses.
pub fn collect_view_messages(
    bridge: &DashboardBridge,
    count: usize,
    timeout: Duration,
) -> Vec<DispatchMessage> {
    let deadline = Instant::now() + timeout;
    let mut msgs = Vec::new();
    let mut views = std::collections::BTreeSet::new();
    while views.len() < count && Instant::now() < deadline {
        if let Some(msg) = bridge.recv_timeout(Duration::from_millis(20)) {
            if let Some(view) = msg.view() {
                views.insert(view);
                msgs.push(msg);
            }
        }
    }
    msgs
}
