//! The recompute loop and per-view generation bookkeeping.
//!
//! The dispatcher runs on a dedicated thread. Each pass:
//! 1. Drain commands, folding selector changes into the state and bumping
//!    the issued generation of every affected view.
//! 2. Recompute dirty views one at a time, draining commands between views.
//! 3. Deliver each finished chart unless a newer generation was issued for
//!    that view while it was computing. A superseded result is dropped and
//!    the view stays dirty.

use crate::chart::{ChartSpec, ViewKind};
use crate::dispatch::bridge::{DispatchCommand, DispatchMessage};
use crate::dispatch::state::SelectorState;
use crate::error::{FlowScopeError, Result};
use crate::filter::{self, FilterPredicate};
use crate::store::FlowStore;
use crate::types::{GroupField, MetricField};
use crate::views;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How long `run` blocks on the command channel before rechecking `running`.
const COMMAND_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The recompute engine.
///
/// Owns the selector state and the issued/completed generation counters.
/// Charts are pure functions of `(store, state)`, so the dispatcher holds
/// the store immutably and shares it with nothing else on this thread.
pub struct Dispatcher {
    store: Arc<FlowStore>,
    state: SelectorState,
    /// Highest generation requested per view.
    issued: HashMap<ViewKind, u64>,
    /// Highest generation delivered (or failed) per view.
    completed: HashMap<ViewKind, u64>,
    running: Arc<AtomicBool>,
    cmd_rx: Receiver<DispatchCommand>,
    msg_tx: Sender<DispatchMessage>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<FlowStore>,
        state: SelectorState,
        cmd_rx: Receiver<DispatchCommand>,
        msg_tx: Sender<DispatchMessage>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store,
            state,
            issued: HashMap::new(),
            completed: HashMap::new(),
            running,
            cmd_rx,
            msg_tx,
        }
    }

    /// Run until `running` is set to false or Shutdown is received.
    ///
    /// Every view starts dirty, so the initial charts for the starting
    /// selector state are delivered without any command being sent.
    pub fn run(&mut self) {
        tracing::info!(records = self.store.len(), "Dispatcher thread started");
        self.mark_all_dirty();

        while self.running.load(Ordering::Relaxed) {
            self.recompute_dirty();
            if !self.running.load(Ordering::Relaxed) {
                break;
            }
            match self.cmd_rx.recv_timeout(COMMAND_POLL_INTERVAL) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.drain_commands();
        }

        let _ = self.msg_tx.send(DispatchMessage::Shutdown);
        tracing::info!("Dispatcher thread exiting");
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            self.handle_command(cmd);
        }
    }

    fn handle_command(&mut self, cmd: DispatchCommand) {
        match cmd {
            DispatchCommand::Selector(event) => {
                tracing::debug!(?event, "Selector changed");
                for view in event.affected_views() {
                    self.mark_dirty(*view);
                }
                self.state.apply_event(&event);
            }
            DispatchCommand::RefreshAll => {
                self.mark_all_dirty();
            }
            DispatchCommand::Shutdown => {
                self.running.store(false, Ordering::Relaxed);
            }
        }
    }

    fn mark_dirty(&mut self, view: ViewKind) {
        *self.issued.entry(view).or_insert(0) += 1;
    }

    fn mark_all_dirty(&mut self) {
        for view in ViewKind::all() {
            self.mark_dirty(*view);
        }
    }

    fn issued_generation(&self, view: ViewKind) -> u64 {
        self.issued.get(&view).copied().unwrap_or(0)
    }

    fn completed_generation(&self, view: ViewKind) -> u64 {
        self.completed.get(&view).copied().unwrap_or(0)
    }

    fn next_dirty_view(&self) -> Option<ViewKind> {
        ViewKind::all()
            .iter()
            .copied()
            .find(|view| self.issued_generation(*view) > self.completed_generation(*view))
    }

    /// Recompute dirty views until none remain.
    fn recompute_dirty(&mut self) {
        loop {
            self.drain_commands();
            if !self.running.load(Ordering::Relaxed) {
                return;
            }
            let Some(view) = self.next_dirty_view() else {
                return;
            };
            let generation = self.issued_generation(view);
            let result = self.compute_view(view);

            // Commands that arrived during the compute may have bumped the
            // generation. A stale result is dropped and the view recomputed
            // on the next pass of this loop.
            self.drain_commands();
            if self.issued_generation(view) > generation {
                tracing::debug!(view = view.as_str(), generation, "Result superseded");
                continue;
            }
            self.completed.insert(view, generation);
            match result {
                Ok(spec) => {
                    let _ = self.msg_tx.send(DispatchMessage::ChartReady {
                        view,
                        generation,
                        spec,
                    });
                }
                Err(err) => {
                    tracing::warn!(view = view.as_str(), %err, "View recompute failed");
                    let _ = self.msg_tx.send(DispatchMessage::ViewError {
                        view,
                        generation,
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    /// Normalize the current selectors and run one view's transform.
    ///
    /// A selector or field error fails only this view; the other views keep
    /// whatever they last delivered.
    fn compute_view(&self, view: ViewKind) -> Result<ChartSpec> {
        let predicate = FilterPredicate::normalize(&self.state.filters)?;
        let subset = filter::apply(&predicate, &self.store);
        match view {
            ViewKind::BoxPlot => {
                let group = GroupField::parse(&self.state.box_group_by).ok_or_else(|| {
                    FlowScopeError::invalid_field(
                        ViewKind::BoxPlot.as_str(),
                        &self.state.box_group_by,
                        "unknown grouping field",
                    )
                })?;
                let metric = parse_metric(view, &self.state.y_metric)?;
                Ok(views::box_plot::compute(&subset, group, metric))
            }
            ViewKind::Sunburst => {
                let metric = parse_metric(view, &self.state.y_metric)?;
                Ok(views::sunburst::compute(&subset, metric))
            }
            ViewKind::Scatter => {
                let x = parse_metric(view, &self.state.x_metric)?;
                let y = parse_metric(view, &self.state.y_metric)?;
                Ok(views::scatter::compute(&subset, x, y))
            }
            ViewKind::Heatmap => Ok(views::heatmap::compute(&subset)),
            ViewKind::Polar => {
                let metric = parse_metric(view, &self.state.y_metric)?;
                Ok(views::polar::compute(&subset, metric))
            }
            ViewKind::Histogram => {
                let metric = parse_metric(view, &self.state.x_metric)?;
                Ok(views::histogram::compute(&subset, metric))
            }
        }
    }
}

fn parse_metric(view: ViewKind, raw: &str) -> Result<MetricField> {
    MetricField::parse(raw)
        .ok_or_else(|| FlowScopeError::invalid_field(view.as_str(), raw, "unknown metric"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::bridge::DashboardBridge;
    use crate::dispatch::state::SelectorEvent;

    fn dispatcher() -> (Dispatcher, DashboardBridge) {
        let (bridge, cmd_rx, msg_tx) = DashboardBridge::new();
        let store = Arc::new(FlowStore::sample());
        let running = Arc::new(AtomicBool::new(true));
        let dispatcher = Dispatcher::new(store, SelectorState::default(), cmd_rx, msg_tx, running);
        (dispatcher, bridge)
    }

    #[test]
    fn test_compute_view_produces_every_kind() {
        let (dispatcher, _bridge) = dispatcher();
        for view in ViewKind::all() {
            let spec = dispatcher.compute_view(*view).unwrap();
            assert_eq!(spec.view, *view);
        }
    }

    #[test]
    fn test_unknown_metric_fails_only_dependent_views() {
        let (mut dispatcher, _bridge) = dispatcher();
        dispatcher
            .state
            .apply_event(&SelectorEvent::XMetric("bandwidth".to_string()));

        assert!(dispatcher.compute_view(ViewKind::Scatter).is_err());
        assert!(dispatcher.compute_view(ViewKind::Histogram).is_err());
        assert!(dispatcher.compute_view(ViewKind::BoxPlot).is_ok());
        assert!(dispatcher.compute_view(ViewKind::Sunburst).is_ok());
        assert!(dispatcher.compute_view(ViewKind::Heatmap).is_ok());
        assert!(dispatcher.compute_view(ViewKind::Polar).is_ok());
    }

    #[test]
    fn test_unknown_group_field_fails_box_only() {
        let (mut dispatcher, _bridge) = dispatcher();
        dispatcher
            .state
            .apply_event(&SelectorEvent::BoxGroupBy("city".to_string()));

        let err = dispatcher.compute_view(ViewKind::BoxPlot).unwrap_err();
        assert!(err.to_string().contains("city"));
        assert!(dispatcher.compute_view(ViewKind::Scatter).is_ok());
    }

    #[test]
    fn test_superseded_result_is_not_delivered() {
        let (mut dispatcher, bridge) = dispatcher();
        dispatcher.mark_all_dirty();

        // Bump the scatter generation mid-flight by queueing a command the
        // engine will drain right after computing.
        bridge.select(SelectorEvent::XMetric("bytes".to_string()));
        let view = ViewKind::Scatter;
        let generation = dispatcher.issued_generation(view);
        let result = dispatcher.compute_view(view);
        assert!(result.is_ok());

        dispatcher.drain_commands();
        assert!(dispatcher.issued_generation(view) > generation);
        assert_eq!(dispatcher.completed_generation(view), 0);
    }

    #[test]
    fn test_recompute_dirty_delivers_one_chart_per_view() {
        let (mut dispatcher, bridge) = dispatcher();
        dispatcher.mark_all_dirty();
        dispatcher.recompute_dirty();

        let msgs = bridge.drain();
        assert_eq!(msgs.len(), ViewKind::all().len());
        for view in ViewKind::all() {
            assert!(msgs.iter().any(|m| m.view() == Some(*view)));
        }
        assert_eq!(dispatcher.next_dirty_view(), None);
    }

    #[test]
    fn test_selector_command_marks_dependents_dirty() {
        let (mut dispatcher, _bridge) = dispatcher();
        dispatcher.handle_command(DispatchCommand::Selector(SelectorEvent::BoxGroupBy(
            "subnet".to_string(),
        )));

        assert_eq!(dispatcher.issued_generation(ViewKind::BoxPlot), 1);
        assert_eq!(dispatcher.issued_generation(ViewKind::Scatter), 0);
        assert_eq!(dispatcher.state.box_group_by, "subnet");
    }
}
