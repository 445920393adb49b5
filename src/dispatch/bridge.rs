//! Thread boundary between the dispatcher (recompute thread) and the control
//! layer (UI or script driving the selectors).

use crate::chart::{ChartSpec, ViewKind};
use crate::dispatch::state::SelectorEvent;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::collections::BTreeMap;
use std::time::Duration;

/// Messages sent from the dispatcher to the control thread.
#[derive(Debug, Clone)]
pub enum DispatchMessage {
    /// A view finished recomputing.
    ChartReady {
        view: ViewKind,
        generation: u64,
        spec: ChartSpec,
    },

    /// A view failed to recompute. Other views are unaffected.
    ViewError {
        view: ViewKind,
        generation: u64,
        message: String,
    },

    /// Dispatcher is shutting down.
    Shutdown,
}

impl DispatchMessage {
    /// The view this message concerns, if any.
    pub fn view(&self) -> Option<ViewKind> {
        match self {
            DispatchMessage::ChartReady { view, .. } => Some(*view),
            DispatchMessage::ViewError { view, .. } => Some(*view),
            DispatchMessage::Shutdown => None,
        }
    }

    /// The generation the message was computed under, if any.
    pub fn generation(&self) -> Option<u64> {
        match self {
            DispatchMessage::ChartReady { generation, .. } => Some(*generation),
            DispatchMessage::ViewError { generation, .. } => Some(*generation),
            DispatchMessage::Shutdown => None,
        }
    }
}

/// Commands sent from the control thread to the dispatcher.
#[derive(Debug, Clone)]
pub enum DispatchCommand {
    /// A selector changed; recompute the views that depend on it.
    Selector(SelectorEvent),
    /// Recompute every view under the current selector state.
    RefreshAll,
    /// Shut down the dispatcher thread.
    Shutdown,
}

/// Channel capacity for commands (control → dispatcher).
const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for messages (dispatcher → control).
const MSG_CHANNEL_CAPACITY: usize = 1_024;

/// Control-side handle for communicating with the dispatcher thread.
pub struct DashboardBridge {
    pub cmd_tx: Sender<DispatchCommand>,
    pub msg_rx: Receiver<DispatchMessage>,
}

impl DashboardBridge {
    /// Create a new bridge pair: `(bridge_for_control, cmd_rx, msg_tx)`.
    ///
    /// The dispatcher thread owns `cmd_rx` and `msg_tx`.
    pub fn new() -> (Self, Receiver<DispatchCommand>, Sender<DispatchMessage>) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        (Self { cmd_tx, msg_rx }, cmd_rx, msg_tx)
    }

    // --- Drain messages ---

    /// Drain all pending messages in arrival order.
    pub fn drain(&self) -> Vec<DispatchMessage> {
        let mut msgs = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            msgs.push(msg);
        }
        msgs
    }

    /// Drain pending messages, keeping only the highest-generation message per
    /// view. Earlier results for the same view are superseded and dropped.
    /// A `Shutdown` message, if present, is appended last.
    pub fn drain_latest(&self) -> Vec<DispatchMessage> {
        let mut latest: BTreeMap<ViewKind, DispatchMessage> = BTreeMap::new();
        let mut shutdown = false;
        while let Ok(msg) = self.msg_rx.try_recv() {
            match msg.view() {
                Some(view) => {
                    let newer = latest
                        .get(&view)
                        .and_then(|prev| prev.generation())
                        .map_or(true, |prev_gen| {
                            msg.generation().map_or(true, |gen| gen >= prev_gen)
                        });
                    if newer {
                        latest.insert(view, msg);
                    }
                }
                None => shutdown = true,
            }
        }
        let mut msgs: Vec<DispatchMessage> = latest.into_values().collect();
        if shutdown {
            msgs.push(DispatchMessage::Shutdown);
        }
        msgs
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<DispatchMessage> {
        self.msg_rx.try_recv().ok()
    }

    /// Block for at most `timeout` waiting for one message.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<DispatchMessage> {
        self.msg_rx.recv_timeout(timeout).ok()
    }

    // --- Commands ---

    pub fn send_command(&self, cmd: DispatchCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn select(&self, event: SelectorEvent) {
        let _ = self.cmd_tx.send(DispatchCommand::Selector(event));
    }

    pub fn refresh_all(&self) {
        let _ = self.cmd_tx.send(DispatchCommand::RefreshAll);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(DispatchCommand::Shutdown);
    }
}
