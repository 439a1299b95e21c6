//=========================================================================
// Event Collector
//=========================================================================
//
// Receiving end of the platform channel. At the top of each tick the
// game asks for a `PendingFrame`: every input frame queued since the
// last tick flattened into one event list, the newest window size, and
// whether the window is gone.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Whether the game loop keeps running after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== PendingFrame ========================================================

#[derive(Debug)]
pub(crate) struct PendingFrame {
    pub control: TickControl,
    /// Replayed input of every queued frame, oldest first.
    pub input: Vec<InputEvent>,
    pub resized: Option<(u32, u32)>,
}

impl Default for PendingFrame {
    fn default() -> Self {
        Self { control: TickControl::Continue, input: Vec::new(), resized: None }
    }
}

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
}

impl EventCollector {
    /// Messages taken per tick; the rest wait for the next one.
    pub(crate) const BACKLOG_LIMIT: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self { receiver }
    }

    /// Never blocks.
    pub(crate) fn collect(&self) -> PendingFrame {
        let mut pending = PendingFrame::default();

        for taken in 0..Self::BACKLOG_LIMIT {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => return pending,
                Err(TryRecvError::Disconnected) => {
                    debug!(target: "platform", "Window side hung up after {} messages", taken);
                    pending.control = TickControl::Exit;
                    return pending;
                }
            };

            match event {
                PlatformEvent::Input(frame) => pending.input.extend(frame.replay()),
                PlatformEvent::Resized { width, height } => pending.resized = Some((width, height)),
                PlatformEvent::WindowClosed => {
                    pending.control = TickControl::Exit;
                    return pending;
                }
            }
        }

        if !self.receiver.is_empty() {
            warn!(target: "platform", "{} platform messages deferred to next tick", self.receiver.len());
        }
        pending
    }
}

//=========================================================================
// Tests
//=========================================================================
