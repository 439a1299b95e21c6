//=========================================================================
// Event Scheduler
//=========================================================================
//
// Delivers events after a delay using elapsed-time accumulation.
//
// Architecture:
//   add(event, delay) → entries: Vec<(delay_ms, Vec<EventData>)>
//   start()           → sort by delay, snapshot for reset
//   update(ms, queue) → accumulate, publish every due group
//
// Status: Stopped ⇄ Running. Stopping clears pending entries, which
// cancels anything not yet fired.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::data::{EventAction, EventCategory, EventData, EventPayload};
use super::dispatcher::{EventHandler, EventQueue};
use crate::error::{EngineError, Result};

//=== SchedulerStatus =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    Stopped,
    Running,
}

//=== EventScheduler ======================================================

/// Publishes events once their delay has elapsed.
///
/// Driven by the game loop each frame; also listens to the `Scheduler`
/// category (`OnAdd`, `OnStart`, `OnStop`, `OnReset`).
pub struct EventScheduler {
    id: String,
    entries: Vec<(u32, Vec<EventData>)>,
    original: Vec<(u32, Vec<EventData>)>,
    elapsed_ms: f64,
    status: SchedulerStatus,
}

impl EventScheduler {
    //--- Construction -----------------------------------------------------

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
            original: Vec::new(),
            elapsed_ms: 0.0,
            status: SchedulerStatus::Stopped,
        }
    }

    //--- Schedule Editing -------------------------------------------------

    /// Schedules `event` to fire `delay_ms` after `start()`.
    ///
    /// An equal event already scheduled for the same delay is ignored.
    /// Returns whether the event was added.
    pub fn add(&mut self, event: EventData, delay_ms: u32) -> bool {
        match self.entries.iter_mut().find(|(d, _)| *d == delay_ms) {
            Some((_, group)) => {
                if group.contains(&event) {
                    return false;
                }
                group.push(event);
            }
            None => self.entries.push((delay_ms, vec![event])),
        }
        true
    }

    /// Number of events not yet fired.
    pub fn pending(&self) -> usize {
        self.entries.iter().map(|(_, group)| group.len()).sum()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Orders entries chronologically and begins counting time.
    pub fn start(&mut self) {
        self.entries.sort_by_key(|(delay, _)| *delay);
        self.original = self.entries.clone();
        self.elapsed_ms = 0.0;
        self.status = SchedulerStatus::Running;
        debug!(target: "events", "Scheduler '{}' started with {} events", self.id, self.pending());
    }

    /// Cancels every pending event.
    pub fn stop(&mut self) {
        self.entries.clear();
        self.status = SchedulerStatus::Stopped;
        debug!(target: "events", "Scheduler '{}' stopped", self.id);
    }

    /// Restores the schedule captured by the last `start()`.
    pub fn reset(&mut self) -> Result<()> {
        if self.status == SchedulerStatus::Running {
            return Err(EngineError::SchedulerRunning);
        }
        self.entries = self.original.clone();
        self.elapsed_ms = 0.0;
        Ok(())
    }

    pub fn status(&self) -> SchedulerStatus {
        self.status
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances time and publishes every due event.
    pub fn update(&mut self, elapsed_ms: f64, queue: &mut EventQueue) {
        if self.status != SchedulerStatus::Running {
            return;
        }

        self.elapsed_ms += elapsed_ms;

        while let Some((delay, _)) = self.entries.first() {
            if f64::from(*delay) > self.elapsed_ms {
                break;
            }
            let (_, group) = self.entries.remove(0);
            for event in group {
                queue.publish(event);
            }
        }

        if self.entries.is_empty() {
            self.status = SchedulerStatus::Stopped;
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl EventHandler for EventScheduler {
    fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
        if event.category() != EventCategory::Scheduler {
            return;
        }

        match event.action() {
            EventAction::OnAdd => match event.payload() {
                EventPayload::Scheduled { delay_ms, event } => {
                    self.add((**event).clone(), *delay_ms);
                }
                other => warn!(target: "events", "Scheduler OnAdd without schedule payload: {:?}", other),
            },
            EventAction::OnStart => self.start(),
            EventAction::OnStop => self.stop(),
            EventAction::OnReset => {
                if let Err(e) = self.reset() {
                    warn!(target: "events", "Scheduler '{}': {}", self.id, e);
                }
            }
            _ => {}
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn win() -> EventData {
        EventData::new(EventCategory::Player, EventAction::OnWin)
    }

    fn lose() -> EventData {
        EventData::new(EventCategory::Player, EventAction::OnLose)
    }

    #[test]
    fn add_deduplicates_within_same_delay() {
        let mut scheduler = EventScheduler::new("s");
        assert!(scheduler.add(win(), 100));
        assert!(!scheduler.add(win(), 100));
        assert!(scheduler.add(win(), 200));
        assert_eq!(scheduler.pending(), 2);
    }

    #[test]
    fn events_fire_in_chronological_order() {
        let mut scheduler = EventScheduler::new("s");
        let mut queue = EventQueue::new();
        scheduler.add(lose(), 500);
        scheduler.add(win(), 100);
        scheduler.start();

        scheduler.update(50.0, &mut queue);
        assert!(queue.is_empty());

        scheduler.update(60.0, &mut queue);
        assert_eq!(queue.iter().cloned().collect::<Vec<_>>(), vec![win()]);

        scheduler.update(400.0, &mut queue);
        assert_eq!(queue.len(), 2);
        assert_eq!(scheduler.status(), SchedulerStatus::Stopped, "Empty schedule stops itself");
    }

    #[test]
    fn nothing_fires_before_start() {
        let mut scheduler = EventScheduler::new("s");
        let mut queue = EventQueue::new();
        scheduler.add(win(), 0);
        scheduler.update(1000.0, &mut queue);
        assert!(queue.is_empty());
    }

    #[test]
    fn stop_cancels_pending_events() {
        let mut scheduler = EventScheduler::new("s");
        let mut queue = EventQueue::new();
        scheduler.add(win(), 100);
        scheduler.start();
        scheduler.stop();
        scheduler.update(200.0, &mut queue);
        assert!(queue.is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn reset_restores_schedule_when_stopped() {
        let mut scheduler = EventScheduler::new("s");
        scheduler.add(win(), 100);
        scheduler.start();
        assert_eq!(scheduler.reset(), Err(EngineError::SchedulerRunning));

        scheduler.stop();
        scheduler.reset().unwrap();
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn driven_by_scheduler_events() {
        let mut scheduler = EventScheduler::new("s");
        let mut queue = EventQueue::new();

        let add = EventData::with_payload(
            EventCategory::Scheduler,
            EventAction::OnAdd,
            EventPayload::Scheduled { delay_ms: 10, event: Box::new(win()) },
        );
        scheduler.handle_event(&add, &mut queue);
        scheduler.handle_event(&EventData::new(EventCategory::Scheduler, EventAction::OnStart), &mut queue);

        assert_eq!(scheduler.status(), SchedulerStatus::Running);
        scheduler.update(10.0, &mut queue);
        assert_eq!(queue.len(), 1);
    }
}
