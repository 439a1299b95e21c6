//=========================================================================
// Event Dispatcher
//=========================================================================
//
// Category-keyed publish/subscribe router.
//
// Architecture:
//   Systems → publish() → EventQueue { pending, suppressed }
//                              ↓
//   Game loop ─────────→ update()  (once per frame)
//                              ↓
//   HashMap<EventCategory, Vec<Subscriber>> → handler(event, queue)
//
// Pattern: publish (dedup) → snapshot count → deliver → unmark → repeat
//
// Events published while a batch is being delivered land behind the
// snapshot and wait for the next update().
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::data::{EventCategory, EventData};

//=== Public API ==========================================================

/// Components that react to dispatched events.
///
/// Managers implement this and register themselves with
/// [`EventDispatcher::subscribe_handler`].
pub trait EventHandler {
    /// Reacts to one delivered event. Further events can be published
    /// through `queue`; they are delivered on the next drain.
    fn handle_event(&mut self, event: &EventData, queue: &mut EventQueue);
}

/// Opaque handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type HandlerFn = Box<dyn FnMut(&EventData, &mut EventQueue) -> HandlerStatus>;

/// Whether a handler is still alive after an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandlerStatus {
    Alive,
    Dropped,
}

struct Subscriber {
    id: SubscriptionId,
    handler: HandlerFn,
}

//=== EventQueue ==========================================================

/// Pending events plus the duplicate-suppression set.
///
/// This is the publish side of the dispatcher. Controllers, collision
/// callbacks and handlers only ever see this half.
#[derive(Default)]
pub struct EventQueue {
    pending: VecDeque<EventData>,
    suppressed: Vec<EventData>,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `event` unless a value-equal event is already pending
    /// or currently being delivered. Returns whether it was enqueued.
    pub fn publish(&mut self, event: EventData) -> bool {
        if self.suppressed.contains(&event) {
            trace!(target: "events", "Suppressed duplicate {:?}", event);
            return false;
        }

        self.suppressed.push(event.clone());
        self.pending.push_back(event);
        true
    }

    /// Number of events waiting for the next drain.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Iterates pending events in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &EventData> {
        self.pending.iter()
    }

    fn pop(&mut self) -> Option<EventData> {
        self.pending.pop_front()
    }

    fn unmark(&mut self, event: &EventData) {
        if let Some(index) = self.suppressed.iter().position(|e| e == event) {
            self.suppressed.swap_remove(index);
        }
    }
}

//=== EventDispatcher =====================================================

/// Routes events to category subscribers once per frame.
///
/// Constructed once by the game and handed to every component that
/// needs to subscribe; there is no global instance.
pub struct EventDispatcher {
    subscribers: HashMap<EventCategory, Vec<Subscriber>>,
    queue: EventQueue,
    next_id: u64,
}

impl EventDispatcher {
    /// Creates a dispatcher with no subscribers and an empty queue.
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            queue: EventQueue::new(),
            next_id: 0,
        }
    }

    //--- Subscription -----------------------------------------------------

    /// Registers a closure for `category`. Handlers run in registration
    /// order.
    pub fn subscribe<F>(&mut self, category: EventCategory, mut handler: F) -> SubscriptionId
    where
        F: FnMut(&EventData, &mut EventQueue) + 'static,
    {
        self.insert(
            category,
            Box::new(move |event, queue| {
                handler(event, queue);
                HandlerStatus::Alive
            }),
        )
    }

    /// Registers a shared component for `category`.
    ///
    /// The dispatcher holds the component weakly; once every strong
    /// reference is gone the subscription is pruned on its next delivery.
    pub fn subscribe_handler<H>(&mut self, category: EventCategory, handler: &Rc<RefCell<H>>) -> SubscriptionId
    where
        H: EventHandler + 'static,
    {
        let weak: Weak<RefCell<H>> = Rc::downgrade(handler);
        self.insert(
            category,
            Box::new(move |event, queue| match weak.upgrade() {
                Some(component) => {
                    component.borrow_mut().handle_event(event, queue);
                    HandlerStatus::Alive
                }
                None => HandlerStatus::Dropped,
            }),
        )
    }

    /// Removes a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, category: EventCategory, id: SubscriptionId) -> bool {
        let Some(list) = self.subscribers.get_mut(&category) else {
            return false;
        };

        match list.iter().position(|s| s.id == id) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => {
                warn!(target: "events", "Unsubscribe of unknown {:?} from {:?}", id, category);
                false
            }
        }
    }

    //--- Publishing -------------------------------------------------------

    /// Enqueues an event for the next drain. See [`EventQueue::publish`].
    pub fn publish(&mut self, event: EventData) -> bool {
        self.queue.publish(event)
    }

    /// Publish side, lent to systems during the frame.
    pub fn queue_mut(&mut self) -> &mut EventQueue {
        &mut self.queue
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    //--- Delivery ---------------------------------------------------------

    /// Drains the events pending at call time, delivering each to every
    /// subscriber of its category. Returns the number delivered.
    pub fn update(&mut self) -> usize {
        let batch = self.queue.len();

        for _ in 0..batch {
            let Some(event) = self.queue.pop() else {
                break;
            };

            if let Some(list) = self.subscribers.get_mut(&event.category()) {
                let mut dropped = Vec::new();
                for subscriber in list.iter_mut() {
                    if (subscriber.handler)(&event, &mut self.queue) == HandlerStatus::Dropped {
                        dropped.push(subscriber.id);
                    }
                }
                if !dropped.is_empty() {
                    trace!(target: "events", "Pruning {} dropped subscribers", dropped.len());
                    list.retain(|s| !dropped.contains(&s.id));
                }
            }

            self.queue.unmark(&event);
        }

        if batch > 0 {
            trace!(target: "events", "Delivered {} events ({} deferred)", batch, self.queue.len());
        }
        batch
    }

    //--- Query API --------------------------------------------------------

    /// Number of subscribers registered for `category`.
    pub fn subscriber_count(&self, category: EventCategory) -> usize {
        self.subscribers.get(&category).map(|l| l.len()).unwrap_or(0)
    }

    //--- Internal Helpers -------------------------------------------------

    fn insert(&mut self, category: EventCategory, handler: HandlerFn) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers
            .entry(category)
            .or_default()
            .push(Subscriber { id, handler });
        id
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::data::{EventAction, EventPayload};
    use std::cell::Cell;

    fn pause() -> EventData {
        EventData::new(EventCategory::Menu, EventAction::OnPause)
    }

    fn counter(dispatcher: &mut EventDispatcher, category: EventCategory) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        dispatcher.subscribe(category, move |_, _| c.set(c.get() + 1));
        count
    }

    //--- Subscription -----------------------------------------------------

    #[test]
    fn new_dispatcher_is_empty() {
        let dispatcher = EventDispatcher::new();
        assert!(dispatcher.queue().is_empty());
        assert_eq!(dispatcher.subscriber_count(EventCategory::Menu), 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let mut dispatcher = EventDispatcher::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = order.clone();
            dispatcher.subscribe(EventCategory::Menu, move |_, _| order.borrow_mut().push(tag));
        }

        dispatcher.publish(pause());
        dispatcher.update();

        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut dispatcher = EventDispatcher::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = dispatcher.subscribe(EventCategory::Menu, move |_, _| c.set(c.get() + 1));

        assert!(dispatcher.unsubscribe(EventCategory::Menu, id));
        dispatcher.publish(pause());
        dispatcher.update();

        assert_eq!(count.get(), 0);
    }

    #[test]
    fn unsubscribe_unknown_is_noop() {
        let mut dispatcher = EventDispatcher::new();
        let id = dispatcher.subscribe(EventCategory::UI, |_, _| {});
        assert!(!dispatcher.unsubscribe(EventCategory::Menu, id));
        assert_eq!(dispatcher.subscriber_count(EventCategory::UI), 1);
    }

    #[test]
    fn only_matching_category_is_notified() {
        let mut dispatcher = EventDispatcher::new();
        let menu = counter(&mut dispatcher, EventCategory::Menu);
        let camera = counter(&mut dispatcher, EventCategory::Camera);

        dispatcher.publish(pause());
        dispatcher.update();

        assert_eq!(menu.get(), 1);
        assert_eq!(camera.get(), 0);
    }

    #[test]
    fn publish_without_subscribers_is_legal() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.publish(EventData::new(EventCategory::Sound, EventAction::OnMute));
        assert_eq!(dispatcher.update(), 1);
        assert!(dispatcher.queue().is_empty());
    }

    //--- Duplicate Suppression --------------------------------------------

    #[test]
    fn equal_events_delivered_once_per_drain() {
        let mut dispatcher = EventDispatcher::new();
        let count = counter(&mut dispatcher, EventCategory::Menu);

        assert!(dispatcher.publish(pause()));
        assert!(!dispatcher.publish(pause()), "Second publish should be suppressed");
        dispatcher.update();
        assert_eq!(count.get(), 1);

        // Suppression is cleared once delivered
        assert!(dispatcher.publish(pause()));
        dispatcher.update();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn different_payloads_are_not_duplicates() {
        let mut dispatcher = EventDispatcher::new();
        let count = counter(&mut dispatcher, EventCategory::UI);

        dispatcher.publish(EventData::with_payload(EventCategory::UI, EventAction::OnHealthDelta, EventPayload::Value(1.0)));
        dispatcher.publish(EventData::with_payload(EventCategory::UI, EventAction::OnHealthDelta, EventPayload::Value(2.0)));
        dispatcher.update();

        assert_eq!(count.get(), 2);
    }

    //--- Cascade Bound ----------------------------------------------------

    #[test]
    fn events_published_during_drain_wait_for_next_update() {
        let mut dispatcher = EventDispatcher::new();
        let play = counter(&mut dispatcher, EventCategory::Camera);

        dispatcher.subscribe(EventCategory::Menu, |_, queue| {
            queue.publish(EventData::new(EventCategory::Camera, EventAction::OnCameraCycle));
        });

        dispatcher.publish(pause());
        assert_eq!(dispatcher.update(), 1);
        assert_eq!(play.get(), 0, "Cascaded event must not be delivered in the same drain");
        assert_eq!(dispatcher.queue().len(), 1);

        dispatcher.update();
        assert_eq!(play.get(), 1);
    }

    #[test]
    fn self_republish_during_delivery_is_suppressed() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(EventCategory::Menu, |event, queue| {
            queue.publish(event.clone());
        });

        dispatcher.publish(pause());
        dispatcher.update();

        assert!(dispatcher.queue().is_empty(), "Event in flight is still marked");
    }

    //--- Component Handlers -----------------------------------------------

    struct Recorder {
        seen: Vec<EventAction>,
    }

    impl EventHandler for Recorder {
        fn handle_event(&mut self, event: &EventData, _queue: &mut EventQueue) {
            self.seen.push(event.action());
        }
    }

    #[test]
    fn component_handler_receives_events() {
        let mut dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder { seen: Vec::new() }));
        dispatcher.subscribe_handler(EventCategory::Menu, &recorder);

        dispatcher.publish(pause());
        dispatcher.update();

        assert_eq!(recorder.borrow().seen, vec![EventAction::OnPause]);
    }

    #[test]
    fn dropped_component_is_pruned() {
        let mut dispatcher = EventDispatcher::new();
        let recorder = Rc::new(RefCell::new(Recorder { seen: Vec::new() }));
        dispatcher.subscribe_handler(EventCategory::Menu, &recorder);
        drop(recorder);

        dispatcher.publish(pause());
        dispatcher.update();

        assert_eq!(dispatcher.subscriber_count(EventCategory::Menu), 0);
    }
}
