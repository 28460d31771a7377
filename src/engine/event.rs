use crate::engine::Point;
use log::warn;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Event names shared between the engine and its collaborators. Other parts of
/// the shell subscribe by these exact strings, so treat them as a contract.
pub mod names {
    pub const RESIZE: &str = "resize";
    pub const ORIENTATION_CHANGE: &str = "orientationChange";
    pub const TICK: &str = "tick";
    pub const FIXED_UPDATE_TICK: &str = "fixedUpdateTick";
    pub const READY: &str = "ready";
    pub const FIRST_CLICK: &str = "firstClick";
    pub const POINTER_DOWN: &str = "pointerDown";
    pub const POINTER_UP: &str = "pointerUp";
    pub const POINTER_MOVE: &str = "pointerMove";
    pub const SCENE_CHANGED: &str = "sceneChanged";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// The single optional value handed to every subscriber of an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Resize {
        width: f64,
        height: f64,
        pixel_ratio: f64,
    },
    Orientation(Orientation),
    Delta {
        delta_ms: f64,
    },
    Pointer(Point),
    Scene(String),
}

type Callback = Rc<RefCell<dyn FnMut(Option<&EventPayload>)>>;

static NEXT_BUS: AtomicU64 = AtomicU64::new(0);

/// Opaque handle returned by [`EventBus::on`], the only way to unsubscribe.
/// It only ever matches on the bus that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    event: String,
    bus: u64,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }
}

struct Subscriber {
    id: u64,
    callback: Callback,
}

/// Named publish/subscribe bus.
///
/// ELI5: a notice board with one column per event name
/// ┌──────────────┬──────────────────────────────────────┐
/// │ "tick"       │ [ engine, scene manager, fps ... ]   │
/// │ "resize"     │ [ renderer, camera ... ]             │
/// └──────────────┴──────────────────────────────────────┘
/// - `on`      pins a callback at the bottom of a column
/// - `trigger` reads the column top to bottom, right now, on this thread
/// - `off`     unpins by handle, an empty column is removed entirely
///
/// Dispatch walks a snapshot of the column, so a subscriber may subscribe,
/// unsubscribe or trigger other events while it runs. A panicking subscriber
/// aborts the rest of the dispatch.
pub struct EventBus {
    id: u64,
    events: RefCell<HashMap<String, Vec<Subscriber>>>,
    next_id: Cell<u64>,
}

impl EventBus {
    pub fn new() -> Self {
        EventBus {
            id: NEXT_BUS.fetch_add(1, Ordering::Relaxed),
            events: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn on<F>(&self, event: &str, callback: F) -> Subscription
    where
        F: FnMut(Option<&EventPayload>) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.events
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Subscriber {
                id,
                callback: Rc::new(RefCell::new(callback)),
            });
        Subscription {
            event: event.to_string(),
            bus: self.id,
            id,
        }
    }

    /// Removing an unknown or already removed subscription is a no-op, as is
    /// a handle issued by another bus.
    pub fn off(&self, subscription: &Subscription) {
        if subscription.bus != self.id {
            return;
        }
        let mut events = self.events.borrow_mut();
        let Some(subscribers) = events.get_mut(&subscription.event) else {
            return;
        };
        subscribers.retain(|subscriber| subscriber.id != subscription.id);
        if subscribers.is_empty() {
            events.remove(&subscription.event);
        }
    }

    pub fn trigger(&self, event: &str, payload: Option<&EventPayload>) {
        // snapshot, then release the borrow before calling out
        let callbacks: Vec<Callback> = match self.events.borrow().get(event) {
            Some(subscribers) => subscribers
                .iter()
                .map(|subscriber| Rc::clone(&subscriber.callback))
                .collect(),
            None => return,
        };

        for callback in callbacks {
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(payload),
                Err(_) => warn!("EventBus: skipped re-entrant '{}' subscriber", event),
            }
        }
    }

    pub fn clear(&self, event: &str) {
        self.events.borrow_mut().remove(event);
    }

    pub fn clear_all(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.events.borrow().contains_key(event)
    }

    pub fn subscriber_count(&self, event: &str) -> usize {
        self.events.borrow().get(event).map_or(0, Vec::len)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn FnMut(Option<&EventPayload>)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let shared = Rc::clone(&log);
        let make = move |tag: &str| {
            let log = Rc::clone(&shared);
            let tag = tag.to_string();
            Box::new(move |_: Option<&EventPayload>| log.borrow_mut().push(tag.clone()))
                as Box<dyn FnMut(Option<&EventPayload>)>
        };
        (log, make)
    }

    #[test]
    fn trigger_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.trigger("never-subscribed", None);
        bus.trigger(names::TICK, Some(&EventPayload::Delta { delta_ms: 16.0 }));
        assert!(!bus.has_event("never-subscribed"));
    }

    #[test]
    fn dispatch_follows_registration_order() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        bus.on("ready", make("first"));
        bus.on("ready", make("second"));
        bus.on("ready", make("third"));

        bus.trigger("ready", None);

        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn payload_reaches_subscriber() {
        let bus = EventBus::new();
        let seen = Rc::new(Cell::new(0.0));
        let sink = Rc::clone(&seen);
        bus.on(names::TICK, move |payload| {
            if let Some(EventPayload::Delta { delta_ms }) = payload {
                sink.set(*delta_ms);
            }
        });

        bus.trigger(names::TICK, Some(&EventPayload::Delta { delta_ms: 33.0 }));

        assert_eq!(seen.get(), 33.0);
    }

    #[test]
    fn off_is_idempotent_and_drops_empty_events() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let a = bus.on("resize", make("a"));
        let b = bus.on("resize", make("b"));

        bus.off(&a);
        bus.off(&a);
        assert_eq!(bus.subscriber_count("resize"), 1);

        bus.off(&b);
        assert!(!bus.has_event("resize"));

        // a fresh subscription starts a fresh list
        bus.on("resize", make("c"));
        bus.trigger("resize", None);
        assert_eq!(*log.borrow(), vec!["c"]);
    }

    #[test]
    fn off_with_handle_for_unknown_event_does_nothing() {
        let bus = EventBus::new();
        let other = EventBus::new();
        let handle = other.on("tick", |_| {});
        bus.off(&handle);
        assert_eq!(other.subscriber_count("tick"), 1);
    }

    #[test]
    fn handle_from_another_bus_leaves_this_bus_alone() {
        let bus = EventBus::new();
        let other = EventBus::new();
        let (log, make) = recorder();
        // both buses hand out id 0 for their first subscriber
        bus.on("tick", make("mine"));
        let foreign = other.on("tick", make("theirs"));

        bus.off(&foreign);

        assert_eq!(bus.subscriber_count("tick"), 1);
        bus.trigger("tick", None);
        assert_eq!(*log.borrow(), vec!["mine"]);
    }

    #[test]
    fn clear_and_clear_all() {
        let bus = EventBus::new();
        bus.on("a", |_| {});
        bus.on("b", |_| {});
        bus.clear("a");
        assert!(!bus.has_event("a"));
        assert!(bus.has_event("b"));
        bus.clear_all();
        assert!(!bus.has_event("b"));
    }

    #[test]
    fn subscriber_may_unsubscribe_itself_during_dispatch() {
        let bus = Rc::new(EventBus::new());
        let count = Rc::new(Cell::new(0));
        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let inner_bus = Rc::clone(&bus);
        let inner_handle = Rc::clone(&handle);
        let inner_count = Rc::clone(&count);
        let subscription = bus.on(names::FIRST_CLICK, move |_| {
            inner_count.set(inner_count.get() + 1);
            if let Some(handle) = inner_handle.borrow_mut().take() {
                inner_bus.off(&handle);
            }
        });
        *handle.borrow_mut() = Some(subscription);

        bus.trigger(names::FIRST_CLICK, None);
        bus.trigger(names::FIRST_CLICK, None);

        assert_eq!(count.get(), 1);
        assert!(!bus.has_event(names::FIRST_CLICK));
    }

    #[test]
    fn reentrant_trigger_skips_running_subscriber() {
        let bus = Rc::new(EventBus::new());
        let count = Rc::new(Cell::new(0));
        let inner_bus = Rc::clone(&bus);
        let inner_count = Rc::clone(&count);
        bus.on("loop", move |_| {
            inner_count.set(inner_count.get() + 1);
            inner_bus.trigger("loop", None);
        });

        bus.trigger("loop", None);

        assert_eq!(count.get(), 1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            On,
            Off(usize),
            Trigger,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                Just(Op::On),
                (0usize..16).prop_map(Op::Off),
                Just(Op::Trigger),
            ]
        }

        proptest! {
            #[test]
            fn dispatch_matches_a_list_of_live_handlers(ops in prop::collection::vec(op(), 1..60)) {
                let bus = EventBus::new();
                let fired = Rc::new(RefCell::new(Vec::new()));
                // every handle ever issued, in order, with its label
                let mut issued: Vec<(usize, Subscription)> = Vec::new();
                let mut live: Vec<usize> = Vec::new();

                for op in ops {
                    match op {
                        Op::On => {
                            let label = issued.len();
                            let sink = Rc::clone(&fired);
                            let handle = bus.on("event", move |_| sink.borrow_mut().push(label));
                            issued.push((label, handle));
                            live.push(label);
                        }
                        Op::Off(index) => {
                            // may name a handle that is already gone
                            if let Some((label, handle)) = issued.get(index) {
                                bus.off(handle);
                                live.retain(|l| l != label);
                            }
                        }
                        Op::Trigger => {
                            fired.borrow_mut().clear();
                            bus.trigger("event", None);
                            let seen = fired.borrow().clone();
                            prop_assert_eq!(&seen, &live);
                        }
                    }
                    prop_assert_eq!(bus.subscriber_count("event"), live.len());
                    prop_assert_eq!(bus.has_event("event"), !live.is_empty());
                }
            }
        }
    }
}
