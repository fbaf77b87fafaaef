//! Locomotion events
//!
//! Lifecycle notifications for cameras, effects and audio. Delivery is
//! synchronous and ordered: subscribers run in subscription order, inside
//! the tick that caused the transition.

use std::fmt;

/// Locomotion lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionEvent {
    /// Ground jump
    Jump,
    /// Air jump
    DoubleJump,
    StartWallRun,
    EndWallRun,
    /// Entered walking (landing or stepping off a wall onto ground)
    StartWalking,
}

impl fmt::Display for LocomotionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocomotionEvent::Jump => "jump",
            LocomotionEvent::DoubleJump => "double_jump",
            LocomotionEvent::StartWallRun => "start_wallrun",
            LocomotionEvent::EndWallRun => "end_wallrun",
            LocomotionEvent::StartWalking => "start_walking",
        };
        f.write_str(name)
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type EventCallback = Box<dyn FnMut(LocomotionEvent)>;
type TiltCallback = Box<dyn FnMut(f32)>;

/// Ordered observer list for events plus the camera tilt sinks.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, EventCallback)>,
    tilt_sinks: Vec<(SubscriptionId, TiltCallback)>,
    next_id: u32,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("tilt_sinks", &self.tilt_sinks.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Add an event subscriber. It runs after all earlier subscribers.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(LocomotionEvent) + 'static,
    {
        let id = self.allocate_id();
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Add a camera tilt sink, called once per tick.
    pub fn subscribe_tilt<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(f32) + 'static,
    {
        let id = self.allocate_id();
        self.tilt_sinks.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber or tilt sink. Returns `false` if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len() + self.tilt_sinks.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.tilt_sinks.retain(|(sid, _)| *sid != id);
        before != self.subscribers.len() + self.tilt_sinks.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn emit(&mut self, event: LocomotionEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    pub fn emit_tilt(&mut self, tilt: f32) {
        for (_, sink) in &mut self.tilt_sinks {
            sink(tilt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();

        let first = Rc::clone(&log);
        bus.subscribe(move |e| first.borrow_mut().push((1, e)));
        let second = Rc::clone(&log);
        bus.subscribe(move |e| second.borrow_mut().push((2, e)));

        bus.emit(LocomotionEvent::Jump);
        bus.emit(LocomotionEvent::StartWalking);

        assert_eq!(
            *log.borrow(),
            vec![
                (1, LocomotionEvent::Jump),
                (2, LocomotionEvent::Jump),
                (1, LocomotionEvent::StartWalking),
                (2, LocomotionEvent::StartWalking),
            ]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);

        bus.emit(LocomotionEvent::DoubleJump);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(LocomotionEvent::DoubleJump);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_tilt_sink() {
        let last = Rc::new(RefCell::new(None));
        let mut bus = EventBus::new();
        let l = Rc::clone(&last);
        bus.subscribe_tilt(move |t| *l.borrow_mut() = Some(t));

        bus.emit(LocomotionEvent::Jump);
        assert_eq!(*last.borrow(), None);
        bus.emit_tilt(0.25);
        assert_eq!(*last.borrow(), Some(0.25));
    }

    #[test]
    fn test_event_display() {
        assert_eq!(LocomotionEvent::StartWallRun.to_string(), "start_wallrun");
        assert_eq!(format!("{}", LocomotionEvent::EndWallRun), "end_wallrun");
    }
}
