//! Explicit observer registration for the slider value.
//!
//! Replaces the host framework's implicit reactive dependency tracking with a
//! session-scoped publish/subscribe cell: the slider publishes its current
//! pair, and the filter effect subscribes. Delivery guarantees:
//!
//! * every observer is notified exactly once, synchronously, per value
//!   change,
//! * every observer is notified at least once at session start (subscribing
//!   delivers the current value immediately),
//! * publishing an unchanged value delivers nothing.
//!
//! Each session owns its bus, and the session's callbacks run on a single
//! thread, so no synchronization is needed.

type Observer<T> = Box<dyn FnMut(&T)>;

/// A single mutable value with change observers.
pub struct ValueBus<T> {
    current: T,
    observers: Vec<Observer<T>>,
}

impl<T: PartialEq> ValueBus<T> {
    /// Creates a bus holding the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            observers: Vec::new(),
        }
    }

    /// The value most recently published.
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Registers an observer and immediately delivers the current value to
    /// it.
    pub fn subscribe(&mut self, mut observer: impl FnMut(&T) + 'static) {
        observer(&self.current);
        self.observers.push(Box::new(observer));
    }

    /// Publishes a new value, notifying every observer once if the value
    /// differs from the current one.
    pub fn publish(&mut self, value: T) {
        if value == self.current {
            return;
        }

        self.current = value;
        for observer in &mut self.observers {
            observer(&self.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recording_bus(initial: u16) -> (ValueBus<u16>, Rc<RefCell<Vec<u16>>>) {
        let mut bus = ValueBus::new(initial);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.subscribe(move |value| sink.borrow_mut().push(*value));
        (bus, seen)
    }

    #[test]
    fn subscribing_delivers_the_current_value() {
        let (_bus, seen) = recording_bus(7);
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn each_change_is_delivered_exactly_once() {
        let (mut bus, seen) = recording_bus(0);
        bus.publish(1);
        bus.publish(2);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn unchanged_values_are_not_redelivered() {
        let (mut bus, seen) = recording_bus(5);
        bus.publish(5);
        assert_eq!(*seen.borrow(), vec![5]);
        assert_eq!(*bus.current(), 5);
    }

    #[test]
    fn all_observers_see_changes_in_publish_order() {
        let (mut bus, first) = recording_bus(0);
        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = second.clone();
        bus.subscribe(move |value| sink.borrow_mut().push(*value));

        bus.publish(3);
        bus.publish(9);

        assert_eq!(*first.borrow(), vec![0, 3, 9]);
        assert_eq!(*second.borrow(), vec![0, 3, 9]);
    }
}
