//! Change notification
//!
//! Observers register a callback and are invoked with a read-only view of
//! the subject after every state-changing operation. Callbacks receive a
//! shared reference only, so they cannot re-enter mutating operations.

use std::fmt;

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<S> = Box<dyn FnMut(&S) + Send>;

/// Ordered list of change observers
pub struct ChangeNotifier<S: ?Sized> {
    observers: Vec<(SubscriptionId, Observer<S>)>,
    next_id: u64,
}

impl<S: ?Sized> ChangeNotifier<S> {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register an observer; it is called after every announced change
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Invoke every observer in registration order
    pub fn announce(&mut self, subject: &S) {
        for (_, observer) in &mut self.observers {
            observer(subject);
        }
    }

    /// Number of registered observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Check if no observers are registered
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<S: ?Sized> Default for ChangeNotifier<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for ChangeNotifier<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn observers_called_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut notifier: ChangeNotifier<u32> = ChangeNotifier::new();

        let first = Arc::clone(&log);
        notifier.subscribe(move |value: &u32| first.lock().unwrap().push(("first", *value)));
        let second = Arc::clone(&log);
        notifier.subscribe(move |value: &u32| second.lock().unwrap().push(("second", *value)));

        notifier.announce(&7);

        assert_eq!(*log.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Arc::new(Mutex::new(0));
        let mut notifier: ChangeNotifier<()> = ChangeNotifier::default();

        let counter = Arc::clone(&count);
        let id = notifier.subscribe(move |_| *counter.lock().unwrap() += 1);

        notifier.announce(&());
        assert!(notifier.unsubscribe(id));
        notifier.announce(&());

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(notifier.is_empty());
        assert!(!notifier.unsubscribe(id));
    }

    #[test]
    fn ids_are_unique() {
        let mut notifier: ChangeNotifier<()> = ChangeNotifier::new();
        let a = notifier.subscribe(|_| {});
        let b = notifier.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(notifier.len(), 2);
    }
}
