//! Single-value view state.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::Observable;
use crate::combine::Publisher;

struct StateInner<T> {
    value: RwLock<T>,
    publisher: Publisher,
    name: Option<&'static str>,
}

/// A single mutable value whose every write notifies its publisher.
///
/// The cell belongs to the view that declares it. Cloning yields another
/// handle to the same value so callbacks can mutate it; the value itself is
/// never copied.
pub struct StateCell<T> {
    inner: Arc<StateInner<T>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync> StateCell<T> {
    pub fn new(value: T) -> Self {
        Self::build(value, None)
    }

    /// Create a cell whose signals carry `name` as the changed field.
    pub fn named(name: &'static str, value: T) -> Self {
        Self::build(value, Some(name))
    }

    fn build(value: T, name: Option<&'static str>) -> Self {
        Self {
            inner: Arc::new(StateInner {
                value: RwLock::new(value),
                publisher: Publisher::new(),
                name,
            }),
        }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.value.read().clone()
    }

    /// Read the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.value.read())
    }

    /// Replace the value and notify.
    pub fn set(&self, value: T) {
        *self.inner.value.write() = value;
        self.inner.publisher.notify(self.inner.name);
    }

    /// Replace the value, returning the previous one, and notify.
    pub fn replace(&self, value: T) -> T {
        let previous = std::mem::replace(&mut *self.inner.value.write(), value);
        self.inner.publisher.notify(self.inner.name);
        previous
    }

    /// Mutate the value in place and notify.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut *self.inner.value.write());
        self.inner.publisher.notify(self.inner.name);
        result
    }
}

impl<T: Send + Sync> Observable for StateCell<T> {
    fn publisher(&self) -> &Publisher {
        &self.inner.publisher
    }
}

impl<T: fmt::Debug> fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &*self.inner.value.read())
            .field("publisher", &self.inner.publisher.id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combine::Signal;
    use parking_lot::Mutex;

    fn counting(cell: &StateCell<i32>) -> (Arc<Mutex<Vec<Signal>>>, crate::combine::Subscription, Arc<impl crate::combine::Subscriber>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            Arc::new(move |signal: &Signal| seen.lock().push(signal.clone()))
        };
        let sub = cell.publisher().attach(&sink);
        (seen, sub, sink)
    }

    #[test]
    fn test_set_notifies() {
        let cell = StateCell::new(1);
        let (seen, _sub, _sink) = counting(&cell);

        cell.set(2);

        assert_eq!(cell.get(), 2);
        assert_eq!(seen.lock().len(), 1);
    }

    #[test]
    fn test_update_and_replace_notify() {
        let cell = StateCell::named("count", 10);
        let (seen, _sub, _sink) = counting(&cell);

        cell.update(|v| *v += 5);
        let previous = cell.replace(0);

        assert_eq!(previous, 15);
        assert_eq!(cell.get(), 0);
        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|s| s.field == Some("count")));
    }

    #[test]
    fn test_clones_share_value() {
        let cell = StateCell::new(String::from("a"));
        let handle = cell.clone();
        handle.set(String::from("b"));
        assert_eq!(cell.with(|v| v.clone()), "b");
        assert_eq!(cell.publisher().id(), handle.publisher().id());
    }

    #[test]
    fn test_subscriber_can_read_during_notification() {
        let cell = StateCell::new(0);
        let observed = Arc::new(Mutex::new(Vec::new()));
        let reader = {
            let cell = cell.clone();
            let observed = Arc::clone(&observed);
            Arc::new(move |_: &Signal| observed.lock().push(cell.get()))
        };
        let _sub = cell.publisher().attach(&reader);

        cell.set(7);
        cell.set(8);

        assert_eq!(*observed.lock(), vec![7, 8]);
    }
}
