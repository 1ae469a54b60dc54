//! Observable objects with published attributes.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::Observable;
use crate::combine::{PassThroughSubject, Publisher, Subscriber, SubscriberId, Subscription};

/// Owner of a publisher shared by its [`Published`] attributes.
///
/// Embed one in a struct, create the struct's attributes through
/// [`published`](ObservableObject::published), and implement [`Observable`]
/// by returning [`publisher`](ObservableObject::publisher):
///
/// ```
/// use chatview::combine::Publisher;
/// use chatview::observable::{Observable, ObservableObject, Published};
///
/// struct Cart {
///     object: ObservableObject,
///     items: Published<Vec<String>>,
/// }
///
/// impl Cart {
///     fn new() -> Self {
///         let object = ObservableObject::new();
///         let items = object.published("items", Vec::new());
///         Self { object, items }
///     }
/// }
///
/// impl Observable for Cart {
///     fn publisher(&self) -> &Publisher {
///         self.object.publisher()
///     }
/// }
///
/// let cart = Cart::new();
/// cart.items.update(|items| items.push("apple".into()));
/// assert_eq!(cart.items.get(), vec!["apple".to_string()]);
/// ```
pub struct ObservableObject {
    relay: Arc<PassThroughSubject>,
    links: Mutex<Vec<Subscription>>,
}

impl ObservableObject {
    pub fn new() -> Self {
        Self {
            relay: Arc::new(PassThroughSubject::new()),
            links: Mutex::new(Vec::new()),
        }
    }

    pub fn publisher(&self) -> &Publisher {
        self.relay.publisher()
    }

    /// Create an attribute whose writes notify this object's subscribers.
    pub fn published<T: Send + Sync>(&self, name: &'static str, initial: T) -> Published<T> {
        Published {
            value: RwLock::new(initial),
            publisher: self.publisher().clone(),
            name,
        }
    }

    /// Chain a nested observable: its changes are relayed as this object's.
    ///
    /// The link lives as long as this object.
    pub fn nest(&self, child: &dyn Observable) {
        let link = child.publisher().attach(&self.relay);
        self.links.lock().push(link);
    }

    pub fn attach<S>(&self, subscriber: &Arc<S>) -> Subscription
    where
        S: Subscriber + 'static,
    {
        self.publisher().attach(subscriber)
    }

    pub fn detach(&self, id: SubscriberId) -> bool {
        self.publisher().detach(id)
    }

    /// Notify subscribers without writing any attribute.
    pub fn send_change(&self) {
        self.relay.subject().send(None);
    }
}

impl Default for ObservableObject {
    fn default() -> Self {
        Self::new()
    }
}

impl Observable for ObservableObject {
    fn publisher(&self) -> &Publisher {
        self.relay.publisher()
    }
}

impl fmt::Debug for ObservableObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableObject")
            .field("publisher", self.publisher())
            .field("nested", &self.links.lock().len())
            .finish()
    }
}

/// An attribute of an [`ObservableObject`]; every write fires the owner's
/// publisher with the attribute name as the changed field.
pub struct Published<T> {
    value: RwLock<T>,
    publisher: Publisher,
    name: &'static str,
}

impl<T: Send + Sync> Published<T> {
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.read().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.value.read())
    }

    pub fn set(&self, value: T) {
        *self.value.write() = value;
        self.publisher.notify(Some(self.name));
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut *self.value.write());
        self.publisher.notify(Some(self.name));
        result
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: fmt::Debug> fmt::Debug for Published<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Published")
            .field("name", &self.name)
            .field("value", &*self.value.read())
            .finish()
    }
}
