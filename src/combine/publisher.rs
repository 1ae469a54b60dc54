//! One-to-many change broadcaster.
//!
//! Subscribers are held through `Weak` references: a publisher never keeps a
//! subscriber alive. Dead entries are pruned lazily at the start of each
//! dispatch.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

static NEXT_PUBLISHER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublisherId(u64);

impl fmt::Display for PublisherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pub#{}", self.0)
    }
}

/// Identity of one attachment to a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// A change notification travelling from an observable to its subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    /// Publisher that first emitted the signal. Relays keep it unchanged.
    pub origin: PublisherId,
    /// Name of the published attribute that changed, when known.
    pub field: Option<&'static str>,
}

/// Receiver side of a publisher.
///
/// `receive` is invoked synchronously on the mutating thread. Implementations
/// must not block; they may attach or detach subscribers re-entrantly.
pub trait Subscriber: Send + Sync {
    fn receive(&self, signal: &Signal);
}

impl<F> Subscriber for F
where
    F: Fn(&Signal) + Send + Sync,
{
    fn receive(&self, signal: &Signal) {
        self(signal)
    }
}

struct Entry {
    id: SubscriberId,
    target: Weak<dyn Subscriber>,
}

struct PublisherInner {
    id: PublisherId,
    next_subscriber: AtomicU64,
    subscribers: Mutex<Vec<Entry>>,
}

impl PublisherInner {
    fn remove(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|entry| entry.id != id);
        subscribers.len() != before
    }
}

/// Ordered one-to-many broadcaster.
///
/// Cloning a `Publisher` creates a new handle to the same subscriber list.
#[derive(Clone)]
pub struct Publisher {
    inner: Arc<PublisherInner>,
}

impl Publisher {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                id: PublisherId(NEXT_PUBLISHER_ID.fetch_add(1, Ordering::Relaxed)),
                next_subscriber: AtomicU64::new(1),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> PublisherId {
        self.inner.id
    }

    /// Register a subscriber. Only a weak reference is retained.
    ///
    /// The returned [`Subscription`] detaches the subscriber when dropped.
    pub fn attach<S>(&self, subscriber: &Arc<S>) -> Subscription
    where
        S: Subscriber + 'static,
    {
        let id = SubscriberId(self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed));
        let target: Weak<dyn Subscriber> = Arc::downgrade(subscriber) as Weak<dyn Subscriber>;
        self.inner.subscribers.lock().push(Entry { id, target });
        Subscription {
            publisher: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Remove a subscriber. Returns false if it was not attached.
    pub fn detach(&self, id: SubscriberId) -> bool {
        self.inner.remove(id)
    }

    /// Number of subscribers that are still alive.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .lock()
            .iter()
            .filter(|entry| entry.target.strong_count() > 0)
            .count()
    }

    /// Broadcast `signal` to every live subscriber in subscription order.
    ///
    /// The subscriber list is snapshotted before the first delivery, so
    /// subscribers attached or detached during dispatch take effect on the
    /// next broadcast.
    pub fn downstream(&self, signal: &Signal) {
        let targets: Vec<Arc<dyn Subscriber>> = {
            let mut subscribers = self.inner.subscribers.lock();
            subscribers.retain(|entry| entry.target.strong_count() > 0);
            subscribers
                .iter()
                .filter_map(|entry| entry.target.upgrade())
                .collect()
        };

        tracing::trace!(
            publisher = %self.inner.id,
            origin = %signal.origin,
            subscribers = targets.len(),
            "Broadcasting change"
        );

        for target in targets {
            target.receive(signal);
        }
    }

    /// Broadcast a signal originating from this publisher.
    pub fn notify(&self, field: Option<&'static str>) {
        self.downstream(&Signal {
            origin: self.inner.id,
            field,
        });
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("id", &self.inner.id)
            .field("subscribers", &self.inner.subscribers.lock().len())
            .finish()
    }
}

/// RAII guard for an attachment. Dropping it detaches the subscriber.
#[must_use = "dropping a Subscription detaches the subscriber immediately"]
pub struct Subscription {
    publisher: Weak<PublisherInner>,
    id: SubscriberId,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Whether the publisher this subscription points at still exists.
    pub fn is_live(&self) -> bool {
        self.publisher.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.publisher.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}
