//! Subjects: publishers with a manual injection point.

use super::publisher::{Publisher, Signal, Subscriber};

/// A publisher that also accepts manually injected signals via [`upstream`].
///
/// [`upstream`]: Subject::upstream
#[derive(Debug, Clone, Default)]
pub struct Subject {
    publisher: Publisher,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    /// Inject a signal; it is broadcast to every subscriber unchanged.
    pub fn upstream(&self, signal: &Signal) {
        self.publisher.downstream(signal);
    }

    /// Inject a signal stamped with this subject as its origin.
    pub fn send(&self, field: Option<&'static str>) {
        self.publisher.notify(field);
    }
}

/// A subject that, when attached to another publisher, relays every signal it
/// receives as its own output.
///
/// Wiring a nested observable into an enclosing one costs a single
/// indirection: attach the relay to the child's publisher and subscribers of
/// the relay see every child change.
#[derive(Debug, Clone, Default)]
pub struct PassThroughSubject {
    subject: Subject,
}

impl PassThroughSubject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn publisher(&self) -> &Publisher {
        self.subject.publisher()
    }
}

impl Subscriber for PassThroughSubject {
    fn receive(&self, signal: &Signal) {
        self.subject.upstream(signal);
    }
}
