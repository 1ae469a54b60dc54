//! Declarative views.
//!
//! A [`View`] is rebuilt from scratch on every render cycle. It describes a
//! [`Message`] (content, embeds, rows of items) and registers the observables
//! it reads on the [`BuildContext`], which is how its tracker knows what to
//! subscribe to.

mod layout;
mod message;

use std::collections::HashSet;

use crate::combine::{Publisher, PublisherId};
use crate::observable::Observable;

pub use layout::{reify_message, ActionRow, LayoutError, RenderedComponent, RenderedMessage, RenderedSnapshot};
pub(crate) use layout::Route;
pub use message::{Embed, EmbedField, Message};

/// User-authored view.
///
/// `body` is re-invoked with the current state on every cycle and must not
/// mutate observed state.
pub trait View: Send + Sync {
    fn body(&self, cx: &mut BuildContext) -> Message;
}

impl<F> View for F
where
    F: Fn(&mut BuildContext) -> Message + Send + Sync,
{
    fn body(&self, cx: &mut BuildContext) -> Message {
        self(cx)
    }
}

/// Collects the observables a view reads while building.
#[derive(Debug, Default)]
pub struct BuildContext {
    seen: HashSet<PublisherId>,
    observed: Vec<Publisher>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe the tracker to `observable`. Registering the same
    /// observable twice is harmless.
    pub fn observe<O: Observable + ?Sized>(&mut self, observable: &O) -> &mut Self {
        let publisher = observable.publisher();
        if self.seen.insert(publisher.id()) {
            self.observed.push(publisher.clone());
        }
        self
    }

    pub fn observed(&self) -> &[Publisher] {
        &self.observed
    }

    pub(crate) fn into_observed(self) -> Vec<Publisher> {
        self.observed
    }
}
