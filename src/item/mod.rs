//! Declarative items and their reification into dispatchable nodes.
//!
//! An item is a fluent builder. [`Item::reify`] compiles a builder snapshot
//! plus the ambient row chosen by the layout pass into exactly one [`Node`]:
//! the visible [`Component`] (the diff key) and the [`Handler`] that runs when
//! a client event hits it.

mod button;
mod modal;
mod select;

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::event::EventContext;
use crate::transport::Interaction;

pub use button::{Button, ButtonSpec, ButtonStyle, LinkButton};
pub use modal::{FieldValue, Modal, ModalSpec, TextInput, TextInputStyle};
pub use select::{Select, SelectKind, SelectOption, SelectSpec};

pub(crate) use modal::collect_submission;
pub(crate) use select::coerce_selection;

/// Boxed future returned by callbacks.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// User callback run for a client event.
pub type Callback = Arc<dyn Fn(EventContext) -> BoxFuture<anyhow::Result<()>> + Send + Sync>;

/// Predicate gating whether an event reaches the callback. An `Err` is fatal
/// for that dispatch.
pub type Guard = Arc<dyn Fn(&dyn Interaction) -> anyhow::Result<bool> + Send + Sync>;

pub(crate) fn callback<F, Fut>(f: F) -> Callback
where
    F: Fn(EventContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |ctx: EventContext| -> BoxFuture<anyhow::Result<()>> { Box::pin(f(ctx)) })
}

pub(crate) fn guard<F>(f: F) -> Guard
where
    F: Fn(&dyn Interaction) -> bool + Send + Sync + 'static,
{
    Arc::new(move |interaction: &dyn Interaction| Ok(f(interaction)))
}

pub(crate) fn fallible_guard<F>(f: F) -> Guard
where
    F: Fn(&dyn Interaction) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Explicit row on the item wins over the ambient row.
pub fn resolve_row(explicit: Option<usize>, ambient: usize) -> usize {
    explicit.unwrap_or(ambient)
}

/// Visible attributes of a rendered control. Equality over this type is the
/// diff key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Component {
    Button(ButtonSpec),
    Select(SelectSpec),
}

impl Component {
    pub fn row(&self) -> usize {
        match self {
            Component::Button(spec) => spec.row,
            Component::Select(spec) => spec.row,
        }
    }

    /// Explicit identifier set on the builder, if any.
    pub fn custom_id(&self) -> Option<&str> {
        match self {
            Component::Button(spec) => spec.custom_id.as_deref(),
            Component::Select(spec) => spec.custom_id.as_deref(),
        }
    }

    /// Slots occupied in a row. A row holds five slots.
    pub fn width(&self) -> usize {
        match self {
            Component::Button(_) => 1,
            Component::Select(_) => 5,
        }
    }

    /// Link buttons navigate client-side and never raise events.
    pub fn is_routable(&self) -> bool {
        !matches!(
            self,
            Component::Button(ButtonSpec {
                style: ButtonStyle::Link,
                ..
            })
        )
    }
}

/// Behavior attached to a node.
#[derive(Clone, Default)]
pub struct Handler {
    pub(crate) callback: Option<Callback>,
    pub(crate) guard: Option<Guard>,
    pub(crate) modal: Option<Modal>,
}

impl Handler {
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub fn has_modal(&self) -> bool {
        self.modal.is_some()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("callback", &self.callback.is_some())
            .field("guard", &self.guard.is_some())
            .field("modal", &self.modal.as_ref().map(Modal::title))
            .finish()
    }
}

/// A reified item: what to draw plus what to run.
#[derive(Debug, Clone)]
pub struct Node {
    pub component: Component,
    pub handler: Handler,
}

/// Nodes compare by their visible component only.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.component == other.component
    }
}

/// A declarative control.
pub trait Item: Send + Sync {
    /// Compile this builder into a node. Must be pure: the same builder and
    /// ambient row always produce equal nodes.
    fn reify(&self, ambient_row: usize) -> Node;
}

impl<I: Item + ?Sized> Item for Box<I> {
    fn reify(&self, ambient_row: usize) -> Node {
        (**self).reify(ambient_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_row_prefers_explicit() {
        assert_eq!(resolve_row(Some(2), 0), 2);
        assert_eq!(resolve_row(Some(0), 3), 0);
        assert_eq!(resolve_row(None, 3), 3);
    }

    #[test]
    fn test_link_buttons_are_not_routable() {
        let link = LinkButton::new("https://example.com", "docs").reify(0);
        let plain = Button::new("go").reify(0);
        assert!(!link.component.is_routable());
        assert!(plain.component.is_routable());
    }

    #[test]
    fn test_component_width() {
        assert_eq!(Button::new("a").reify(0).component.width(), 1);
        assert_eq!(Select::new().reify(0).component.width(), 5);
    }
}
