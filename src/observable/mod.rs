//! Mutable observable state.
//!
//! - [`StateCell`]: a single value owned by a view, with a change hook
//! - [`ObservableObject`]: owner of [`Published`] attributes and a publisher;
//!   nested objects are chained through a pass-through relay
//!
//! Every write notifies synchronously. Views register what they read through
//! [`BuildContext::observe`](crate::view::BuildContext::observe), which is how
//! a tracker discovers what to attach to.

mod object;
mod state;

use std::sync::Arc;

use crate::combine::Publisher;

pub use object::{ObservableObject, Published};
pub use state::StateCell;

/// Anything exposing a publisher that fires on mutation.
pub trait Observable: Send + Sync {
    fn publisher(&self) -> &Publisher;
}

impl<T: Observable + ?Sized> Observable for Arc<T> {
    fn publisher(&self) -> &Publisher {
        (**self).publisher()
    }
}

impl Observable for Publisher {
    fn publisher(&self) -> &Publisher {
        self
    }
}
