//! Signal broadcasting primitives.
//!
//! # Architecture
//!
//! ```text
//! Published / StateCell ──→ Publisher ──→ Subscriber (ViewTracker)
//!                              ↑
//!        child Publisher ──→ PassThroughSubject
//! ```
//!
//! - **Publisher**: ordered one-to-many broadcaster holding weak subscribers
//! - **Subject**: a publisher that accepts manually injected signals
//! - **PassThroughSubject**: relays an upstream signal unchanged, used to
//!   chain a nested observable into the enclosing one

mod publisher;
mod subject;

pub use publisher::{Publisher, PublisherId, Signal, Subscriber, SubscriberId, Subscription};
pub use subject::{PassThroughSubject, Subject};
