//! Delivery strategies.
//!
//! A [`Provider`] hides whether a view lives in a persistent channel message
//! ([`MessageProvider`]) or in the response to a client event
//! ([`InteractionProvider`]). Both keep the handle produced by the first
//! send and reuse it for every edit.

mod interaction;
mod message;

use std::sync::Arc;

use async_trait::async_trait;

use crate::transport::{Interaction, MessageHandle, TransportError};
use crate::view::RenderedMessage;

pub use interaction::InteractionProvider;
pub use message::MessageProvider;

/// Send/edit contract shared by every delivery strategy.
///
/// Failures are returned as-is; providers never retry.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Deliver a new message.
    async fn send(&mut self, message: &RenderedMessage) -> Result<MessageHandle, TransportError>;

    /// Replace the previously sent message.
    ///
    /// Returns [`TransportError::StaleHandle`] if nothing was sent yet.
    async fn edit(&mut self, message: &RenderedMessage) -> Result<MessageHandle, TransportError>;

    /// Swap in the event of the latest client round trip.
    fn update_interaction(&mut self, _interaction: Arc<dyn Interaction>) {}

    /// Handle of the delivered message, once sent.
    fn handle(&self) -> Option<&MessageHandle>;

    fn name(&self) -> &'static str;
}
