use std::sync::Arc;

use async_trait::async_trait;

use super::Provider;
use crate::transport::{Interaction, MessageHandle, TransportError};
use crate::view::RenderedMessage;

/// Delivers a view as the response to a client event.
///
/// The first send on an unanswered event uses the one-time initial
/// response; every later send on this provider goes through the followup
/// path. Edits always target the original response of the most recent
/// event, which is why the event must be swapped in via
/// [`update_interaction`](Provider::update_interaction) after each round
/// trip.
pub struct InteractionProvider {
    interaction: Arc<dyn Interaction>,
    message: Option<MessageHandle>,
    initial_sent: bool,
}

impl InteractionProvider {
    pub fn new(interaction: Arc<dyn Interaction>) -> Self {
        Self {
            interaction,
            message: None,
            initial_sent: false,
        }
    }

    pub fn interaction(&self) -> &Arc<dyn Interaction> {
        &self.interaction
    }
}

#[async_trait]
impl Provider for InteractionProvider {
    async fn send(&mut self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        let handle = if self.initial_sent || self.interaction.is_responded() {
            tracing::debug!(custom_id = %self.interaction.custom_id(), "Sending followup");
            self.interaction.send_followup(message).await?
        } else {
            tracing::debug!(custom_id = %self.interaction.custom_id(), "Sending initial response");
            let handle = self.interaction.send_initial_response(message).await?;
            self.initial_sent = true;
            handle
        };
        self.message = Some(handle.clone());
        Ok(handle)
    }

    async fn edit(&mut self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        debug_assert!(self.message.is_some(), "edit called before the first send");
        let Some(handle) = self.message.clone() else {
            tracing::error!("Original response edit attempted before send");
            return Err(TransportError::StaleHandle {
                operation: "edit_original_response",
            });
        };
        self.interaction.edit_original_response(message).await?;
        Ok(handle)
    }

    fn update_interaction(&mut self, interaction: Arc<dyn Interaction>) {
        tracing::trace!(custom_id = %interaction.custom_id(), "Interaction swapped");
        self.interaction = interaction;
    }

    fn handle(&self) -> Option<&MessageHandle> {
        self.message.as_ref()
    }

    fn name(&self) -> &'static str {
        "interaction"
    }
}
