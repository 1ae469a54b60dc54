use async_trait::async_trait;

use super::Provider;
use crate::transport::{ChannelTransport, MessageHandle, TransportError};
use crate::view::RenderedMessage;

/// Delivers a view as a persistent channel message.
///
/// `send` creates the message; every `edit` targets that same message.
pub struct MessageProvider<T> {
    transport: T,
    message: Option<MessageHandle>,
}

impl<T: ChannelTransport> MessageProvider<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            message: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

#[async_trait]
impl<T: ChannelTransport> Provider for MessageProvider<T> {
    async fn send(&mut self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        let handle = self.transport.create(message).await?;
        tracing::debug!(message_id = %handle.message_id, "Channel message created");
        self.message = Some(handle.clone());
        Ok(handle)
    }

    async fn edit(&mut self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        debug_assert!(self.message.is_some(), "edit called before the first send");
        let Some(handle) = self.message.as_ref() else {
            tracing::error!("Channel message edit attempted before send");
            return Err(TransportError::StaleHandle { operation: "edit" });
        };
        self.transport.edit(handle, message).await?;
        Ok(handle.clone())
    }

    fn handle(&self) -> Option<&MessageHandle> {
        self.message.as_ref()
    }

    fn name(&self) -> &'static str {
        "message"
    }
}
