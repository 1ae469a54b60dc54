//! Contracts consumed from the chat platform.
//!
//! The platform client (HTTP calls, retries, rate limiting) lives outside
//! this crate. It plugs in through two seams:
//!
//! - [`ChannelTransport`]: create and edit a persistent channel message
//! - [`Interaction`]: one client event with its one-shot response paths

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::item::ModalSpec;
use crate::view::RenderedMessage;

/// Errors reported by a transport or raised by a provider.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The platform call failed.
    #[error("{operation} failed: {message}")]
    Failed {
        operation: &'static str,
        message: String,
    },

    /// An edit or followup was attempted before any successful first send.
    /// This is a programming error in the caller.
    #[error("{operation} attempted before the first successful send")]
    StaleHandle { operation: &'static str },

    /// Error surfaced by the transport implementation.
    #[error("Transport error: {0}")]
    Other(#[from] anyhow::Error),
}

impl TransportError {
    pub fn failed(operation: &'static str, message: impl Into<String>) -> Self {
        TransportError::Failed {
            operation,
            message: message.into(),
        }
    }
}

/// Handle to a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    #[serde(default)]
    pub channel_id: Option<String>,
    pub message_id: String,
}

impl MessageHandle {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            channel_id: None,
            message_id: message_id.into(),
        }
    }

    pub fn in_channel(channel_id: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            message_id: message_id.into(),
        }
    }
}

/// Persistent-message delivery: a message sink in a channel.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Post a new message.
    async fn create(&self, message: &RenderedMessage) -> Result<MessageHandle, TransportError>;

    /// Replace the content of an existing message.
    async fn edit(
        &self,
        handle: &MessageHandle,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError>;
}

#[async_trait]
impl<T: ChannelTransport + ?Sized> ChannelTransport for Arc<T> {
    async fn create(&self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        (**self).create(message).await
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        (**self).edit(handle, message).await
    }
}

/// What the user did to raise an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    ComponentPress,
    Select,
    ModalSubmit,
    /// The command that opened the session; never routed to an item.
    Command,
}

/// One raw value submitted through a modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedField {
    pub custom_id: String,
    pub value: String,
}

impl SubmittedField {
    pub fn new(custom_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            value: value.into(),
        }
    }
}

/// A client event together with its response paths.
///
/// The platform issues a fresh event per round trip even though consecutive
/// events belong to the same view session. An initial response can be made
/// only once per event.
#[async_trait]
pub trait Interaction: Send + Sync {
    fn kind(&self) -> InteractionKind;

    /// Identifier of the component or modal that raised the event.
    fn custom_id(&self) -> &str;

    /// Values chosen in a select.
    fn values(&self) -> &[String] {
        &[]
    }

    /// Raw fields of a modal submission.
    fn submitted_fields(&self) -> &[SubmittedField] {
        &[]
    }

    /// Whether the one-time initial response has been used.
    fn is_responded(&self) -> bool;

    async fn send_initial_response(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError>;

    async fn send_followup(&self, message: &RenderedMessage)
        -> Result<MessageHandle, TransportError>;

    async fn edit_original_response(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError>;

    async fn present_modal(&self, modal: &ModalSpec) -> Result<(), TransportError>;

    /// Acknowledge the event without sending anything visible.
    async fn defer(&self) -> Result<(), TransportError>;
}
