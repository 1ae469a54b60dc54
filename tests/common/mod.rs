//! Shared test utilities and mock transports.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatview::item::{Component, ModalSpec};
use chatview::{
    ChannelTransport, Interaction, InteractionKind, MessageHandle, RenderedMessage, SubmittedField,
    TransportError,
};
use parking_lot::Mutex;

/// Channel transport that records every payload it is handed.
#[derive(Default)]
pub struct RecordingChannel {
    created: Mutex<Vec<RenderedMessage>>,
    edits: Mutex<Vec<(MessageHandle, RenderedMessage)>>,
    fail_edits: AtomicBool,
    next_id: AtomicUsize,
}

impl RecordingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> Vec<RenderedMessage> {
        self.created.lock().clone()
    }

    pub fn edits(&self) -> Vec<RenderedMessage> {
        self.edits.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn edit_handles(&self) -> Vec<MessageHandle> {
        self.edits.lock().iter().map(|(h, _)| h.clone()).collect()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.lock().len()
    }

    pub fn last_edit(&self) -> Option<RenderedMessage> {
        self.edits.lock().last().map(|(_, m)| m.clone())
    }

    pub fn set_fail_edits(&self, fail: bool) {
        self.fail_edits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChannelTransport for RecordingChannel {
    async fn create(&self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.created.lock().push(message.clone());
        Ok(MessageHandle::in_channel("test-channel", format!("msg-{}", id)))
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(TransportError::failed("edit", "simulated outage"));
        }
        self.edits.lock().push((handle.clone(), message.clone()));
        Ok(handle.clone())
    }
}

/// A response path call made on a [`MockInteraction`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Initial(RenderedMessage),
    Followup(RenderedMessage),
    EditOriginal(RenderedMessage),
    Modal(ModalSpec),
    Defer,
}

/// Client event with scripted values and recorded responses.
pub struct MockInteraction {
    kind: InteractionKind,
    custom_id: String,
    values: Vec<String>,
    fields: Vec<SubmittedField>,
    responded: AtomicBool,
    calls: Mutex<Vec<Call>>,
}

impl MockInteraction {
    pub fn new(kind: InteractionKind, custom_id: impl Into<String>) -> Self {
        Self {
            kind,
            custom_id: custom_id.into(),
            values: Vec::new(),
            fields: Vec::new(),
            responded: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn command() -> Arc<Self> {
        Arc::new(Self::new(InteractionKind::Command, "command"))
    }

    pub fn press(custom_id: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(InteractionKind::ComponentPress, custom_id))
    }

    pub fn select(custom_id: impl Into<String>, values: &[&str]) -> Arc<Self> {
        let mut interaction = Self::new(InteractionKind::Select, custom_id);
        interaction.values = values.iter().map(|v| v.to_string()).collect();
        Arc::new(interaction)
    }

    pub fn submit(custom_id: impl Into<String>, fields: &[(&str, &str)]) -> Arc<Self> {
        let mut interaction = Self::new(InteractionKind::ModalSubmit, custom_id);
        interaction.fields = fields
            .iter()
            .map(|(id, value)| SubmittedField::new(*id, *value))
            .collect();
        Arc::new(interaction)
    }

    pub fn responded(self) -> Self {
        self.responded.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    /// Followups and edits only exist once the event has been answered.
    fn require_acknowledged(&self, operation: &'static str) -> Result<(), TransportError> {
        if self.is_responded() {
            Ok(())
        } else {
            Err(TransportError::failed(operation, "event not acknowledged"))
        }
    }
}

#[async_trait]
impl Interaction for MockInteraction {
    fn kind(&self) -> InteractionKind {
        self.kind
    }

    fn custom_id(&self) -> &str {
        &self.custom_id
    }

    fn values(&self) -> &[String] {
        &self.values
    }

    fn submitted_fields(&self) -> &[SubmittedField] {
        &self.fields
    }

    fn is_responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    async fn send_initial_response(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            return Err(TransportError::failed("initial_response", "already responded"));
        }
        self.record(Call::Initial(message.clone()));
        Ok(MessageHandle::new("original"))
    }

    async fn send_followup(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        self.require_acknowledged("followup")?;
        self.record(Call::Followup(message.clone()));
        Ok(MessageHandle::new("followup"))
    }

    async fn edit_original_response(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        self.require_acknowledged("edit_original_response")?;
        self.record(Call::EditOriginal(message.clone()));
        Ok(MessageHandle::new("original"))
    }

    async fn present_modal(&self, modal: &ModalSpec) -> Result<(), TransportError> {
        self.responded.store(true, Ordering::SeqCst);
        self.record(Call::Modal(modal.clone()));
        Ok(())
    }

    async fn defer(&self) -> Result<(), TransportError> {
        // The acknowledgment is a network round trip.
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.responded.store(true, Ordering::SeqCst);
        self.record(Call::Defer);
        Ok(())
    }
}

/// Labels of every button in `message`, in render order.
pub fn button_labels(message: &RenderedMessage) -> Vec<String> {
    message
        .components()
        .filter_map(|rendered| match &rendered.component {
            Component::Button(spec) => Some(spec.label.clone()),
            Component::Select(_) => None,
        })
        .collect()
}
