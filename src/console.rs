//! Terminal stand-in for a chat platform.
//!
//! Delivered payloads are printed as JSON. Client events are typed on stdin.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chatview::item::ModalSpec;
use chatview::{
    ChannelTransport, Interaction, InteractionKind, MessageHandle, RenderedMessage, SubmittedField,
    TransportError,
};

const CHANNEL_ID: &str = "console";

fn print_payload(operation: &str, message: &RenderedMessage) -> Result<(), TransportError> {
    let json = serde_json::to_string_pretty(message)
        .map_err(|e| TransportError::failed("serialize", e.to_string()))?;
    println!("--- {} ---\n{}", operation, json);
    Ok(())
}

/// Channel that prints messages instead of posting them.
#[derive(Default)]
pub struct ConsoleChannel {
    next_message: AtomicU64,
}

#[async_trait]
impl ChannelTransport for ConsoleChannel {
    async fn create(&self, message: &RenderedMessage) -> Result<MessageHandle, TransportError> {
        let id = self.next_message.fetch_add(1, Ordering::Relaxed) + 1;
        print_payload(&format!("create #{}", id), message)?;
        Ok(MessageHandle::in_channel(CHANNEL_ID, id.to_string()))
    }

    async fn edit(
        &self,
        handle: &MessageHandle,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        print_payload(&format!("edit #{}", handle.message_id), message)?;
        Ok(handle.clone())
    }
}

/// One typed client event.
pub struct ConsoleInteraction {
    kind: InteractionKind,
    custom_id: String,
    values: Vec<String>,
    fields: Vec<SubmittedField>,
    responded: AtomicBool,
}

impl ConsoleInteraction {
    pub fn new(kind: InteractionKind, custom_id: impl Into<String>) -> Self {
        Self {
            kind,
            custom_id: custom_id.into(),
            values: Vec::new(),
            fields: Vec::new(),
            responded: AtomicBool::new(false),
        }
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn with_fields(mut self, fields: Vec<SubmittedField>) -> Self {
        self.fields = fields;
        self
    }

    fn respond(&self, operation: &'static str) -> Result<(), TransportError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            return Err(TransportError::failed(operation, "event already answered"));
        }
        Ok(())
    }
}

#[async_trait]
impl Interaction for ConsoleInteraction {
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
        self.respond("initial_response")?;
        print_payload("initial response", message)?;
        Ok(MessageHandle::in_channel(CHANNEL_ID, "original"))
    }

    async fn send_followup(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        print_payload("followup", message)?;
        Ok(MessageHandle::in_channel(CHANNEL_ID, "followup"))
    }

    async fn edit_original_response(
        &self,
        message: &RenderedMessage,
    ) -> Result<MessageHandle, TransportError> {
        print_payload("edit original response", message)?;
        Ok(MessageHandle::in_channel(CHANNEL_ID, "original"))
    }

    async fn present_modal(&self, modal: &ModalSpec) -> Result<(), TransportError> {
        self.respond("present_modal")?;
        let json = serde_json::to_string_pretty(modal)
            .map_err(|e| TransportError::failed("serialize", e.to_string()))?;
        println!("--- modal ---\n{}", json);
        Ok(())
    }

    async fn defer(&self) -> Result<(), TransportError> {
        self.respond("defer")?;
        println!("--- deferred {} ---", self.custom_id);
        Ok(())
    }
}

/// A parsed stdin line.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Press(String),
    Select(String, Vec<String>),
    Submit(String, Vec<SubmittedField>),
    Quit,
}

impl ConsoleCommand {
    /// Parse `press <id>`, `select <id> <values..>`,
    /// `submit <modal_id> <field_id>=<value>..` or `quit`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or_else(|| "empty command".to_string())?;
        match verb {
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            "press" => Ok(ConsoleCommand::Press(target(&mut words, verb)?)),
            "select" => {
                let id = target(&mut words, verb)?;
                Ok(ConsoleCommand::Select(id, words.map(str::to_string).collect()))
            }
            "submit" => {
                let id = target(&mut words, verb)?;
                let fields = words
                    .map(|pair| {
                        pair.split_once('=')
                            .map(|(field, value)| SubmittedField::new(field, value))
                            .ok_or_else(|| format!("expected <field_id>=<value>, got '{}'", pair))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ConsoleCommand::Submit(id, fields))
            }
            other => Err(format!("unknown command '{}'", other)),
        }
    }

    pub fn into_interaction(self) -> Option<ConsoleInteraction> {
        match self {
            ConsoleCommand::Press(id) => {
                Some(ConsoleInteraction::new(InteractionKind::ComponentPress, id))
            }
            ConsoleCommand::Select(id, values) => {
                Some(ConsoleInteraction::new(InteractionKind::Select, id).with_values(values))
            }
            ConsoleCommand::Submit(id, fields) => {
                Some(ConsoleInteraction::new(InteractionKind::ModalSubmit, id).with_fields(fields))
            }
            ConsoleCommand::Quit => None,
        }
    }
}

fn target<'a>(words: &mut impl Iterator<Item = &'a str>, verb: &str) -> Result<String, String> {
    words
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("'{}' needs a custom id", verb))
}
