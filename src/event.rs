//! What a callback sees when a client event reaches it.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::item::{FieldValue, SelectOption};
use crate::transport::{Interaction, InteractionKind};

/// Submitted client values did not match what was rendered.
///
/// Handed to the callback through the [`EventContext`] accessors rather than
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueCoercionError {
    #[error("Submitted field '{custom_id}' is not part of the modal")]
    UnknownField { custom_id: String },

    #[error("Required field '{label}' was not submitted")]
    MissingField { label: String },

    #[error("Selected value '{value}' is not one of the rendered options")]
    UnknownOption { value: String },

    #[error("Expected between {min} and {max} selected values, got {got}")]
    SelectionCount { min: u8, max: u8, got: usize },

    #[error("Expected a {expected:?} event, got {got:?}")]
    UnexpectedKind {
        expected: InteractionKind,
        got: InteractionKind,
    },
}

/// Argument passed to item callbacks and modal hooks.
#[derive(Clone)]
pub struct EventContext {
    interaction: Arc<dyn Interaction>,
    selection: Result<Vec<SelectOption>, ValueCoercionError>,
    fields: Result<Vec<FieldValue>, ValueCoercionError>,
}

impl EventContext {
    pub(crate) fn new(interaction: Arc<dyn Interaction>) -> Self {
        Self {
            interaction,
            selection: Ok(Vec::new()),
            fields: Ok(Vec::new()),
        }
    }

    pub(crate) fn with_selection(
        mut self,
        selection: Result<Vec<SelectOption>, ValueCoercionError>,
    ) -> Self {
        self.selection = selection;
        self
    }

    pub(crate) fn with_fields(mut self, fields: Result<Vec<FieldValue>, ValueCoercionError>) -> Self {
        self.fields = fields;
        self
    }

    pub fn interaction(&self) -> &Arc<dyn Interaction> {
        &self.interaction
    }

    pub fn kind(&self) -> InteractionKind {
        self.interaction.kind()
    }

    pub fn custom_id(&self) -> &str {
        self.interaction.custom_id()
    }

    /// Raw values chosen in a select (ids for entity selects).
    pub fn values(&self) -> Result<&[String], ValueCoercionError> {
        self.selection.as_ref().map_err(Clone::clone)?;
        Ok(self.interaction.values())
    }

    /// Options chosen in a string select, in submission order.
    pub fn selected_options(&self) -> Result<&[SelectOption], ValueCoercionError> {
        self.selection.as_deref().map_err(Clone::clone)
    }

    /// Modal values as ordered label/value pairs.
    pub fn fields(&self) -> Result<&[FieldValue], ValueCoercionError> {
        self.fields.as_deref().map_err(Clone::clone)
    }

    /// Value of the first submitted field with `label`.
    pub fn field(&self, label: &str) -> Result<Option<&str>, ValueCoercionError> {
        Ok(self
            .fields()?
            .iter()
            .find(|field| field.label == label)
            .map(|field| field.value.as_str()))
    }
}

impl fmt::Debug for EventContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("kind", &self.interaction.kind())
            .field("custom_id", &self.interaction.custom_id())
            .field("selection", &self.selection)
            .field("fields", &self.fields)
            .finish()
    }
}
