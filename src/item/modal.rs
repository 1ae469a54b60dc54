use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::{callback, Callback};
use crate::event::{EventContext, ValueCoercionError};
use crate::transport::SubmittedField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputStyle {
    #[default]
    Short,
    Paragraph,
}

/// A text field inside a modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub style: TextInputStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u16>,
    /// Pre-filled value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            custom_id: None,
            style: TextInputStyle::Short,
            placeholder: None,
            required: true,
            min_length: None,
            max_length: None,
            value: None,
        }
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn style(mut self, style: TextInputStyle) -> Self {
        self.style = style;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn length(mut self, min: u16, max: u16) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// A modal with every identifier resolved, as handed to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalSpec {
    pub title: String,
    pub custom_id: String,
    pub fields: Vec<TextInput>,
}

/// One submitted modal value, keyed by the field's label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub label: String,
    pub value: String,
}

/// A popup form presented from a button press.
#[derive(Clone)]
pub struct Modal {
    title: String,
    custom_id: Option<String>,
    fields: Vec<TextInput>,
    hook: Option<Callback>,
}

impl Modal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            custom_id: None,
            fields: Vec::new(),
            hook: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn field(mut self, field: TextInput) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = TextInput>) -> Self {
        self.fields = fields.into_iter().collect();
        self
    }

    /// Run `f` on submission. Values arrive through
    /// [`EventContext::fields`] as ordered label/value pairs.
    pub fn on_submit<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(EventContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hook = Some(callback(f));
        self
    }

    pub(crate) fn hook(&self) -> Option<Callback> {
        self.hook.clone()
    }

    /// Resolve identifiers: the modal falls back to `fallback_id`, each field
    /// without an id to `{modal_id}:{index}`.
    pub fn resolve(&self, fallback_id: &str) -> ModalSpec {
        let custom_id = self
            .custom_id
            .clone()
            .unwrap_or_else(|| fallback_id.to_string());
        let fields = self
            .fields
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let mut field = field.clone();
                if field.custom_id.is_none() {
                    field.custom_id = Some(format!("{}:{}", custom_id, index));
                }
                field
            })
            .collect();
        ModalSpec {
            title: self.title.clone(),
            custom_id,
            fields,
        }
    }
}

impl fmt::Debug for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Modal")
            .field("title", &self.title)
            .field("custom_id", &self.custom_id)
            .field("fields", &self.fields.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

/// Map raw submitted fields onto the modal's fields.
///
/// The result follows the modal's field order. Optional fields that were not
/// submitted are omitted; a missing required field or an unknown id is an
/// error.
pub(crate) fn collect_submission(
    spec: &ModalSpec,
    submitted: &[SubmittedField],
) -> Result<Vec<FieldValue>, ValueCoercionError> {
    if let Some(unknown) = submitted.iter().find(|raw| {
        !spec
            .fields
            .iter()
            .any(|field| field.custom_id.as_deref() == Some(raw.custom_id.as_str()))
    }) {
        return Err(ValueCoercionError::UnknownField {
            custom_id: unknown.custom_id.clone(),
        });
    }

    let mut values = Vec::with_capacity(spec.fields.len());
    for field in &spec.fields {
        let raw = submitted
            .iter()
            .find(|raw| field.custom_id.as_deref() == Some(raw.custom_id.as_str()));
        match raw {
            Some(raw) => values.push(FieldValue {
                label: field.label.clone(),
                value: raw.value.clone(),
            }),
            None if field.required => {
                return Err(ValueCoercionError::MissingField {
                    label: field.label.clone(),
                })
            }
            None => {}
        }
    }
    Ok(values)
}
