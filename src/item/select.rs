use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::{callback, fallible_guard, guard, resolve_row, Callback, Component, Guard, Handler, Item, Node};
use crate::event::{EventContext, ValueCoercionError};
use crate::transport::Interaction;

/// What a select picks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectKind {
    /// Developer-supplied [`SelectOption`]s.
    #[default]
    String,
    User,
    Role,
    Mentionable,
    Channel,
}

/// One choice of a string select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub default: bool,
}

impl SelectOption {
    /// An option whose value defaults to its label.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
            description: None,
            emoji: None,
            default: false,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }
}

/// Visible attributes of a rendered select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectSpec {
    pub kind: SelectKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub min_values: u8,
    pub max_values: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channel_types: Vec<String>,
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    pub row: usize,
}

/// A dropdown. A select always occupies a whole row.
#[derive(Clone)]
pub struct Select {
    kind: SelectKind,
    placeholder: Option<String>,
    min_values: u8,
    max_values: u8,
    options: Vec<SelectOption>,
    channel_types: Vec<String>,
    disabled: bool,
    custom_id: Option<String>,
    row: Option<usize>,
    callback: Option<Callback>,
    guard: Option<Guard>,
}

impl Select {
    /// A select over developer-supplied options.
    pub fn new() -> Self {
        Self::of(SelectKind::String)
    }

    pub fn users() -> Self {
        Self::of(SelectKind::User)
    }

    pub fn roles() -> Self {
        Self::of(SelectKind::Role)
    }

    pub fn mentionables() -> Self {
        Self::of(SelectKind::Mentionable)
    }

    pub fn channels() -> Self {
        Self::of(SelectKind::Channel)
    }

    pub fn of(kind: SelectKind) -> Self {
        Self {
            kind,
            placeholder: None,
            min_values: 1,
            max_values: 1,
            options: Vec::new(),
            channel_types: Vec::new(),
            disabled: false,
            custom_id: None,
            row: None,
            callback: None,
            guard: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn min_values(mut self, min_values: u8) -> Self {
        self.min_values = min_values;
        self
    }

    pub fn max_values(mut self, max_values: u8) -> Self {
        self.max_values = max_values;
        self
    }

    pub fn options(mut self, options: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    pub fn option(mut self, option: SelectOption) -> Self {
        self.options.push(option);
        self
    }

    /// Restrict a channel select to the given platform channel types.
    pub fn channel_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channel_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Run `f` with the chosen values; string selects also resolve them to
    /// [`SelectOption`]s via [`EventContext::selected_options`].
    pub fn on_select<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(EventContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.callback = Some(callback(f));
        self
    }

    pub fn check<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Interaction) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(guard(f));
        self
    }

    pub fn try_check<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Interaction) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.guard = Some(fallible_guard(f));
        self
    }

    pub fn spec(&self, ambient_row: usize) -> SelectSpec {
        let options = match self.kind {
            SelectKind::String => self.options.clone(),
            _ => Vec::new(),
        };
        let channel_types = match self.kind {
            SelectKind::Channel => self.channel_types.clone(),
            _ => Vec::new(),
        };
        SelectSpec {
            kind: self.kind,
            placeholder: self.placeholder.clone(),
            min_values: self.min_values,
            max_values: self.max_values,
            options,
            channel_types,
            disabled: self.disabled,
            custom_id: self.custom_id.clone(),
            row: resolve_row(self.row, ambient_row),
        }
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("kind", &self.kind)
            .field("options", &self.options.len())
            .field("custom_id", &self.custom_id)
            .field("row", &self.row)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

impl Item for Select {
    fn reify(&self, ambient_row: usize) -> Node {
        Node {
            component: Component::Select(self.spec(ambient_row)),
            handler: Handler {
                callback: self.callback.clone(),
                guard: self.guard.clone(),
                modal: None,
            },
        }
    }
}

/// Check submitted select values against the rendered spec.
///
/// String selects resolve each value to its option, in submission order.
/// Entity selects accept any id.
pub(crate) fn coerce_selection(
    spec: &SelectSpec,
    values: &[String],
) -> Result<Vec<SelectOption>, ValueCoercionError> {
    let count = values.len();
    if count < usize::from(spec.min_values) || count > usize::from(spec.max_values) {
        return Err(ValueCoercionError::SelectionCount {
            min: spec.min_values,
            max: spec.max_values,
            got: count,
        });
    }

    if spec.kind != SelectKind::String {
        return Ok(Vec::new());
    }

    values
        .iter()
        .map(|value| {
            spec.options
                .iter()
                .find(|option| &option.value == value)
                .cloned()
                .ok_or_else(|| ValueCoercionError::UnknownOption {
                    value: value.clone(),
                })
        })
        .collect()
}
