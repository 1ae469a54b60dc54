use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use super::{callback, fallible_guard, guard, resolve_row, Callback, Component, Guard, Handler, Item, Modal, Node};
use crate::event::EventContext;
use crate::transport::Interaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
    Link,
}

/// Visible attributes of a rendered button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub label: String,
    pub style: ButtonStyle,
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub row: usize,
}

/// A push button.
///
/// ```
/// use chatview::item::{Button, ButtonStyle};
///
/// let button = Button::new("Save")
///     .style(ButtonStyle::Success)
///     .row(1)
///     .on_click(|_ctx| async { Ok(()) });
/// # let _ = button;
/// ```
#[derive(Clone, Default)]
pub struct Button {
    label: String,
    style: ButtonStyle,
    disabled: bool,
    emoji: Option<String>,
    custom_id: Option<String>,
    url: Option<String>,
    row: Option<usize>,
    callback: Option<Callback>,
    guard: Option<Guard>,
    modal: Option<Modal>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    pub fn custom_id(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Pin the button to a row, overriding the row it is placed in.
    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    pub fn on_click<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(EventContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.callback = Some(callback(f));
        self
    }

    /// Present `modal` on press instead of running the click callback.
    pub fn modal(mut self, modal: Modal) -> Self {
        self.modal = Some(modal);
        self
    }

    /// Only let events through when `f` returns true. Rejected events are
    /// swallowed without acknowledgment.
    pub fn check<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Interaction) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(guard(f));
        self
    }

    /// Like [`check`](Button::check), but an error aborts the dispatch.
    pub fn try_check<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Interaction) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        self.guard = Some(fallible_guard(f));
        self
    }

    pub fn spec(&self, ambient_row: usize) -> ButtonSpec {
        ButtonSpec {
            label: self.label.clone(),
            style: self.style,
            disabled: self.disabled,
            emoji: self.emoji.clone(),
            custom_id: self.custom_id.clone(),
            url: self.url.clone(),
            row: resolve_row(self.row, ambient_row),
        }
    }
}

/// Buttons are equal when every visible attribute matches.
impl PartialEq for Button {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
            && self.style == other.style
            && self.disabled == other.disabled
            && self.emoji == other.emoji
            && self.custom_id == other.custom_id
            && self.url == other.url
            && self.row == other.row
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("style", &self.style)
            .field("disabled", &self.disabled)
            .field("custom_id", &self.custom_id)
            .field("row", &self.row)
            .field("callback", &self.callback.is_some())
            .field("modal", &self.modal.is_some())
            .finish()
    }
}

impl Item for Button {
    fn reify(&self, ambient_row: usize) -> Node {
        Node {
            component: Component::Button(self.spec(ambient_row)),
            handler: Handler {
                callback: self.callback.clone(),
                guard: self.guard.clone(),
                modal: self.modal.clone(),
            },
        }
    }
}

/// A button that opens a URL client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    url: String,
    label: String,
    row: Option<usize>,
}

impl LinkButton {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            row: None,
        }
    }

    pub fn row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }
}

impl Item for LinkButton {
    fn reify(&self, ambient_row: usize) -> Node {
        Node {
            component: Component::Button(ButtonSpec {
                label: self.label.clone(),
                style: ButtonStyle::Link,
                disabled: false,
                emoji: None,
                custom_id: None,
                url: Some(self.url.clone()),
                row: resolve_row(self.row, ambient_row),
            }),
            handler: Handler::default(),
        }
    }
}
