//! Layout pass: reify every item, place it in its row, assign dispatch ids.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::message::{Embed, Message};
use crate::config::LayoutConfig;
use crate::item::{Callback, Component, Handler, ModalSpec, Node};

/// The rendered item tree cannot be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Row {row} is out of range (the platform allows {max_rows} rows)")]
    RowOutOfRange { row: usize, max_rows: usize },

    #[error("Row {row} needs {width} slots but only {max_width} are available")]
    RowOverflow {
        row: usize,
        width: usize,
        max_width: usize,
    },

    #[error("Custom id '{custom_id}' is used more than once")]
    DuplicateCustomId { custom_id: String },
}

/// A component with its resolved dispatch id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedComponent {
    /// Id the platform reports back on interaction. `None` for link buttons.
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub dispatch_id: Option<String>,
    #[serde(flatten)]
    pub component: Component,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    /// Row index the components resolved to.
    pub index: usize,
    pub components: Vec<RenderedComponent>,
}

/// Full delivery payload. Equality over this type decides whether an edit
/// is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    pub rows: Vec<ActionRow>,
}

impl RenderedMessage {
    pub fn components(&self) -> impl Iterator<Item = &RenderedComponent> {
        self.rows.iter().flat_map(|row| row.components.iter())
    }

    /// Find a component by dispatch id.
    pub fn component(&self, dispatch_id: &str) -> Option<&RenderedComponent> {
        self.components()
            .find(|c| c.dispatch_id.as_deref() == Some(dispatch_id))
    }

    pub fn row(&self, index: usize) -> Option<&ActionRow> {
        self.rows.iter().find(|row| row.index == index)
    }
}

/// Dispatch target registered under a custom id.
#[derive(Clone)]
pub(crate) enum Route {
    Component {
        component: Component,
        handler: Handler,
        modal: Option<ModalSpec>,
    },
    ModalSubmit {
        spec: ModalSpec,
        hook: Option<Callback>,
    },
}

/// The last delivered tree: payload plus dispatch table.
#[derive(Clone)]
pub struct RenderedSnapshot {
    pub message: RenderedMessage,
    pub(crate) routes: HashMap<String, Route>,
}

impl RenderedSnapshot {
    /// Pure comparison against a previous snapshot.
    pub fn differs_from(&self, previous: &RenderedSnapshot) -> bool {
        self.message != previous.message
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub(crate) fn route(&self, custom_id: &str) -> Option<&Route> {
        self.routes.get(custom_id)
    }
}

impl fmt::Debug for RenderedSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<_> = self.routes.keys().collect();
        routes.sort();
        f.debug_struct("RenderedSnapshot")
            .field("message", &self.message)
            .field("routes", &routes)
            .finish()
    }
}

/// Reify `message` into a snapshot.
///
/// Each item is reified with the index of the row it was appended to as its
/// ambient row, then grouped by resolved row keeping declaration order.
/// Components without an explicit id get `{namespace}:{row}:{column}`.
pub fn reify_message(
    message: Message,
    namespace: &str,
    limits: &LayoutConfig,
) -> Result<RenderedSnapshot, LayoutError> {
    let Message {
        content,
        embeds,
        rows,
    } = message;

    let mut grouped: BTreeMap<usize, Vec<Node>> = BTreeMap::new();
    for (ambient_row, items) in rows.iter().enumerate() {
        for item in items {
            let node = item.reify(ambient_row);
            let row = node.component.row();
            if row >= limits.max_rows {
                return Err(LayoutError::RowOutOfRange {
                    row,
                    max_rows: limits.max_rows,
                });
            }
            grouped.entry(row).or_default().push(node);
        }
    }

    let mut routes = HashMap::new();
    let mut action_rows = Vec::with_capacity(grouped.len());
    for (row, nodes) in grouped {
        let width: usize = nodes.iter().map(|node| node.component.width()).sum();
        if width > limits.max_row_width {
            return Err(LayoutError::RowOverflow {
                row,
                width,
                max_width: limits.max_row_width,
            });
        }

        let mut components = Vec::with_capacity(nodes.len());
        for (column, node) in nodes.into_iter().enumerate() {
            let Node { component, handler } = node;
            if !component.is_routable() {
                components.push(RenderedComponent {
                    dispatch_id: None,
                    component,
                });
                continue;
            }

            let dispatch_id = component
                .custom_id()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}:{}:{}", namespace, row, column));

            let modal = handler
                .modal
                .as_ref()
                .map(|modal| (modal.resolve(&format!("{}:modal", dispatch_id)), modal.hook()));
            let modal_spec = match modal {
                Some((spec, hook)) => {
                    register(
                        &mut routes,
                        spec.custom_id.clone(),
                        Route::ModalSubmit {
                            spec: spec.clone(),
                            hook,
                        },
                    )?;
                    Some(spec)
                }
                None => None,
            };

            register(
                &mut routes,
                dispatch_id.clone(),
                Route::Component {
                    component: component.clone(),
                    handler,
                    modal: modal_spec,
                },
            )?;
            components.push(RenderedComponent {
                dispatch_id: Some(dispatch_id),
                component,
            });
        }
        action_rows.push(ActionRow {
            index: row,
            components,
        });
    }

    Ok(RenderedSnapshot {
        message: RenderedMessage {
            content,
            embeds,
            rows: action_rows,
        },
        routes,
    })
}

fn register(
    routes: &mut HashMap<String, Route>,
    custom_id: String,
    route: Route,
) -> Result<(), LayoutError> {
    if routes.contains_key(&custom_id) {
        return Err(LayoutError::DuplicateCustomId { custom_id });
    }
    routes.insert(custom_id, route);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Button, LinkButton, Modal, Select, SelectOption, TextInput};

    fn limits() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn reify(message: Message) -> Result<RenderedSnapshot, LayoutError> {
        reify_message(message, "v", &limits())
    }

    #[test]
    fn test_explicit_row_wins_over_ambient() {
        let snapshot = reify(
            Message::new()
                .item(Button::new("pinned").row(2))
                .item(Button::new("floating")),
        )
        .unwrap();

        let row0 = snapshot.message.row(0).unwrap();
        let row2 = snapshot.message.row(2).unwrap();
        assert_eq!(row0.components.len(), 1);
        assert_eq!(row2.components.len(), 1);
        assert_eq!(row2.components[0].component.row(), 2);
        assert_eq!(row0.components[0].component.row(), 0);
    }

    #[test]
    fn test_generated_ids_are_positional() {
        let snapshot = reify(
            Message::new()
                .item(Button::new("a"))
                .item(Button::new("b").custom_id("explicit"))
                .next_row()
                .item(Button::new("c")),
        )
        .unwrap();

        let ids: Vec<_> = snapshot
            .message
            .components()
            .map(|c| c.dispatch_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["v:0:0", "explicit", "v:1:0"]);
    }

    #[test]
    fn test_rebuild_is_stable() {
        let build = || {
            Message::new()
                .content("hi")
                .item(Button::new("a"))
                .item(LinkButton::new("https://example.com", "docs"))
        };
        let first = reify(build()).unwrap();
        let second = reify(build()).unwrap();
        assert!(!second.differs_from(&first));
    }

    #[test]
    fn test_content_change_is_a_difference() {
        let first = reify(Message::new().content("a")).unwrap();
        let second = reify(Message::new().content("b")).unwrap();
        assert!(second.differs_from(&first));
    }

    #[test]
    fn test_link_buttons_have_no_route() {
        let snapshot = reify(Message::new().item(LinkButton::new("https://x.dev", "x"))).unwrap();
        assert_eq!(snapshot.routes().count(), 0);
        assert!(snapshot.message.rows[0].components[0].dispatch_id.is_none());
    }

    #[test]
    fn test_row_out_of_range() {
        let err = reify(Message::new().item(Button::new("x").row(5))).unwrap_err();
        assert_eq!(err, LayoutError::RowOutOfRange { row: 5, max_rows: 5 });
    }

    #[test]
    fn test_row_overflow() {
        let err = reify(
            Message::new()
                .item(Select::new().option(SelectOption::new("a")))
                .item(Button::new("x")),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::RowOverflow { row: 0, width: 6, .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = reify(
            Message::new()
                .item(Button::new("a").custom_id("same"))
                .item(Button::new("b").custom_id("same")),
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateCustomId { .. }));
    }

    #[test]
    fn test_modal_routes_registered() {
        let snapshot = reify(
            Message::new().item(
                Button::new("open")
                    .custom_id("open")
                    .modal(Modal::new("Form").field(TextInput::new("Name"))),
            ),
        )
        .unwrap();

        let mut routes: Vec<_> = snapshot.routes().collect();
        routes.sort();
        assert_eq!(routes, vec!["open", "open:modal"]);
    }

    #[test]
    fn test_payload_serializes_flat() {
        let snapshot = reify(Message::new().item(Button::new("a"))).unwrap();
        let json = serde_json::to_value(&snapshot.message).unwrap();
        let component = &json["rows"][0]["components"][0];
        assert_eq!(component["id"], "v:0:0");
        assert_eq!(component["type"], "button");
        assert_eq!(component["label"], "a");
    }
}
