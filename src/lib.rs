//! Reactive, declarative message UIs for chat platforms.
//!
//! State lives in [`StateCell`]s and [`ObservableObject`]s. A [`View`]
//! reads that state and describes a [`Message`] of rows of items. A
//! [`ViewTracker`] delivers the view through a [`Provider`] and edits the
//! delivered message every time the observed state changes something
//! visible.
//!
//! ```no_run
//! use chatview::{BuildContext, Button, Message, StateCell, ViewTracker};
//! # async fn run(provider: impl chatview::Provider + 'static) -> Result<(), chatview::RenderError> {
//! let count = StateCell::new(0u32);
//! let view = {
//!     let count = count.clone();
//!     move |cx: &mut BuildContext| {
//!         cx.observe(&count);
//!         let bump = count.clone();
//!         Message::new()
//!             .content(format!("Count: {}", count.get()))
//!             .item(Button::new("+1").on_click(move |_| {
//!                 bump.update(|n| *n += 1);
//!                 async { Ok(()) }
//!             }))
//!     }
//! };
//! let tracker = ViewTracker::track(view, provider).await?;
//! # let _ = tracker;
//! # Ok(())
//! # }
//! ```

pub mod combine;
pub mod config;
pub mod event;
pub mod item;
pub mod logging;
pub mod observable;
pub mod provider;
pub mod tracker;
pub mod transport;
pub mod view;

pub use config::{Config, ConfigError};
pub use event::{EventContext, ValueCoercionError};
pub use item::{
    Button, ButtonStyle, FieldValue, Item, LinkButton, Modal, Select, SelectKind, SelectOption,
    TextInput, TextInputStyle,
};
pub use observable::{Observable, ObservableObject, Published, StateCell};
pub use provider::{InteractionProvider, MessageProvider, Provider};
pub use tracker::{DispatchError, DispatchOutcome, RenderError, RenderOutcome, ViewTracker};
pub use transport::{
    ChannelTransport, Interaction, InteractionKind, MessageHandle, SubmittedField, TransportError,
};
pub use view::{BuildContext, Embed, Message, RenderedMessage, View};
