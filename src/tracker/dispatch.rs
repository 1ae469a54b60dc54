use std::sync::Arc;

use tokio::sync::oneshot;

use super::error::DispatchError;
use super::ViewTracker;
use crate::event::{EventContext, ValueCoercionError};
use crate::item::{coerce_selection, collect_submission, Callback, Component, Handler, ModalSpec};
use crate::transport::{Interaction, InteractionKind};
use crate::view::Route;

/// How a client event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No rendered component or modal carries the event's id.
    Unrouted,
    /// The guard returned false. Nothing ran and nothing was sent.
    Rejected,
    /// The component has neither callback nor modal.
    Ignored,
    ModalPresented,
    Handled,
}

impl ViewTracker {
    /// Route a client event to the node that raised it.
    ///
    /// Lookup happens against the last rendered snapshot. Order for a
    /// component: guard, then the provider's event swap, then the modal if
    /// one is configured, otherwise the callback. An event still unanswered
    /// after its callback is deferred when `acknowledge_after_callback` is
    /// set.
    ///
    /// The worker is held while the callback runs. Renders the callback
    /// triggers are delivered once the event has been answered, so their
    /// edits never reach an unacknowledged event.
    pub async fn dispatch(
        &self,
        interaction: Arc<dyn Interaction>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let route = self
            .snapshot
            .read()
            .as_ref()
            .and_then(|snapshot| snapshot.route(interaction.custom_id()).cloned());

        let Some(route) = route else {
            tracing::debug!(
                tracker = %self.namespace,
                custom_id = %interaction.custom_id(),
                "No route for event"
            );
            return Ok(DispatchOutcome::Unrouted);
        };

        match route {
            Route::Component {
                component,
                handler,
                modal,
            } => {
                self.dispatch_component(interaction, &component, handler, modal)
                    .await
            }
            Route::ModalSubmit { spec, hook } => self.dispatch_submission(interaction, &spec, hook).await,
        }
    }

    async fn dispatch_component(
        &self,
        interaction: Arc<dyn Interaction>,
        component: &Component,
        handler: Handler,
        modal: Option<ModalSpec>,
    ) -> Result<DispatchOutcome, DispatchError> {
        if handler.callback.is_none() && modal.is_none() {
            return Ok(DispatchOutcome::Ignored);
        }

        if let Some(guard) = &handler.guard {
            match guard(interaction.as_ref()) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(
                        tracker = %self.namespace,
                        custom_id = %interaction.custom_id(),
                        "Event rejected by guard"
                    );
                    return Ok(DispatchOutcome::Rejected);
                }
                Err(err) => {
                    tracing::error!(
                        tracker = %self.namespace,
                        custom_id = %interaction.custom_id(),
                        error = %err,
                        "Guard failed"
                    );
                    return Err(DispatchError::Guard(err));
                }
            }
        }

        self.update_interaction(interaction.clone())
            .map_err(|_| DispatchError::TrackerClosed)?;

        if let Some(spec) = modal {
            interaction.present_modal(&spec).await?;
            tracing::debug!(tracker = %self.namespace, modal = %spec.custom_id, "Modal presented");
            return Ok(DispatchOutcome::ModalPresented);
        }

        let mut ctx = EventContext::new(interaction.clone());
        if let Component::Select(spec) = component {
            let selection = match interaction.kind() {
                InteractionKind::Select => coerce_selection(spec, interaction.values()),
                got => Err(ValueCoercionError::UnexpectedKind {
                    expected: InteractionKind::Select,
                    got,
                }),
            };
            ctx = ctx.with_selection(selection);
        }

        let release = self.hold().map_err(|_| DispatchError::TrackerClosed)?;
        if let Some(callback) = handler.callback {
            self.run_callback(&callback, ctx).await?;
        }
        self.acknowledge(interaction.as_ref()).await?;
        self.release(release);
        Ok(DispatchOutcome::Handled)
    }

    async fn dispatch_submission(
        &self,
        interaction: Arc<dyn Interaction>,
        spec: &ModalSpec,
        hook: Option<Callback>,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.update_interaction(interaction.clone())
            .map_err(|_| DispatchError::TrackerClosed)?;

        let fields = match interaction.kind() {
            InteractionKind::ModalSubmit => collect_submission(spec, interaction.submitted_fields()),
            got => Err(ValueCoercionError::UnexpectedKind {
                expected: InteractionKind::ModalSubmit,
                got,
            }),
        };
        if let Err(err) = &fields {
            tracing::warn!(tracker = %self.namespace, modal = %spec.custom_id, error = %err, "Malformed submission");
        }

        let release = self.hold().map_err(|_| DispatchError::TrackerClosed)?;
        if let Some(hook) = hook {
            let ctx = EventContext::new(interaction.clone()).with_fields(fields);
            self.run_callback(&hook, ctx).await?;
        }
        self.acknowledge(interaction.as_ref()).await?;
        self.release(release);
        Ok(DispatchOutcome::Handled)
    }

    async fn run_callback(&self, callback: &Callback, ctx: EventContext) -> Result<(), DispatchError> {
        let custom_id = ctx.custom_id().to_string();
        callback(ctx).await.map_err(|err| {
            tracing::error!(tracker = %self.namespace, custom_id = %custom_id, error = %err, "Callback failed");
            DispatchError::Callback(err)
        })
    }

    fn release(&self, release: oneshot::Sender<()>) {
        if release.send(()).is_err() {
            tracing::trace!(tracker = %self.namespace, "Hold released after worker exit");
        }
    }

    async fn acknowledge(&self, interaction: &dyn Interaction) -> Result<(), DispatchError> {
        if self.config().acknowledge_after_callback && !interaction.is_responded() {
            interaction.defer().await?;
            tracing::trace!(tracker = %self.namespace, custom_id = %interaction.custom_id(), "Event deferred");
        }
        Ok(())
    }
}
