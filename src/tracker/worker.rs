use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::{mpsc, oneshot};

use super::error::RenderError;
use super::RenderTrigger;
use crate::combine::{Publisher, PublisherId, Subscription};
use crate::config::LayoutConfig;
use crate::provider::Provider;
use crate::transport::{Interaction, MessageHandle};
use crate::view::{reify_message, BuildContext, LayoutError, RenderedSnapshot, View};

pub(crate) type SharedSnapshot = Arc<RwLock<Option<RenderedSnapshot>>>;

/// What a completed render cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// First delivery of the view.
    Sent(MessageHandle),
    /// The payload changed and the delivered message was edited.
    Edited(MessageHandle),
    /// Nothing visible changed; no network call was made.
    Unchanged,
}

/// One build of the view, taken against the state at the moment it ran.
pub(crate) struct Frame {
    seq: u64,
    observed: Vec<Publisher>,
    snapshot: Result<RenderedSnapshot, LayoutError>,
}

/// Builds and reifies the view. Shared by the trigger, which builds on the
/// mutating task, and the worker, which builds for refreshes.
pub(crate) struct Renderer {
    namespace: String,
    limits: LayoutConfig,
    view: Box<dyn View>,
    /// Last issued frame number. Held while a frame is built and queued.
    order: Mutex<u64>,
}

impl Renderer {
    pub(crate) fn new(namespace: String, limits: LayoutConfig, view: Box<dyn View>) -> Self {
        Self {
            namespace,
            limits,
            view,
            order: Mutex::new(0),
        }
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Build a frame and hand it to `then` before the next frame can be
    /// built, so frames reach the queue in build order.
    ///
    /// The view body must not mutate anything it observes.
    pub(crate) fn build_then<R>(&self, then: impl FnOnce(Frame) -> R) -> R {
        let mut order = self.order.lock();
        *order += 1;
        let mut cx = BuildContext::new();
        let message = self.view.body(&mut cx);
        let frame = Frame {
            seq: *order,
            observed: cx.into_observed(),
            snapshot: reify_message(message, &self.namespace, &self.limits),
        };
        then(frame)
    }

    pub(crate) fn build(&self) -> Frame {
        self.build_then(|frame| frame)
    }
}

pub(crate) enum TrackerCommand {
    /// An observed publisher fired; `frame` was built when it did.
    Render { origin: PublisherId, frame: Frame },
    Refresh {
        respond_to: oneshot::Sender<Result<RenderOutcome, RenderError>>,
    },
    UpdateInteraction {
        interaction: Arc<dyn Interaction>,
    },
    /// Park the queue until `release` fires or its sender is dropped.
    Hold {
        release: oneshot::Receiver<()>,
    },
    Flush {
        respond_to: oneshot::Sender<()>,
    },
    Stop {
        respond_to: oneshot::Sender<()>,
    },
}

/// Owns the provider. Every delivery runs on this task, one at a time, in
/// the order the commands were queued.
pub(crate) struct TrackerWorker {
    renderer: Arc<Renderer>,
    provider: Box<dyn Provider>,
    snapshot: SharedSnapshot,
    trigger: Weak<RenderTrigger>,
    subscriptions: HashMap<PublisherId, Subscription>,
    delivered: u64,
}

impl TrackerWorker {
    pub(crate) fn new(
        renderer: Arc<Renderer>,
        provider: Box<dyn Provider>,
        snapshot: SharedSnapshot,
        trigger: Weak<RenderTrigger>,
    ) -> Self {
        Self {
            renderer,
            provider,
            snapshot,
            trigger,
            subscriptions: HashMap::new(),
            delivered: 0,
        }
    }

    fn namespace(&self) -> &str {
        self.renderer.namespace()
    }

    pub(crate) async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<TrackerCommand>) {
        while let Some(command) = receiver.recv().await {
            match command {
                TrackerCommand::Render { origin, frame } => {
                    tracing::debug!(tracker = %self.namespace(), origin = %origin, "Render triggered");
                    if let Err(err) = self.deliver(frame).await {
                        tracing::warn!(tracker = %self.namespace(), error = %err, "Background render failed");
                    }
                }
                TrackerCommand::Refresh { respond_to } => {
                    let frame = self.renderer.build();
                    let result = self.deliver(frame).await;
                    if respond_to.send(result).is_err() {
                        tracing::trace!("Tracker: Refresh response dropped (receiver gone)");
                    }
                }
                TrackerCommand::UpdateInteraction { interaction } => {
                    self.provider.update_interaction(interaction);
                }
                TrackerCommand::Hold { release } => {
                    if release.await.is_err() {
                        tracing::trace!("Tracker: Hold released by drop");
                    }
                }
                TrackerCommand::Flush { respond_to } => {
                    if respond_to.send(()).is_err() {
                        tracing::trace!("Tracker: Flush response dropped (receiver gone)");
                    }
                }
                TrackerCommand::Stop { respond_to } => {
                    self.subscriptions.clear();
                    tracing::info!(tracker = %self.namespace(), "View tracker stopped");
                    if respond_to.send(()).is_err() {
                        tracing::trace!("Tracker: Stop response dropped (receiver gone)");
                    }
                    break;
                }
            }
        }
        tracing::debug!(tracker = %self.namespace(), "Tracker worker exiting");
    }

    /// Diff a frame against the last snapshot and deliver it.
    ///
    /// A frame built before one already delivered is dropped.
    pub(crate) async fn deliver(&mut self, frame: Frame) -> Result<RenderOutcome, RenderError> {
        if frame.seq < self.delivered {
            tracing::debug!(tracker = %self.namespace(), seq = frame.seq, "Stale frame dropped");
            return Ok(RenderOutcome::Unchanged);
        }
        self.delivered = frame.seq;
        self.sync_subscriptions(frame.observed);

        let next = frame.snapshot?;
        let changed = match self.snapshot.read().as_ref() {
            Some(previous) => next.differs_from(previous),
            None => true,
        };
        let payload = changed.then(|| next.message.clone());
        *self.snapshot.write() = Some(next);

        let Some(payload) = payload else {
            tracing::debug!(tracker = %self.namespace(), changed = false, "Render skipped");
            return Ok(RenderOutcome::Unchanged);
        };

        if self.provider.handle().is_some() {
            let handle = self.provider.edit(&payload).await?;
            tracing::info!(
                tracker = %self.namespace(),
                provider = self.provider.name(),
                rows = payload.rows.len(),
                "View edited"
            );
            Ok(RenderOutcome::Edited(handle))
        } else {
            let handle = self.provider.send(&payload).await?;
            tracing::info!(
                tracker = %self.namespace(),
                provider = self.provider.name(),
                message_id = %handle.message_id,
                "View sent"
            );
            Ok(RenderOutcome::Sent(handle))
        }
    }

    /// Attach to observables seen for the first time, detach from ones the
    /// view no longer reads.
    fn sync_subscriptions(&mut self, observed: Vec<Publisher>) {
        let Some(trigger) = self.trigger.upgrade() else {
            self.subscriptions.clear();
            return;
        };

        let current: HashSet<PublisherId> = observed.iter().map(Publisher::id).collect();
        let before = self.subscriptions.len();
        self.subscriptions.retain(|id, _| current.contains(id));
        let detached = before - self.subscriptions.len();

        let mut attached = 0;
        for publisher in observed {
            self.subscriptions.entry(publisher.id()).or_insert_with(|| {
                attached += 1;
                publisher.attach(&trigger)
            });
        }

        if attached > 0 || detached > 0 {
            tracing::debug!(
                tracker = %self.renderer.namespace(),
                attached,
                detached,
                total = self.subscriptions.len(),
                "Subscriptions synchronized"
            );
        }
    }
}
