//! Binds one view to one provider.
//!
//! A [`ViewTracker`] builds its view once, delivers it, and from then on
//! rebuilds it whenever an observable the view read fires. The rebuild runs
//! right where the notification lands, so every mutation gets a payload of
//! its own. Diffing and delivery happen on a single worker task fed by an
//! unbounded command queue, so edits land in the order the state changed.
//! Client events enter through [`ViewTracker::dispatch`].

mod dispatch;
mod error;
mod worker;

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::combine::{Signal, Subscriber};
use crate::config::{Config, TrackerConfig};
use crate::provider::Provider;
use crate::transport::Interaction;
use crate::view::{RenderedMessage, View};

pub use dispatch::DispatchOutcome;
pub use error::{DispatchError, RenderError};
pub use worker::RenderOutcome;

use worker::{Renderer, SharedSnapshot, TrackerCommand, TrackerWorker};

/// Subscriber registered on every observed publisher.
///
/// Only the tracker holds it strongly; publishers and the worker keep weak
/// references, so dropping the tracker silences every subscription.
pub(crate) struct RenderTrigger {
    renderer: Arc<Renderer>,
    commands: mpsc::UnboundedSender<TrackerCommand>,
}

impl Subscriber for RenderTrigger {
    fn receive(&self, signal: &Signal) {
        if self.commands.is_closed() {
            tracing::trace!(tracker = %self.renderer.namespace(), "Render skipped (worker gone)");
            return;
        }
        let sent = self.renderer.build_then(|frame| {
            self.commands.send(TrackerCommand::Render {
                origin: signal.origin,
                frame,
            })
        });
        if sent.is_err() {
            tracing::trace!(tracker = %self.renderer.namespace(), "Render dropped (worker gone)");
        }
    }
}

pub struct ViewTracker {
    namespace: String,
    config: TrackerConfig,
    commands: mpsc::UnboundedSender<TrackerCommand>,
    snapshot: SharedSnapshot,
    /// Sole strong reference to the trigger.
    _trigger: Arc<RenderTrigger>,
}

impl ViewTracker {
    /// Build `view`, deliver it through `provider`, and start tracking with
    /// the default configuration.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn track<V, P>(view: V, provider: P) -> Result<Self, RenderError>
    where
        V: View + 'static,
        P: Provider + 'static,
    {
        Self::with_config(view, provider, &Config::default()).await
    }

    pub async fn with_config<V, P>(view: V, provider: P, config: &Config) -> Result<Self, RenderError>
    where
        V: View + 'static,
        P: Provider + 'static,
    {
        let namespace = config
            .tracker
            .id_namespace
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        let (commands, receiver) = mpsc::unbounded_channel();
        let renderer = Arc::new(Renderer::new(namespace.clone(), config.layout, Box::new(view)));
        let trigger = Arc::new(RenderTrigger {
            renderer: renderer.clone(),
            commands: commands.clone(),
        });
        let snapshot = SharedSnapshot::default();

        let mut worker = TrackerWorker::new(
            renderer.clone(),
            Box::new(provider),
            snapshot.clone(),
            Arc::downgrade(&trigger),
        );
        worker.deliver(renderer.build()).await?;
        tokio::spawn(worker.run(receiver));

        tracing::info!(tracker = %namespace, "View tracker started");
        Ok(Self {
            namespace,
            config: config.tracker.clone(),
            commands,
            snapshot,
            _trigger: trigger,
        })
    }

    /// Prefix of the custom ids generated for this tracker's components.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The most recently rendered payload.
    ///
    /// Advances on every cycle, including cycles whose delivery failed.
    pub fn snapshot(&self) -> Option<RenderedMessage> {
        self.snapshot.read().as_ref().map(|s| s.message.clone())
    }

    /// Run a render cycle now and wait for its result. Like [`flush`], it
    /// never completes when awaited from one of the tracker's own callbacks.
    ///
    /// [`flush`]: ViewTracker::flush
    pub async fn refresh(&self) -> Result<RenderOutcome, RenderError> {
        let (respond_to, receiver) = oneshot::channel();
        self.send(TrackerCommand::Refresh { respond_to })
            .map_err(|_| RenderError::TrackerClosed)?;
        receiver.await.map_err(|_| RenderError::TrackerClosed)?
    }

    /// Wait until every cycle queued before this call has completed.
    ///
    /// Awaiting this from inside one of the tracker's own callbacks never
    /// completes; the queue is held until the callback returns.
    pub async fn flush(&self) -> Result<(), RenderError> {
        let (respond_to, receiver) = oneshot::channel();
        self.send(TrackerCommand::Flush { respond_to })
            .map_err(|_| RenderError::TrackerClosed)?;
        receiver.await.map_err(|_| RenderError::TrackerClosed)
    }

    /// Swap the provider's live event. Queued behind pending cycles, ahead of
    /// any cycle triggered afterwards.
    pub fn update_interaction(&self, interaction: Arc<dyn Interaction>) -> Result<(), RenderError> {
        self.send(TrackerCommand::UpdateInteraction { interaction })
            .map_err(|_| RenderError::TrackerClosed)
    }

    /// Detach from every observable and stop the worker once the queue
    /// ahead of this call has drained. Stopping twice is harmless.
    pub async fn stop(&self) {
        let (respond_to, receiver) = oneshot::channel();
        if self.send(TrackerCommand::Stop { respond_to }).is_err() {
            return;
        }
        if receiver.await.is_err() {
            tracing::trace!(tracker = %self.namespace, "Stop acknowledgment dropped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.commands.is_closed()
    }

    /// Park the worker until the returned sender fires or is dropped.
    /// Cycles queued meanwhile are delivered after it.
    pub(crate) fn hold(&self) -> Result<oneshot::Sender<()>, RenderError> {
        let (release, receiver) = oneshot::channel();
        self.send(TrackerCommand::Hold { release: receiver })
            .map_err(|_| RenderError::TrackerClosed)?;
        Ok(release)
    }

    pub(crate) fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn send(&self, command: TrackerCommand) -> Result<(), mpsc::error::SendError<TrackerCommand>> {
        self.commands.send(command)
    }
}

impl std::fmt::Debug for ViewTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTracker")
            .field("namespace", &self.namespace)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
