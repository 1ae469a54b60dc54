use thiserror::Error;

use crate::transport::TransportError;
use crate::view::LayoutError;

/// A render cycle failed.
///
/// On a transport failure the stored snapshot has already advanced; the next
/// successful edit carries the accumulated state.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Delivery failed: {0}")]
    Transport(#[from] TransportError),

    #[error("View tracker is stopped")]
    TrackerClosed,
}

/// A client event could not be dispatched to completion.
///
/// A guard rejection is not an error; see
/// [`DispatchOutcome::Rejected`](super::DispatchOutcome::Rejected).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Guard failed: {0}")]
    Guard(#[source] anyhow::Error),

    #[error("Callback failed: {0}")]
    Callback(#[source] anyhow::Error),

    #[error("Event response failed: {0}")]
    Transport(#[from] TransportError),

    #[error("View tracker is stopped")]
    TrackerClosed,
}
