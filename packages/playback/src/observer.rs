//! Observer trait for playback updates.
//!
//! The controller never renders anything itself. After every change it
//! hands an immutable [`PlaybackState`] snapshot to a [`PlaybackObserver`],
//! which decides what to redraw.

use std::sync::Arc;

use mortality_map_playback_models::{PlaybackState, UpdateCause};

/// Receives playback snapshots.
///
/// Implementations must be `Send + Sync`: ticks are delivered from a
/// spawned tokio task.
///
/// Calls never overlap and arrive in the order the updates were applied.
/// `on_update` may read [`PlaybackController::state`](crate::PlaybackController::state)
/// but must not issue commands on the same controller; forward them
/// through a channel instead.
pub trait PlaybackObserver: Send + Sync {
    /// Called once per emitted snapshot, outside the controller's state
    /// lock.
    fn on_update(&self, state: &PlaybackState, cause: UpdateCause);
}

/// A no-op implementation of [`PlaybackObserver`].
///
/// Useful for callers that only read snapshots through
/// [`PlaybackController::subscribe`](crate::PlaybackController::subscribe).
pub struct NullObserver;

impl PlaybackObserver for NullObserver {
    fn on_update(&self, _state: &PlaybackState, _cause: UpdateCause) {}
}

/// Returns a shared [`NullObserver`] instance for convenient use.
#[must_use]
pub fn null_observer() -> Arc<dyn PlaybackObserver> {
    Arc::new(NullObserver)
}

impl<F> PlaybackObserver for F
where
    F: Fn(&PlaybackState, UpdateCause) + Send + Sync,
{
    fn on_update(&self, state: &PlaybackState, cause: UpdateCause) {
        self(state, cause);
    }
}
