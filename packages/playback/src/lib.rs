#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Timer-driven playback of a year cursor.
//!
//! A [`PlaybackController`] exclusively owns its [`PlaybackState`]. While
//! playing, a recurring tokio interval advances the cursor one year per
//! tick, looping from `max_year` back to `min_year`. Callers drive it only
//! through command methods and observe it through a [`PlaybackObserver`]
//! or a [`watch`] channel.
//!
//! Every armed timer is tagged with a generation number. Arming a new
//! timer (or disarming) bumps the generation and aborts the old task, and
//! a tick whose generation is stale is discarded, so at most one tick
//! stream can ever move the cursor.
//!
//! Observer notifications are serialised: the notify lock is taken before
//! the state lock is released, so the observer sees updates one at a time
//! and in the order they were applied. A tick can never be reported after
//! the pause that cancelled it.

mod observer;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

pub use mortality_map_playback_models::{PlaybackState, PlaybackStatus, UpdateCause};
pub use observer::{NullObserver, PlaybackObserver, null_observer};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Errors returned by playback commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Tick interval of zero.
    #[error("Tick interval must be a positive number of milliseconds")]
    InvalidInterval,

    /// `min_year` is after `max_year`.
    #[error("Invalid year range {min_year}..={max_year}")]
    InvalidRange {
        /// Requested first year.
        min_year: i32,
        /// Requested last year.
        max_year: i32,
    },

    /// A scrub target outside the loop range.
    #[error("Year {year} is outside {min_year}..={max_year}")]
    YearOutOfRange {
        /// Requested year.
        year: i32,
        /// First year of the loop.
        min_year: i32,
        /// Last year of the loop.
        max_year: i32,
    },

    /// The controller was created outside a tokio runtime.
    #[error("Playback requires a running tokio runtime")]
    NoRuntime,
}

struct Core {
    state: PlaybackState,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl Core {
    fn disarm(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct Shared {
    core: Mutex<Core>,
    notify: Mutex<()>,
    observer: Arc<dyn PlaybackObserver>,
    sender: watch::Sender<PlaybackState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes `core.state` to subscribers and reserves the observer.
    /// Must be called with the state lock held; the returned guard keeps
    /// later updates from notifying until this one has been delivered.
    fn publish(&self, core: &Core) -> (MutexGuard<'_, ()>, PlaybackState) {
        self.sender.send_replace(core.state);
        let turn = self.notify.lock().unwrap_or_else(PoisonError::into_inner);
        (turn, core.state)
    }

    /// Applies one tick if `generation` is still current. Returns `false`
    /// once the timer that produced the tick has been superseded.
    fn tick(&self, generation: u64) -> bool {
        let (turn, state) = {
            let mut core = self.lock();
            if core.generation != generation || !core.state.is_playing {
                return false;
            }
            core.state.advance();
            self.publish(&core)
        };

        log::trace!("Playback tick: year {}", state.current_year);
        self.observer.on_update(&state, UpdateCause::Tick);
        drop(turn);
        true
    }
}

/// Owns a [`PlaybackState`] and the recurring timer that advances it.
///
/// Dropping the controller releases the timer.
pub struct PlaybackController {
    shared: Arc<Shared>,
    runtime: Handle,
}

impl PlaybackController {
    /// Creates a controller looping over `min_year..=max_year`, already
    /// playing with the cursor on `min_year`.
    ///
    /// The observer receives the initial snapshot with
    /// [`UpdateCause::Play`] before this returns.
    ///
    /// # Errors
    ///
    /// * [`PlaybackError::InvalidInterval`] if `tick_interval_ms` is zero
    /// * [`PlaybackError::InvalidRange`] if `min_year > max_year`
    /// * [`PlaybackError::NoRuntime`] if called outside a tokio runtime
    pub fn new(
        min_year: i32,
        max_year: i32,
        tick_interval_ms: u64,
        observer: Arc<dyn PlaybackObserver>,
    ) -> Result<Self, PlaybackError> {
        if tick_interval_ms == 0 {
            return Err(PlaybackError::InvalidInterval);
        }
        if min_year > max_year {
            return Err(PlaybackError::InvalidRange { min_year, max_year });
        }
        let runtime = Handle::try_current().map_err(|_| PlaybackError::NoRuntime)?;

        let state = PlaybackState::new(min_year, max_year, tick_interval_ms);
        let (sender, _) = watch::channel(state);

        let controller = Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core {
                    state,
                    generation: 0,
                    timer: None,
                }),
                notify: Mutex::new(()),
                observer,
                sender,
            }),
            runtime,
        };

        let (turn, state) = {
            let mut core = controller.shared.lock();
            controller.arm(&mut *core);
            controller.shared.publish(&core)
        };
        log::debug!("Playback started over {min_year}..={max_year} every {tick_interval_ms}ms");
        controller.shared.observer.on_update(&state, UpdateCause::Play);
        drop(turn);

        Ok(controller)
    }

    /// Current snapshot. Safe to call from inside
    /// [`PlaybackObserver::on_update`].
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        *self.shared.sender.borrow()
    }

    /// A receiver that always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.shared.sender.subscribe()
    }

    /// Resumes playback. No-op if already playing.
    pub fn play(&self) {
        self.update(UpdateCause::Play, |controller, core| {
            if core.state.is_playing {
                return false;
            }
            core.state.is_playing = true;
            controller.arm(core);
            true
        });
    }

    /// Pauses playback and releases the timer. No-op if already paused.
    pub fn pause(&self) {
        self.update(UpdateCause::Pause, |_, core| Self::halt(core));
    }

    /// Releases the timer for teardown, leaving the cursor where it is.
    /// Safe to call any number of times; [`Self::play`] re-arms it.
    pub fn stop(&self) {
        self.update(UpdateCause::Pause, |_, core| Self::halt(core));
        log::debug!("Playback stopped");
    }

    /// Changes the tick interval. If playing, the timer is re-armed so the
    /// next tick is `tick_interval_ms` from now.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::InvalidInterval`] if `tick_interval_ms` is
    /// zero.
    pub fn set_speed(&self, tick_interval_ms: u64) -> Result<(), PlaybackError> {
        if tick_interval_ms == 0 {
            return Err(PlaybackError::InvalidInterval);
        }
        self.update(UpdateCause::SpeedChange, |controller, core| {
            core.state.tick_interval_ms = tick_interval_ms;
            if core.state.is_playing {
                controller.arm(core);
            }
            true
        });
        Ok(())
    }

    /// Moves the cursor to `year` without changing play status.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::YearOutOfRange`] if `year` is outside the
    /// loop range.
    pub fn set_year(&self, year: i32) -> Result<(), PlaybackError> {
        let mut result = Ok(());
        self.update(UpdateCause::Scrub, |_, core| {
            if !core.state.contains(year) {
                result = Err(PlaybackError::YearOutOfRange {
                    year,
                    min_year: core.state.min_year,
                    max_year: core.state.max_year,
                });
                return false;
            }
            core.state.current_year = year;
            true
        });
        result
    }

    /// Runs `apply` under the lock and, if it reports a change, publishes
    /// the new snapshot. The observer is notified after the state lock is
    /// released but before any later update can notify.
    fn update(&self, cause: UpdateCause, apply: impl FnOnce(&Self, &mut Core) -> bool) {
        let (turn, state) = {
            let mut core = self.shared.lock();
            if !apply(self, &mut *core) {
                return;
            }
            self.shared.publish(&core)
        };

        log::debug!(
            "Playback {cause}: year {} ({})",
            state.current_year,
            state.status()
        );
        self.shared.observer.on_update(&state, cause);
        drop(turn);
    }

    fn halt(core: &mut Core) -> bool {
        if !core.state.is_playing {
            return false;
        }
        core.state.is_playing = false;
        core.disarm();
        true
    }

    /// Cancels any armed timer and starts a new one under a fresh
    /// generation.
    fn arm(&self, core: &mut Core) {
        core.disarm();

        let generation = core.generation;
        let period = Duration::from_millis(core.state.tick_interval_ms);
        let start = Instant::now() + period;
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);

        core.timer = Some(self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                if !shared.tick(generation) {
                    break;
                }
            }
        }));
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shared.lock().disarm();
    }
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
