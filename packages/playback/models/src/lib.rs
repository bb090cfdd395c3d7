#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Playback cursor state.
//!
//! [`PlaybackState`] is the immutable snapshot the playback controller
//! hands to observers after every change. Stepping the cursor is a pure
//! function on the snapshot so it can be tested without a timer.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Whether the cursor is advancing on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PlaybackStatus {
    /// A recurring timer advances the cursor.
    Playing,
    /// The cursor is frozen.
    Paused,
}

/// Why a new snapshot was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum UpdateCause {
    /// The timer fired and the cursor advanced.
    Tick,
    /// The cursor was moved explicitly.
    Scrub,
    /// Playback was resumed.
    Play,
    /// Playback was paused.
    Pause,
    /// The tick interval changed.
    SpeedChange,
}

/// Snapshot of the playback cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Year currently displayed.
    pub current_year: i32,
    /// Whether the cursor is advancing on its own.
    pub is_playing: bool,
    /// Milliseconds between automatic advances.
    pub tick_interval_ms: u64,
    /// First year of the loop.
    pub min_year: i32,
    /// Last year of the loop.
    pub max_year: i32,
}

impl PlaybackState {
    /// Initial state: playing, cursor on `min_year`.
    #[must_use]
    pub const fn new(min_year: i32, max_year: i32, tick_interval_ms: u64) -> Self {
        Self {
            current_year: min_year,
            is_playing: true,
            tick_interval_ms,
            min_year,
            max_year,
        }
    }

    /// The year after `current_year`, wrapping from `max_year` back to
    /// `min_year`.
    #[must_use]
    pub const fn next_year(&self) -> i32 {
        if self.current_year >= self.max_year {
            self.min_year
        } else {
            self.current_year + 1
        }
    }

    /// Advances the cursor one year, looping at the end of the range.
    pub const fn advance(&mut self) {
        self.current_year = self.next_year();
    }

    /// Returns `true` if `year` lies within the loop range.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min_year && year <= self.max_year
    }

    /// Current status as an enum.
    #[must_use]
    pub const fn status(&self) -> PlaybackStatus {
        if self.is_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }

    /// Number of years in the loop.
    #[must_use]
    pub fn year_count(&self) -> u32 {
        u32::try_from(i64::from(self.max_year) - i64::from(self.min_year) + 1).unwrap_or(0)
    }

    /// 1-based position of the cursor within the loop and the loop
    /// length, e.g. `(3, 10)` for "Year 3 of 10".
    #[must_use]
    pub fn position(&self) -> (u32, u32) {
        let ordinal =
            u32::try_from(i64::from(self.current_year) - i64::from(self.min_year) + 1).unwrap_or(0);
        (ordinal, self.year_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_playing_at_min_year() {
        let s = PlaybackState::new(2014, 2023, 1500);
        assert_eq!(s.current_year, 2014);
        assert!(s.is_playing);
        assert_eq!(s.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn ten_advances_loop_back_to_start() {
        let mut s = PlaybackState::new(2014, 2023, 1500);
        let mut seen = Vec::new();
        for _ in 0..10 {
            s.advance();
            seen.push(s.current_year);
        }
        assert_eq!(
            seen,
            [2015, 2016, 2017, 2018, 2019, 2020, 2021, 2022, 2023, 2014]
        );
    }

    #[test]
    fn single_year_range_stays_put() {
        let mut s = PlaybackState::new(2020, 2020, 10);
        s.advance();
        assert_eq!(s.current_year, 2020);
    }

    #[test]
    fn position_counts_from_one() {
        let mut s = PlaybackState::new(2014, 2023, 1500);
        assert_eq!(s.position(), (1, 10));
        s.current_year = 2016;
        assert_eq!(s.position(), (3, 10));
    }

    #[test]
    fn contains_is_inclusive() {
        let s = PlaybackState::new(2014, 2023, 1500);
        assert!(s.contains(2014));
        assert!(s.contains(2023));
        assert!(!s.contains(2013));
        assert!(!s.contains(2024));
    }

    #[test]
    fn causes_display_in_camel_case() {
        assert_eq!(UpdateCause::SpeedChange.to_string(), "speedChange");
        assert_eq!(PlaybackStatus::Paused.to_string(), "paused");
    }
}
