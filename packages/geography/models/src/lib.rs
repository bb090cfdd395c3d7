#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! US state geography lookups.
//!
//! Mortality tables key rows by full state name, while map labels and
//! axis ticks use two-letter postal abbreviations. This crate bridges the
//! two.

pub mod states;

pub use states::{STATES, state_abbr};
