#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived-metric engine shared by every dashboard view.
//!
//! All operations are pure functions of an [`Index`](mortality_map_index::Index)
//! and a [`Metric`](mortality_map_record_models::Metric). Nothing is cached:
//! callers re-run an operation whenever its inputs change.
//!
//! Degenerate inputs never produce `NaN` or an infinity. They resolve to a
//! documented fallback instead:
//!
//! * an empty dataset has no [`ValueDomain`](mortality_map_analytics_models::ValueDomain),
//! * fewer than two points, or points that all share one x, have no
//!   [`TrendLine`](mortality_map_analytics_models::TrendLine),
//! * a zero start value has no percentage change and is left out of change
//!   rankings and summaries.

pub mod change;
pub mod domain;
pub mod rank;
pub mod trend;
pub mod views;

pub use change::{change_summary, percentage_changes};
pub use domain::{domain_of, value_domain};
pub use rank::{RankKey, RankOptions, rank_states, state_average};
pub use trend::trend_line;
pub use views::{heatmap_cells, scatter_points, scatter_trend, year_aggregate};
