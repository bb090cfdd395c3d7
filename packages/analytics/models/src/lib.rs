#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived-metric result types.
//!
//! Every type here is a read-only snapshot handed to a view. None of them
//! can hold `NaN` or an infinity: degenerate inputs are represented as an
//! absent value (`Option::None`) instead.

use serde::{Deserialize, Serialize};

/// Minimum and maximum observed value of a metric across the whole
/// dataset.
///
/// Computed over every year so that a colour scale stays fixed while the
/// displayed year animates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueDomain {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

impl ValueDomain {
    /// Width of the domain.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Maps `value` onto `[0, 1]` relative to this domain, clamping values
    /// outside it. A zero-width domain maps everything to `0.0`.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.span();
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Returns `steps + 1` evenly spaced values from `min` to `max`
    /// inclusive, as used for legend gradients.
    #[must_use]
    pub fn stops(&self, steps: u32) -> Vec<f64> {
        if steps == 0 {
            return vec![self.min];
        }
        (0..=steps)
            .map(|i| self.min + self.span() * (f64::from(i) / f64::from(steps)))
            .collect()
    }
}

/// Two endpoints of an ordinary-least-squares fit, evaluated at the
/// minimum and maximum x of the fitted points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLine {
    /// Smallest x in the input.
    pub x1: f64,
    /// Fitted y at `x1`.
    pub y1: f64,
    /// Largest x in the input.
    pub x2: f64,
    /// Fitted y at `x2`.
    pub y2: f64,
    /// Fitted slope.
    pub slope: f64,
    /// Fitted intercept.
    pub intercept: f64,
}

impl TrendLine {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Change of a metric for one state between two years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedChange {
    /// State name.
    pub state: String,
    /// Year the change is measured from.
    pub start_year: i32,
    /// Year the change is measured to.
    pub end_year: i32,
    /// Metric value in `start_year`.
    pub start_value: f64,
    /// Metric value in `end_year`.
    pub end_value: f64,
    /// `(end - start) / start * 100`, or `None` when `start_value` is zero.
    pub percent_change: Option<f64>,
    /// `end - start`.
    pub absolute_change: f64,
}

/// Headline figures for a set of [`DerivedChange`]s.
///
/// Only changes with a defined percentage participate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    /// Mean percentage change.
    pub average_percent_change: f64,
    /// Largest percentage change (may be negative if every state fell).
    pub max_increase: f64,
    /// Smallest percentage change (may be positive if every state rose).
    pub max_decrease: f64,
    /// Largest absolute percentage change, for symmetric diverging axes.
    pub max_abs_percent_change: f64,
    /// Number of states whose value went up.
    pub states_increased: usize,
    /// Number of states whose value went down.
    pub states_decreased: usize,
    /// Number of states left out because their percentage is undefined.
    pub states_excluded: usize,
}

/// Sort direction for state rankings. Ties always break by ascending
/// state name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankOrder {
    /// Largest value first.
    #[default]
    Descending,
    /// Smallest value first.
    Ascending,
}

/// One cell of the year-by-state heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// State name (row).
    pub state: String,
    /// Year (column).
    pub year: i32,
    /// Metric value.
    pub value: f64,
}

/// One point of the deaths-versus-rate scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// State name.
    pub state: String,
    /// Year of the observation.
    pub year: i32,
    /// Death count (x axis).
    pub death_count: u64,
    /// Age-adjusted rate (y axis).
    pub adjusted_rate: f64,
}

impl ScatterPoint {
    /// The point as `(x, y)` = `(death_count, adjusted_rate)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn xy(&self) -> (f64, f64) {
        (self.death_count as f64, self.adjusted_rate)
    }
}

/// How a [`YearAggregate`] combines per-state values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregateKind {
    /// Sum across states (counts).
    Total,
    /// Mean across states (rates).
    Average,
}

/// A single figure summarising one year across all states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearAggregate {
    /// Year summarised.
    pub year: i32,
    /// Number of state records contributing.
    pub record_count: usize,
    /// How `value` was computed.
    pub kind: AggregateKind,
    /// The aggregate value.
    pub value: f64,
}
