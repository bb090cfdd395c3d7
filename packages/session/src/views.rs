//! Immutable per-view snapshots.
//!
//! Each snapshot carries everything one view needs to draw itself. They
//! are rebuilt from scratch whenever the index or configuration changes.

use mortality_map_analytics_models::{
    ChangeSummary, DerivedChange, HeatmapCell, ScatterPoint, TrendLine, ValueDomain, YearAggregate,
};
use mortality_map_record_models::{Metric, YearFilter};
use serde::{Deserialize, Serialize};

/// One state's value on the choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateValue {
    pub state: String,
    /// Postal abbreviation used for map labels.
    pub abbr: String,
    pub value: f64,
}

/// A single year of the animated choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethFrame {
    pub year: i32,
    pub metric: Metric,
    /// Values for every state with a record in `year`, by state name.
    pub values: Vec<StateValue>,
    /// Colour domain over all years, so it does not shift between frames.
    pub domain: Option<ValueDomain>,
    /// Footer figure: total deaths or mean rate.
    pub aggregate: Option<YearAggregate>,
}

/// Year-by-state matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapView {
    pub metric: Metric,
    /// Row order.
    pub states: Vec<String>,
    /// Column order.
    pub years: Vec<i32>,
    pub cells: Vec<HeatmapCell>,
    pub domain: Option<ValueDomain>,
}

/// Start-to-end change bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeView {
    pub metric: Metric,
    pub start_year: i32,
    pub end_year: i32,
    /// Changes with a defined percentage, in display order.
    pub changes: Vec<DerivedChange>,
    /// Changes whose start value was zero.
    pub undefined: Vec<DerivedChange>,
    pub summary: Option<ChangeSummary>,
}

/// Deaths-versus-rate scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterView {
    pub filter: YearFilter,
    pub points: Vec<ScatterPoint>,
    /// Extent of `death_count` over `points`.
    pub x_domain: Option<ValueDomain>,
    /// Extent of `adjusted_rate` over `points`.
    pub y_domain: Option<ValueDomain>,
    /// Present only when enabled and at least two distinct x values exist.
    pub trend_line: Option<TrendLine>,
}
