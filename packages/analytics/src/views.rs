//! Per-view derivations: year aggregates, heatmap cells and scatter points.

use mortality_map_analytics_models::{
    AggregateKind, HeatmapCell, ScatterPoint, TrendLine, YearAggregate,
};
use mortality_map_index::Index;
use mortality_map_record_models::{Metric, YearFilter};

use crate::trend::trend_line;

/// Summarises `year` across all states: the total for death counts, the
/// mean for rates.
///
/// Returns `None` if the year has no records.
#[must_use]
pub fn year_aggregate(index: &Index, year: i32, metric: Metric) -> Option<YearAggregate> {
    let (sum, record_count) = index
        .by_year(year)
        .fold((0.0, 0_usize), |(sum, count), r| {
            (sum + metric.value(r), count + 1)
        });

    if record_count == 0 {
        return None;
    }

    let (kind, value) = match metric {
        Metric::DeathCount => (AggregateKind::Total, sum),
        Metric::AdjustedRate => {
            #[allow(clippy::cast_precision_loss)]
            let n = record_count as f64;
            (AggregateKind::Average, sum / n)
        }
    };

    Some(YearAggregate {
        year,
        record_count,
        kind,
        value,
    })
}

/// Builds heatmap cells row by row in the order of `states`, with years
/// ascending within each row. Missing `(state, year)` pairs produce no
/// cell.
#[must_use]
pub fn heatmap_cells(index: &Index, states: &[String], metric: Metric) -> Vec<HeatmapCell> {
    states
        .iter()
        .flat_map(|state| {
            index.all_years().iter().filter_map(move |&year| {
                index.record(state, year).map(|r| HeatmapCell {
                    state: state.clone(),
                    year,
                    value: metric.value(r),
                })
            })
        })
        .collect()
}

/// Collects deaths-versus-rate points for the years passing `filter`, in
/// source order.
#[must_use]
pub fn scatter_points(index: &Index, filter: YearFilter) -> Vec<ScatterPoint> {
    index
        .records()
        .iter()
        .filter(|r| filter.matches(r.year))
        .map(|r| ScatterPoint {
            state: r.state.clone(),
            year: r.year,
            death_count: r.death_count,
            adjusted_rate: r.adjusted_rate,
        })
        .collect()
}

/// Fits a trend line of rate against deaths over scatter points.
#[must_use]
pub fn scatter_trend(points: &[ScatterPoint]) -> Option<TrendLine> {
    let xy: Vec<(f64, f64)> = points.iter().map(ScatterPoint::xy).collect();
    trend_line(&xy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index, rec};

    fn fixture() -> Index {
        index(vec![
            rec("Ohio", 2014, 100, 10.0),
            rec("Iowa", 2014, 50, 20.0),
            rec("Ohio", 2015, 120, 12.0),
        ])
    }

    #[test]
    fn deaths_aggregate_is_total() {
        let agg = year_aggregate(&fixture(), 2014, Metric::DeathCount).unwrap();
        assert_eq!(agg.kind, AggregateKind::Total);
        assert_eq!(agg.record_count, 2);
        assert!((agg.value - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rate_aggregate_is_mean() {
        let agg = year_aggregate(&fixture(), 2014, Metric::AdjustedRate).unwrap();
        assert_eq!(agg.kind, AggregateKind::Average);
        assert!((agg.value - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_year_has_no_aggregate() {
        assert!(year_aggregate(&fixture(), 2030, Metric::DeathCount).is_none());
    }

    #[test]
    fn heatmap_follows_row_order_and_skips_gaps() {
        let idx = fixture();
        let rows = vec!["Ohio".to_owned(), "Iowa".to_owned()];
        let cells = heatmap_cells(&idx, &rows, Metric::DeathCount);
        let keys: Vec<(&str, i32)> = cells.iter().map(|c| (c.state.as_str(), c.year)).collect();
        assert_eq!(keys, [("Ohio", 2014), ("Ohio", 2015), ("Iowa", 2014)]);
        assert!((cells[1].value - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scatter_filters_by_year() {
        let idx = fixture();
        assert_eq!(scatter_points(&idx, YearFilter::All).len(), 3);
        let only_2015 = scatter_points(&idx, YearFilter::Year(2015));
        assert_eq!(only_2015.len(), 1);
        assert_eq!(only_2015[0].state, "Ohio");
        assert!(scatter_points(&idx, YearFilter::Year(1990)).is_empty());
    }

    #[test]
    fn scatter_trend_fits_rate_against_deaths() {
        let idx = index(vec![
            rec("A", 2014, 0, 0.0),
            rec("B", 2014, 10, 10.0),
        ]);
        let t = scatter_trend(&scatter_points(&idx, YearFilter::All)).unwrap();
        assert!((t.slope - 1.0).abs() < 1e-9);
        assert!(t.intercept.abs() < 1e-9);
    }

    #[test]
    fn scatter_trend_needs_two_points() {
        let idx = index(vec![rec("A", 2014, 3, 1.0)]);
        assert!(scatter_trend(&scatter_points(&idx, YearFilter::All)).is_none());
    }
}
