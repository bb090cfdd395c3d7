//! Start-year to end-year changes per state.

use mortality_map_analytics_models::{ChangeSummary, DerivedChange};
use mortality_map_index::Index;
use mortality_map_record_models::Metric;

/// Computes the change of `metric` between `start_year` and `end_year` for
/// every state in the index.
///
/// States lacking a record in either year are skipped rather than
/// zero-filled. A state whose start value is zero keeps its
/// `absolute_change` but gets `percent_change: None`.
///
/// Output follows the index's lexicographic state order.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn percentage_changes(
    index: &Index,
    metric: Metric,
    start_year: i32,
    end_year: i32,
) -> Vec<DerivedChange> {
    let mut changes = Vec::new();

    for state in index.all_states() {
        let (Some(start), Some(end)) = (
            index.record(state, start_year),
            index.record(state, end_year),
        ) else {
            log::debug!("Skipping {state}: no data for both {start_year} and {end_year}");
            continue;
        };

        let start_value = metric.value(start);
        let end_value = metric.value(end);
        let absolute_change = end_value - start_value;

        let percent_change = if start_value == 0.0 {
            log::debug!("{state}: {metric} is zero in {start_year}, percent change undefined");
            None
        } else {
            Some(absolute_change / start_value * 100.0).filter(|p| p.is_finite())
        };

        changes.push(DerivedChange {
            state: state.clone(),
            start_year,
            end_year,
            start_value,
            end_value,
            percent_change,
            absolute_change,
        });
    }

    changes
}

/// Summarises a change set: mean, extremes, and how many states rose or
/// fell.
///
/// Returns `None` if no change has a defined percentage.
#[must_use]
pub fn change_summary(changes: &[DerivedChange]) -> Option<ChangeSummary> {
    let defined: Vec<f64> = changes.iter().filter_map(|c| c.percent_change).collect();
    if defined.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let average_percent_change = defined.iter().sum::<f64>() / defined.len() as f64;

    let max_increase = defined.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_decrease = defined.iter().copied().fold(f64::INFINITY, f64::min);

    Some(ChangeSummary {
        average_percent_change,
        max_increase,
        max_decrease,
        max_abs_percent_change: max_increase.abs().max(max_decrease.abs()),
        states_increased: defined.iter().filter(|p| **p > 0.0).count(),
        states_decreased: defined.iter().filter(|p| **p < 0.0).count(),
        states_excluded: changes.len() - defined.len(),
    })
}
