//! Deterministic state orderings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use mortality_map_analytics_models::{DerivedChange, RankOrder};
use mortality_map_index::Index;
use mortality_map_record_models::Metric;

/// What to rank states by.
#[derive(Debug, Clone, Copy)]
pub enum RankKey<'a> {
    /// Mean of the metric across all of a state's years.
    AverageValue,
    /// Precomputed percentage change. States absent from the change set,
    /// or whose percentage is undefined, are omitted from the ranking.
    Change(&'a [DerivedChange]),
    /// Plain alphabetical order (ranking disabled). Ignores [`RankOrder`].
    Lexicographic,
}

/// Ranking criteria for [`rank_states`].
#[derive(Debug, Clone, Copy)]
pub struct RankOptions<'a> {
    /// Value to rank by.
    pub by: RankKey<'a>,
    /// Direction of the ranking.
    pub order: RankOrder,
}

impl<'a> RankOptions<'a> {
    /// Largest-first ranking by `by`.
    #[must_use]
    pub const fn descending(by: RankKey<'a>) -> Self {
        Self {
            by,
            order: RankOrder::Descending,
        }
    }
}

/// Mean of `metric` over every record of `state`, or `None` if the state
/// has no records.
#[must_use]
pub fn state_average(index: &Index, state: &str, metric: Metric) -> Option<f64> {
    let (sum, count) = index
        .by_state(state)
        .fold((0.0, 0_usize), |(sum, count), r| {
            (sum + metric.value(r), count + 1)
        });
    if count == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    Some(sum / n)
}

/// Orders `states` according to `options`.
///
/// Ties are broken by ascending state name, so the output is fully
/// deterministic. Under [`RankKey::AverageValue`], states with no records
/// sort last regardless of direction.
#[must_use]
pub fn rank_states(
    states: &[String],
    index: &Index,
    metric: Metric,
    options: RankOptions<'_>,
) -> Vec<String> {
    let mut keyed: Vec<(&String, Option<f64>)> = match options.by {
        RankKey::Lexicographic => {
            let mut sorted: Vec<String> = states.to_vec();
            sorted.sort();
            return sorted;
        }
        RankKey::AverageValue => states
            .iter()
            .map(|s| (s, state_average(index, s, metric)))
            .collect(),
        RankKey::Change(changes) => {
            let by_state: BTreeMap<&str, f64> = changes
                .iter()
                .filter_map(|c| c.percent_change.map(|p| (c.state.as_str(), p)))
                .collect();
            states
                .iter()
                .filter_map(|s| {
                    let pct = by_state.get(s.as_str()).copied();
                    if pct.is_none() {
                        log::debug!("Excluding {s} from change ranking");
                    }
                    pct.map(|p| (s, Some(p)))
                })
                .collect()
        }
    };

    keyed.sort_by(|(a_name, a), (b_name, b)| {
        compare_values(*a, *b, options.order).then_with(|| a_name.cmp(b_name))
    });

    keyed.into_iter().map(|(s, _)| s.clone()).collect()
}

fn compare_values(a: Option<f64>, b: Option<f64>, order: RankOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            RankOrder::Descending => b.total_cmp(&a),
            RankOrder::Ascending => a.total_cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::percentage_changes;
    use crate::test_support::{index, rec};

    fn fixture() -> Index {
        index(vec![
            rec("Texas", 2014, 300, 9.0),
            rec("Texas", 2023, 500, 11.0),
            rec("Alaska", 2014, 100, 20.0),
            rec("Alaska", 2023, 100, 24.0),
            rec("Maine", 2014, 200, 15.0),
            rec("Maine", 2023, 400, 15.0),
            rec("Idaho", 2014, 0, 0.0),
            rec("Idaho", 2023, 50, 3.0),
        ])
    }

    #[test]
    fn averages_per_state() {
        let idx = fixture();
        assert!((state_average(&idx, "Texas", Metric::DeathCount).unwrap() - 400.0).abs() < 1e-9);
        assert!(state_average(&idx, "Ohio", Metric::DeathCount).is_none());
    }

    #[test]
    fn ranks_by_average_descending() {
        let idx = fixture();
        let ranked = rank_states(
            idx.all_states(),
            &idx,
            Metric::DeathCount,
            RankOptions::descending(RankKey::AverageValue),
        );
        assert_eq!(ranked, ["Texas", "Maine", "Alaska", "Idaho"]);
    }

    #[test]
    fn ranks_by_average_ascending() {
        let idx = fixture();
        let ranked = rank_states(
            idx.all_states(),
            &idx,
            Metric::AdjustedRate,
            RankOptions {
                by: RankKey::AverageValue,
                order: RankOrder::Ascending,
            },
        );
        assert_eq!(ranked, ["Idaho", "Texas", "Maine", "Alaska"]);
    }

    #[test]
    fn ties_break_alphabetically() {
        let idx = index(vec![
            rec("Utah", 2014, 10, 1.0),
            rec("Iowa", 2014, 10, 1.0),
            rec("Ohio", 2014, 10, 1.0),
        ]);
        for order in [RankOrder::Descending, RankOrder::Ascending] {
            let ranked = rank_states(
                idx.all_states(),
                &idx,
                Metric::DeathCount,
                RankOptions {
                    by: RankKey::AverageValue,
                    order,
                },
            );
            assert_eq!(ranked, ["Iowa", "Ohio", "Utah"]);
        }
    }

    #[test]
    fn states_without_records_sort_last() {
        let idx = fixture();
        let states = vec!["Nowhere".to_owned(), "Alaska".to_owned(), "Texas".to_owned()];
        for order in [RankOrder::Descending, RankOrder::Ascending] {
            let ranked = rank_states(
                &states,
                &idx,
                Metric::DeathCount,
                RankOptions {
                    by: RankKey::AverageValue,
                    order,
                },
            );
            assert_eq!(ranked.last().map(String::as_str), Some("Nowhere"));
        }
    }

    #[test]
    fn ranks_by_change_and_omits_undefined() {
        let idx = fixture();
        let changes = percentage_changes(&idx, Metric::DeathCount, 2014, 2023);
        let ranked = rank_states(
            idx.all_states(),
            &idx,
            Metric::DeathCount,
            RankOptions::descending(RankKey::Change(&changes)),
        );
        // Maine +100%, Texas +66.7%, Alaska 0%; Idaho starts at zero.
        assert_eq!(ranked, ["Maine", "Texas", "Alaska"]);
    }

    #[test]
    fn lexicographic_ignores_values() {
        let idx = fixture();
        let states = vec!["Texas".to_owned(), "Alaska".to_owned(), "Maine".to_owned()];
        let ranked = rank_states(
            &states,
            &idx,
            Metric::DeathCount,
            RankOptions {
                by: RankKey::Lexicographic,
                order: RankOrder::Descending,
            },
        );
        assert_eq!(ranked, ["Alaska", "Maine", "Texas"]);
    }
}
