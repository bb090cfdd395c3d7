//! Colour-scale value domains.

use mortality_map_analytics_models::ValueDomain;
use mortality_map_index::Index;
use mortality_map_record_models::Metric;

/// Minimum and maximum of `metric` across every record of every year.
///
/// The result does not depend on which year a view is currently showing,
/// so a colour scale built from it stays fixed during playback.
///
/// Returns `None` for an empty index.
#[must_use]
pub fn value_domain(index: &Index, metric: Metric) -> Option<ValueDomain> {
    let domain = domain_of(index.iter_by_year().map(|r| metric.value(r)));
    if domain.is_none() {
        log::debug!("No value domain for {metric}: index is empty");
    }
    domain
}

/// Minimum and maximum of an arbitrary value sequence.
///
/// Non-finite values are ignored. Returns `None` if no finite value
/// remains.
#[must_use]
pub fn domain_of(values: impl IntoIterator<Item = f64>) -> Option<ValueDomain> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some(ValueDomain { min: v, max: v }),
            Some(d) => Some(ValueDomain {
                min: d.min.min(v),
                max: d.max.max(v),
            }),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index, rec};

    #[test]
    fn spans_every_year() {
        let idx = index(vec![
            rec("Ohio", 2014, 100, 12.0),
            rec("Ohio", 2015, 300, 8.0),
            rec("Iowa", 2014, 50, 20.5),
            rec("Iowa", 2015, 75, 3.25),
        ]);

        let deaths = value_domain(&idx, Metric::DeathCount).unwrap();
        assert!((deaths.min - 50.0).abs() < f64::EPSILON);
        assert!((deaths.max - 300.0).abs() < f64::EPSILON);

        let rate = value_domain(&idx, Metric::AdjustedRate).unwrap();
        assert!((rate.min - 3.25).abs() < f64::EPSILON);
        assert!((rate.max - 20.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_index_has_no_domain() {
        assert!(value_domain(&index(Vec::new()), Metric::AdjustedRate).is_none());
    }

    #[test]
    fn domain_of_skips_non_finite() {
        let d = domain_of([f64::NAN, 2.0, f64::INFINITY, -1.0]).unwrap();
        assert!((d.min + 1.0).abs() < f64::EPSILON);
        assert!((d.max - 2.0).abs() < f64::EPSILON);
        assert!(domain_of([f64::NAN]).is_none());
    }
}
