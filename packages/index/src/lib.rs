#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Immutable lookup structures over a flat sequence of mortality records.
//!
//! An [`Index`] owns the records it was built from and groups them by
//! state and by year. Groups hold positions into the owned record vector,
//! so every grouped record is the very same value as in the flat sequence.
//!
//! The index is built once per load and never mutated. A reload builds a
//! new [`Index`] wholesale; holders of the old one keep a consistent
//! snapshot.

use std::collections::HashMap;

use mortality_map_record_models::Record;
use thiserror::Error;

/// Data-integrity violations detected while indexing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IndexError {
    /// Two records share the same `(state, year)` natural key.
    #[error("Duplicate record for {state} in {year}")]
    DuplicateKey {
        /// State of the duplicated key.
        state: String,
        /// Year of the duplicated key.
        year: i32,
    },

    /// A record carries a value that must never reach a view.
    #[error("Invalid value for {state} in {year}: {message}")]
    InvalidValue {
        /// State of the offending record.
        state: String,
        /// Year of the offending record.
        year: i32,
        /// Description of what went wrong.
        message: String,
    },
}

/// Records grouped by state and by year, plus sorted distinct keys.
#[derive(Debug, Clone, Default)]
pub struct Index {
    records: Vec<Record>,
    by_state: HashMap<String, Vec<usize>>,
    by_year: HashMap<i32, Vec<usize>>,
    by_key: HashMap<String, HashMap<i32, usize>>,
    all_states: Vec<String>,
    all_years: Vec<i32>,
}

/// Builds an [`Index`] from any finite sequence of records.
///
/// Records need not be sorted. Arrival order is preserved within each
/// group.
///
/// # Errors
///
/// Returns [`IndexError::DuplicateKey`] if two records share a
/// `(state, year)` pair, or [`IndexError::InvalidValue`] if a record has an
/// empty state name or a negative / non-finite adjusted rate.
pub fn build_index(records: Vec<Record>) -> Result<Index, IndexError> {
    Index::build(records)
}

impl Index {
    /// See [`build_index`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] on duplicate keys or invalid values.
    pub fn build(records: Vec<Record>) -> Result<Self, IndexError> {
        let mut by_state: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_year: HashMap<i32, Vec<usize>> = HashMap::new();
        let mut by_key: HashMap<String, HashMap<i32, usize>> = HashMap::new();

        for (pos, record) in records.iter().enumerate() {
            validate(record)?;

            let years = by_key.entry(record.state.clone()).or_default();
            if years.insert(record.year, pos).is_some() {
                log::error!(
                    "Duplicate (state, year) key: ({}, {})",
                    record.state,
                    record.year
                );
                return Err(IndexError::DuplicateKey {
                    state: record.state.clone(),
                    year: record.year,
                });
            }

            by_state.entry(record.state.clone()).or_default().push(pos);
            by_year.entry(record.year).or_default().push(pos);
        }

        let mut all_states: Vec<String> = by_state.keys().cloned().collect();
        all_states.sort_unstable();
        let mut all_years: Vec<i32> = by_year.keys().copied().collect();
        all_years.sort_unstable();

        log::info!(
            "Indexed {} records across {} states and {} years",
            records.len(),
            all_states.len(),
            all_years.len()
        );

        Ok(Self {
            records,
            by_state,
            by_year,
            by_key,
            all_states,
            all_years,
        })
    }

    /// The flat record sequence, in the order it was supplied.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted (lexicographic) distinct state names.
    #[must_use]
    pub fn all_states(&self) -> &[String] {
        &self.all_states
    }

    /// Sorted (ascending) distinct years.
    #[must_use]
    pub fn all_years(&self) -> &[i32] {
        &self.all_years
    }

    /// First and last year present, or `None` for an empty index.
    #[must_use]
    pub fn year_range(&self) -> Option<(i32, i32)> {
        Some((*self.all_years.first()?, *self.all_years.last()?))
    }

    /// All records for `state`, in arrival order. Empty if the state is
    /// unknown.
    pub fn by_state<'a>(&'a self, state: &str) -> impl Iterator<Item = &'a Record> + use<'a> {
        self.resolve(self.by_state.get(state))
    }

    /// All records for `year`, in arrival order. Empty if the year is
    /// unknown.
    pub fn by_year(&self, year: i32) -> impl Iterator<Item = &Record> {
        self.resolve(self.by_year.get(&year))
    }

    /// Looks up the single record for a `(state, year)` key in constant
    /// time.
    #[must_use]
    pub fn record(&self, state: &str, year: i32) -> Option<&Record> {
        self.by_key
            .get(state)
            .and_then(|years| years.get(&year))
            .map(|&pos| &self.records[pos])
    }

    /// Iterates every record year by year, ascending.
    pub fn iter_by_year(&self) -> impl Iterator<Item = &Record> {
        self.all_years.iter().flat_map(|&year| self.by_year(year))
    }

    fn resolve<'a>(
        &'a self,
        group: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a Record> + use<'a> {
        group
            .into_iter()
            .flatten()
            .map(move |&pos| &self.records[pos])
    }
}

fn validate(record: &Record) -> Result<(), IndexError> {
    if record.state.trim().is_empty() {
        return Err(IndexError::InvalidValue {
            state: record.state.clone(),
            year: record.year,
            message: "state name is empty".to_string(),
        });
    }

    if !record.adjusted_rate.is_finite() || record.adjusted_rate < 0.0 {
        return Err(IndexError::InvalidValue {
            state: record.state.clone(),
            year: record.year,
            message: format!(
                "adjusted rate {} is not a non-negative finite number",
                record.adjusted_rate
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(state: &str, year: i32, deaths: u64, rate: f64) -> Record {
        Record {
            year,
            state: state.to_owned(),
            death_count: deaths,
            adjusted_rate: rate,
            source_url: format!("https://example.org/{year}"),
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("Texas", 2015, 2_588, 9.4),
            rec("Alaska", 2014, 124, 16.8),
            rec("Texas", 2014, 2_601, 9.7),
            rec("Alaska", 2015, 122, 16.0),
            rec("Maine", 2015, 272, 17.6),
        ]
    }

    #[test]
    fn all_states_are_sorted_distinct_names() {
        let index = build_index(sample()).unwrap();
        assert_eq!(index.all_states(), ["Alaska", "Maine", "Texas"]);
    }

    #[test]
    fn all_years_are_sorted_distinct_years() {
        let index = build_index(sample()).unwrap();
        assert_eq!(index.all_years(), [2014, 2015]);
        assert_eq!(index.year_range(), Some((2014, 2015)));
    }

    #[test]
    fn group_sizes_sum_to_record_count() {
        let records = sample();
        let total = records.len();
        let index = build_index(records).unwrap();

        let by_state: usize = index
            .all_states()
            .iter()
            .map(|s| index.by_state(s).count())
            .sum();
        let by_year: usize = index
            .all_years()
            .iter()
            .map(|&y| index.by_year(y).count())
            .sum();

        assert_eq!(by_state, total);
        assert_eq!(by_year, total);
    }

    #[test]
    fn every_record_appears_in_exactly_one_group_of_each_kind() {
        let index = build_index(sample()).unwrap();
        for record in index.records() {
            let state_hits = index
                .all_states()
                .iter()
                .flat_map(|s| index.by_state(s))
                .filter(|r| std::ptr::eq(*r, record))
                .count();
            let year_hits = index
                .all_years()
                .iter()
                .flat_map(|&y| index.by_year(y))
                .filter(|r| std::ptr::eq(*r, record))
                .count();
            assert_eq!(state_hits, 1, "{:?}", record.key());
            assert_eq!(year_hits, 1, "{:?}", record.key());
        }
    }

    #[test]
    fn groups_preserve_arrival_order() {
        let index = build_index(sample()).unwrap();
        let texas: Vec<i32> = index.by_state("Texas").map(|r| r.year).collect();
        assert_eq!(texas, [2015, 2014]);
        let y2015: Vec<&str> = index.by_year(2015).map(|r| r.state.as_str()).collect();
        assert_eq!(y2015, ["Texas", "Alaska", "Maine"]);
    }

    #[test]
    fn record_lookup_by_key() {
        let index = build_index(sample()).unwrap();
        assert_eq!(index.record("Alaska", 2015).unwrap().death_count, 122);
        assert!(index.record("Maine", 2014).is_none());
        assert!(index.record("Nowhere", 2014).is_none());
    }

    #[test]
    fn unknown_keys_yield_empty_groups() {
        let index = build_index(sample()).unwrap();
        assert_eq!(index.by_state("Ohio").count(), 0);
        assert_eq!(index.by_year(1999).count(), 0);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let a = build_index(sample()).unwrap();
        let mut reversed = sample();
        reversed.reverse();
        let b = build_index(reversed).unwrap();

        assert_eq!(a.all_states(), b.all_states());
        assert_eq!(a.all_years(), b.all_years());
        for state in a.all_states() {
            let mut ya: Vec<i32> = a.by_state(state).map(|r| r.year).collect();
            let mut yb: Vec<i32> = b.by_state(state).map(|r| r.year).collect();
            ya.sort_unstable();
            yb.sort_unstable();
            assert_eq!(ya, yb);
        }
    }

    #[test]
    fn rejects_duplicate_key() {
        let mut records = sample();
        records.push(rec("Texas", 2014, 1, 1.0));
        assert_eq!(
            build_index(records).unwrap_err(),
            IndexError::DuplicateKey {
                state: "Texas".to_owned(),
                year: 2014,
            }
        );
    }

    #[test]
    fn rejects_non_finite_rate() {
        let records = vec![rec("Ohio", 2014, 10, f64::NAN)];
        assert!(matches!(
            build_index(records),
            Err(IndexError::InvalidValue { year: 2014, .. })
        ));
    }

    #[test]
    fn rejects_negative_rate_and_blank_state() {
        assert!(build_index(vec![rec("Ohio", 2014, 10, -0.5)]).is_err());
        assert!(build_index(vec![rec("  ", 2014, 10, 0.5)]).is_err());
    }

    #[test]
    fn point_lookup_finds_every_record_regardless_of_input_order() {
        let mut records = sample();
        records.reverse();
        let index = build_index(records).unwrap();
        for record in index.records() {
            let found = index.record(&record.state, record.year).unwrap();
            assert!(std::ptr::eq(found, record), "{:?}", record.key());
        }
        assert!(index.record("Texas", 2016).is_none());
    }

    #[test]
    fn unsorted_input_still_yields_sorted_keys() {
        let index = build_index(vec![
            rec("Wyoming", 2019, 1, 1.0),
            rec("Alabama", 2023, 1, 1.0),
            rec("Maine", 2014, 1, 1.0),
            rec("Alabama", 2016, 1, 1.0),
        ])
        .unwrap();
        assert_eq!(index.all_states(), ["Alabama", "Maine", "Wyoming"]);
        assert_eq!(index.all_years(), [2014, 2016, 2019, 2023]);
    }

    #[test]
    fn empty_input_builds_empty_index() {
        let index = build_index(Vec::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.all_states().is_empty());
        assert_eq!(index.year_range(), None);
    }

    #[test]
    fn iter_by_year_walks_years_ascending() {
        let index = build_index(sample()).unwrap();
        let years: Vec<i32> = index.iter_by_year().map(|r| r.year).collect();
        assert_eq!(years, [2014, 2014, 2015, 2015, 2015]);
    }
}
