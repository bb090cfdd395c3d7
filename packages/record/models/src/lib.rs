#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Mortality record types and metric selection.
//!
//! A [`Record`] is one (state, year) observation. Every other crate in the
//! workspace reads records through a [`Metric`], so views never hard-code
//! which numeric field they are colouring or ranking by.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One (state, year) observation.
///
/// The `(state, year)` pair is the natural key and is unique within a
/// dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Calendar year of the observation.
    pub year: i32,
    /// Full state name (e.g. "New Mexico").
    pub state: String,
    /// Number of deaths recorded.
    pub death_count: u64,
    /// Age-adjusted death rate per 100,000 population.
    pub adjusted_rate: f64,
    /// Link to the source table this row was taken from.
    pub source_url: String,
}

impl Record {
    /// Returns the `(state, year)` natural key of this record.
    #[must_use]
    pub fn key(&self) -> (&str, i32) {
        (self.state.as_str(), self.year)
    }
}

/// The numeric field driving colour scales and derived computations.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Metric {
    /// Raw death count.
    #[serde(rename = "deathCount", alias = "deaths")]
    #[strum(to_string = "deathCount", serialize = "deaths")]
    DeathCount,
    /// Age-adjusted death rate.
    #[default]
    #[serde(rename = "adjustedRate", alias = "rate")]
    #[strum(to_string = "adjustedRate", serialize = "rate")]
    AdjustedRate,
}

impl Metric {
    /// Reads this metric's field from a record.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn value(self, record: &Record) -> f64 {
        match self {
            Self::DeathCount => record.death_count as f64,
            Self::AdjustedRate => record.adjusted_rate,
        }
    }

    /// Human-readable label used for legends and column headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DeathCount => "Total Deaths",
            Self::AdjustedRate => "Age Adjusted Rate",
        }
    }

    /// Number of decimal places values of this metric are displayed with.
    #[must_use]
    pub const fn display_precision(self) -> usize {
        match self {
            Self::DeathCount => 0,
            Self::AdjustedRate => 1,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::DeathCount, Self::AdjustedRate]
    }
}

/// Which years a view should include: every year, or a single one.
///
/// Serialises as the string `"all"` or as a bare integer year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearFilterRepr", into = "YearFilterRepr")]
pub enum YearFilter {
    /// Every year in the dataset.
    #[default]
    All,
    /// A single year.
    Year(i32),
}

impl YearFilter {
    /// Returns `true` if `year` passes this filter.
    #[must_use]
    pub const fn matches(self, year: i32) -> bool {
        match self {
            Self::All => true,
            Self::Year(selected) => selected == year,
        }
    }
}

impl std::fmt::Display for YearFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Year(year) => write!(f, "{year}"),
        }
    }
}

/// Error returned when a string is neither `"all"` nor an integer year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidYearFilterError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidYearFilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid year filter '{}': expected \"all\" or a year",
            self.value
        )
    }
}

impl std::error::Error for InvalidYearFilterError {}

impl FromStr for YearFilter {
    type Err = InvalidYearFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<i32>()
            .map(Self::Year)
            .map_err(|_| InvalidYearFilterError {
                value: s.to_owned(),
            })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum YearFilterRepr {
    Year(i32),
    Keyword(String),
}

impl TryFrom<YearFilterRepr> for YearFilter {
    type Error = InvalidYearFilterError;

    fn try_from(repr: YearFilterRepr) -> Result<Self, Self::Error> {
        match repr {
            YearFilterRepr::Year(year) => Ok(Self::Year(year)),
            YearFilterRepr::Keyword(keyword) => keyword.parse(),
        }
    }
}

impl From<YearFilter> for YearFilterRepr {
    fn from(filter: YearFilter) -> Self {
        match filter {
            YearFilter::All => Self::Keyword("all".to_owned()),
            YearFilter::Year(year) => Self::Year(year),
        }
    }
}
