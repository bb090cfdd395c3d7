//! Dashboard configuration loaded from TOML.
//!
//! Every key is optional and camelCase:
//!
//! ```toml
//! metric = "adjustedRate"
//! sortEnabled = true
//! selectedYear = "all"
//! showTrendLine = true
//! tickIntervalMs = 1500
//! changeStartYear = 2014
//! changeEndYear = 2023
//! dataPath = "data/mortality.csv"
//! ```

use std::path::{Path, PathBuf};

use mortality_map_index::Index;
use mortality_map_record_models::{Metric, YearFilter};
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Environment variable overriding [`DashboardConfig::data_path`].
pub const DATA_PATH_ENV: &str = "MORTALITY_MAP_DATA";

/// Default playback tick interval.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1500;

/// User-adjustable dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    /// Metric driving colour scales, rankings and changes.
    pub metric: Metric,
    /// Rank states by value instead of alphabetically.
    pub sort_enabled: bool,
    /// Year shown by the scatter plot.
    pub selected_year: YearFilter,
    /// Fit and show a regression line on the scatter plot.
    pub show_trend_line: bool,
    /// Milliseconds between playback ticks.
    pub tick_interval_ms: u64,
    /// Start of the change window. Defaults to the first year in the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_start_year: Option<i32>,
    /// End of the change window. Defaults to the last year in the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_end_year: Option<i32>,
    /// CSV file to load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            sort_enabled: true,
            selected_year: YearFilter::All,
            show_trend_line: true,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            change_start_year: None,
            change_end_year: None,
            data_path: None,
        }
    }
}

impl DashboardConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// * [`SessionError::Toml`] if the document is malformed
    /// * [`SessionError::Config`] if a value is out of range
    pub fn from_toml_str(toml_str: &str) -> Result<Self, SessionError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the file cannot be read, otherwise
    /// as [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        log::debug!("Reading dashboard config from {}", path.display());
        let toml_str = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&toml_str)?.with_env_overrides())
    }

    /// Applies [`DATA_PATH_ENV`] if it is set.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_data_path_override(std::env::var_os(DATA_PATH_ENV).map(PathBuf::from))
    }

    /// Replaces `data_path` when `path` is `Some`.
    #[must_use]
    pub fn with_data_path_override(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            log::debug!("Data path overridden: {}", path.display());
            self.data_path = Some(path);
        }
        self
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `tick_interval_ms` is zero or the
    /// change window is empty or inverted.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.tick_interval_ms == 0 {
            return Err(SessionError::Config {
                message: "tickIntervalMs must be greater than zero".to_string(),
            });
        }
        if let (Some(start), Some(end)) = (self.change_start_year, self.change_end_year)
            && start >= end
        {
            return Err(SessionError::Config {
                message: format!(
                    "changeStartYear ({start}) must be before changeEndYear ({end})"
                ),
            });
        }
        Ok(())
    }

    /// Resolves the change window against `index`, filling unset ends from
    /// its year range.
    ///
    /// # Errors
    ///
    /// * [`SessionError::NoData`] if the index is empty
    /// * [`SessionError::Config`] if the resolved window is empty or
    ///   inverted
    pub fn change_years(&self, index: &Index) -> Result<(i32, i32), SessionError> {
        let (first, last) = index.year_range().ok_or(SessionError::NoData)?;
        let start = self.change_start_year.unwrap_or(first);
        let end = self.change_end_year.unwrap_or(last);
        if start >= end {
            return Err(SessionError::Config {
                message: format!("change window {start}..{end} covers no years"),
            });
        }
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use mortality_map_index::build_index;
    use mortality_map_record_models::Record;

    use super::*;

    fn index(years: &[i32]) -> Index {
        build_index(
            years
                .iter()
                .map(|&year| Record {
                    year,
                    state: "Utah".to_owned(),
                    death_count: 1,
                    adjusted_rate: 1.0,
                    source_url: String::new(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.metric, Metric::AdjustedRate);
        assert!(config.sort_enabled);
        assert!(config.show_trend_line);
        assert_eq!(config.tick_interval_ms, 1500);
        assert_eq!(config.selected_year, YearFilter::All);
    }

    #[test]
    fn parses_every_key() {
        let config = DashboardConfig::from_toml_str(
            r#"
            metric = "deaths"
            sortEnabled = false
            selectedYear = 2018
            showTrendLine = false
            tickIntervalMs = 500
            changeStartYear = 2015
            changeEndYear = 2020
            dataPath = "data/mortality.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.metric, Metric::DeathCount);
        assert!(!config.sort_enabled);
        assert_eq!(config.selected_year, YearFilter::Year(2018));
        assert!(!config.show_trend_line);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.change_start_year, Some(2015));
        assert_eq!(config.change_end_year, Some(2020));
        assert_eq!(config.data_path, Some(PathBuf::from("data/mortality.csv")));
    }

    #[test]
    fn rejects_zero_tick_interval() {
        assert!(matches!(
            DashboardConfig::from_toml_str("tickIntervalMs = 0"),
            Err(SessionError::Config { .. })
        ));
    }

    #[test]
    fn rejects_inverted_change_window() {
        assert!(matches!(
            DashboardConfig::from_toml_str("changeStartYear = 2020\nchangeEndYear = 2014"),
            Err(SessionError::Config { .. })
        ));
    }

    #[test]
    fn rejects_unknown_metric() {
        assert!(matches!(
            DashboardConfig::from_toml_str("metric = \"population\""),
            Err(SessionError::Toml(_))
        ));
    }

    #[test]
    fn data_path_override_wins_when_present() {
        let config = DashboardConfig {
            data_path: Some(PathBuf::from("a.csv")),
            ..DashboardConfig::default()
        };
        let kept = config.clone().with_data_path_override(None);
        assert_eq!(kept.data_path, Some(PathBuf::from("a.csv")));
        let replaced = config.with_data_path_override(Some(PathBuf::from("b.csv")));
        assert_eq!(replaced.data_path, Some(PathBuf::from("b.csv")));
    }

    #[test]
    fn change_years_default_to_data_range() {
        let config = DashboardConfig::default();
        assert_eq!(
            config.change_years(&index(&[2016, 2014, 2021])).unwrap(),
            (2014, 2021)
        );

        let partial = DashboardConfig {
            change_start_year: Some(2016),
            ..DashboardConfig::default()
        };
        assert_eq!(
            partial.change_years(&index(&[2014, 2016, 2021])).unwrap(),
            (2016, 2021)
        );
    }

    #[test]
    fn change_years_need_two_distinct_years() {
        let config = DashboardConfig::default();
        assert!(matches!(
            config.change_years(&index(&[2020])),
            Err(SessionError::Config { .. })
        ));
        assert!(matches!(
            config.change_years(&index(&[])),
            Err(SessionError::NoData)
        ));
    }
}
