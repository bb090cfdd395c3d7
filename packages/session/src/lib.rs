#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard session.
//!
//! A [`Session`] pairs a shared [`Index`] with a [`DashboardConfig`] and
//! builds the snapshot each view renders from. Reloading swaps the index
//! only after a fully successful load; snapshots and handles taken from
//! the old index stay valid.

pub mod config;
pub mod views;

use std::path::Path;
use std::sync::Arc;

use mortality_map_analytics::{
    RankKey, RankOptions, change_summary, domain_of, heatmap_cells, percentage_changes,
    rank_states, scatter_points, scatter_trend, value_domain, year_aggregate,
};
use mortality_map_analytics_models::DerivedChange;
use mortality_map_geography_models::state_abbr;
use mortality_map_index::Index;
use mortality_map_loader::{LoadError, load_index};
use mortality_map_playback::{PlaybackController, PlaybackError, PlaybackObserver};
use thiserror::Error;

pub use config::{DATA_PATH_ENV, DashboardConfig};
pub use views::{ChangeView, ChoroplethFrame, HeatmapView, ScatterView, StateValue};

/// Errors that can occur while running a dashboard session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Loading the dataset failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The configuration file is not valid TOML for [`DashboardConfig`].
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dataset has no records.
    #[error("No mortality records loaded")]
    NoData,

    /// Playback could not be started.
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// A loaded dataset plus the settings every view reads.
#[derive(Debug, Clone)]
pub struct Session {
    index: Arc<Index>,
    config: DashboardConfig,
}

impl Session {
    /// Creates a session over an already built index.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` fails validation.
    pub fn new(index: impl Into<Arc<Index>>, config: DashboardConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            index: index.into(),
            config,
        })
    }

    /// Loads the CSV at `config.data_path` and creates a session over it.
    ///
    /// # Errors
    ///
    /// * [`SessionError::Config`] if no data path is configured or the
    ///   configuration is invalid
    /// * [`SessionError::Load`] if the file cannot be loaded
    /// * [`SessionError::NoData`] if it contains no records
    pub fn open(config: DashboardConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let index = load_nonempty(data_path(&config)?)?;
        Ok(Self {
            index: Arc::new(index),
            config,
        })
    }

    /// Shared handle to the current index.
    #[must_use]
    pub fn index(&self) -> Arc<Index> {
        Arc::clone(&self.index)
    }

    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if `config` fails validation; the
    /// previous configuration is kept.
    pub fn set_config(&mut self, config: DashboardConfig) -> Result<(), SessionError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Re-reads the configured data file and swaps in the new index.
    ///
    /// # Errors
    ///
    /// As [`Self::open`]. On error the current index is left in place.
    pub fn reload(&mut self) -> Result<(), SessionError> {
        let index = load_nonempty(data_path(&self.config)?)?;
        self.replace_index(index);
        Ok(())
    }

    /// Swaps in a freshly built index.
    pub fn replace_index(&mut self, index: impl Into<Arc<Index>>) {
        self.index = index.into();
        log::info!("Session index replaced ({} records)", self.index.len());
    }

    /// Snapshot of the choropleth for `year`.
    #[must_use]
    pub fn choropleth_frame(&self, year: i32) -> ChoroplethFrame {
        let metric = self.config.metric;
        let mut values: Vec<StateValue> = self
            .index
            .by_year(year)
            .map(|r| StateValue {
                state: r.state.clone(),
                abbr: state_abbr(&r.state),
                value: metric.value(r),
            })
            .collect();
        values.sort_by(|a, b| a.state.cmp(&b.state));

        ChoroplethFrame {
            year,
            metric,
            values,
            domain: value_domain(&self.index, metric),
            aggregate: year_aggregate(&self.index, year, metric),
        }
    }

    /// Snapshot of the year-by-state heatmap. Rows are ranked by average
    /// value when sorting is enabled, alphabetical otherwise.
    #[must_use]
    pub fn heatmap_view(&self) -> HeatmapView {
        let metric = self.config.metric;
        let by = if self.config.sort_enabled {
            RankKey::AverageValue
        } else {
            RankKey::Lexicographic
        };
        let states = rank_states(
            self.index.all_states(),
            &self.index,
            metric,
            RankOptions::descending(by),
        );
        let cells = heatmap_cells(&self.index, &states, metric);
        let domain = domain_of(cells.iter().map(|c| c.value));

        HeatmapView {
            metric,
            states,
            years: self.index.all_years().to_vec(),
            cells,
            domain,
        }
    }

    /// Snapshot of the percentage-change view over the configured window.
    ///
    /// # Errors
    ///
    /// * [`SessionError::NoData`] if the index is empty
    /// * [`SessionError::Config`] if the resolved window covers no years
    pub fn change_view(&self) -> Result<ChangeView, SessionError> {
        let metric = self.config.metric;
        let (start_year, end_year) = self.config.change_years(&self.index)?;
        let all = percentage_changes(&self.index, metric, start_year, end_year);
        let summary = change_summary(&all);

        let by = if self.config.sort_enabled {
            RankKey::Change(&all)
        } else {
            RankKey::Lexicographic
        };
        let defined: Vec<String> = all
            .iter()
            .filter(|c| c.percent_change.is_some())
            .map(|c| c.state.clone())
            .collect();
        let order = rank_states(&defined, &self.index, metric, RankOptions::descending(by));

        let (mut changes, undefined): (Vec<DerivedChange>, Vec<DerivedChange>) = all
            .iter()
            .cloned()
            .partition(|c| c.percent_change.is_some());
        changes.sort_by_key(|c| order.iter().position(|s| *s == c.state));

        Ok(ChangeView {
            metric,
            start_year,
            end_year,
            changes,
            undefined,
            summary,
        })
    }

    /// Snapshot of the scatter plot for the configured year filter.
    #[must_use]
    pub fn scatter_view(&self) -> ScatterView {
        let filter = self.config.selected_year;
        let points = scatter_points(&self.index, filter);
        let trend_line = if self.config.show_trend_line {
            scatter_trend(&points)
        } else {
            None
        };

        ScatterView {
            filter,
            x_domain: domain_of(points.iter().map(|p| p.xy().0)),
            y_domain: domain_of(points.iter().map(|p| p.adjusted_rate)),
            points,
            trend_line,
        }
    }

    /// Starts a playback controller looping over every year in the index
    /// at the configured tick interval.
    ///
    /// # Errors
    ///
    /// * [`SessionError::NoData`] if the index is empty
    /// * [`SessionError::Playback`] if the controller cannot start
    pub fn start_playback(
        &self,
        observer: Arc<dyn PlaybackObserver>,
    ) -> Result<PlaybackController, SessionError> {
        let (min_year, max_year) = self.index.year_range().ok_or(SessionError::NoData)?;
        Ok(PlaybackController::new(
            min_year,
            max_year,
            self.config.tick_interval_ms,
            observer,
        )?)
    }
}

fn data_path(config: &DashboardConfig) -> Result<&Path, SessionError> {
    config
        .data_path
        .as_deref()
        .ok_or_else(|| SessionError::Config {
            message: format!("no dataPath configured and {DATA_PATH_ENV} is not set"),
        })
}

fn load_nonempty(path: &Path) -> Result<Index, SessionError> {
    let index = load_index(path)?;
    if index.is_empty() {
        return Err(SessionError::NoData);
    }
    Ok(index)
}
