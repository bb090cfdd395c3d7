#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the mortality dashboard engine.
//!
//! Loads a mortality CSV, then prints one dashboard view as a table or,
//! with `--json`, as the serialised snapshot.

mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use mortality_map_analytics::{
    RankKey, RankOptions, percentage_changes, rank_states, state_average, value_domain,
    year_aggregate,
};
use mortality_map_analytics_models::RankOrder;
use mortality_map_playback::{PlaybackState, UpdateCause};
use mortality_map_record_models::{Metric, YearFilter};
use mortality_map_session::{DashboardConfig, Session};
use tokio::sync::mpsc;

use crate::output::{DatasetSummary, DomainReport, RankEntry};

#[derive(Parser)]
#[command(name = "mortality_map", about = "US mortality dashboard tool")]
struct Cli {
    /// Dashboard config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Mortality CSV (overrides `dataPath` and `MORTALITY_MAP_DATA`)
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    /// Metric to use: `deathCount` or `adjustedRate`
    #[arg(long, global = true, value_parser = parse_metric)]
    metric: Option<Metric>,
    /// Print the snapshot as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dataset overview with per-year totals or averages
    Summary,
    /// Colour domain of the metric across all years
    Domain {
        /// Number of legend intervals
        #[arg(long, default_value = "10")]
        steps: u32,
    },
    /// Percentage change per state between two years
    Changes {
        /// Start year (defaults to the first year in the data)
        #[arg(long)]
        start: Option<i32>,
        /// End year (defaults to the last year in the data)
        #[arg(long)]
        end: Option<i32>,
        /// List states alphabetically instead of by change
        #[arg(long)]
        unsorted: bool,
    },
    /// Rank states
    Rank {
        /// Ranking key
        #[arg(long, value_enum, default_value = "average")]
        by: RankBy,
        /// Smallest first
        #[arg(long)]
        ascending: bool,
        /// Show only the first N states
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Year-by-state matrix
    Heatmap {
        /// List states alphabetically instead of by average value
        #[arg(long)]
        unsorted: bool,
    },
    /// Deaths versus rate points with a fitted trend line
    Scatter {
        /// `all` or a single year
        #[arg(long)]
        year: Option<YearFilter>,
        /// Skip the trend line
        #[arg(long)]
        no_trend: bool,
    },
    /// Animate the choropleth year by year
    Play {
        /// Milliseconds between years
        #[arg(long)]
        interval_ms: Option<u64>,
        /// Number of passes over the year range
        #[arg(long, default_value = "1")]
        loops: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RankBy {
    /// Mean value across all years
    Average,
    /// Percentage change over the configured window
    Change,
    /// Alphabetical
    Name,
}

fn parse_metric(value: &str) -> Result<Metric, String> {
    value
        .parse()
        .map_err(|_| format!("unknown metric '{value}' (expected deathCount or adjustedRate)"))
}

#[allow(clippy::too_many_lines)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default().with_env_overrides(),
    };
    config = config.with_data_path_override(cli.data.clone());
    if let Some(metric) = cli.metric {
        config.metric = metric;
    }

    match &cli.command {
        Commands::Changes {
            start,
            end,
            unsorted,
        } => {
            config.change_start_year = start.or(config.change_start_year);
            config.change_end_year = end.or(config.change_end_year);
            config.sort_enabled &= !unsorted;
        }
        Commands::Heatmap { unsorted } => config.sort_enabled &= !unsorted,
        Commands::Scatter { year, no_trend } => {
            if let Some(year) = year {
                config.selected_year = *year;
            }
            config.show_trend_line &= !no_trend;
        }
        Commands::Play { interval_ms, .. } => {
            if let Some(ms) = interval_ms {
                config.tick_interval_ms = *ms;
            }
        }
        Commands::Summary | Commands::Domain { .. } | Commands::Rank { .. } => {}
    }

    let session = Session::open(config)?;
    let index = session.index();
    let metric = session.config().metric;

    match cli.command {
        Commands::Summary => {
            let summary = DatasetSummary {
                metric,
                records: index.len(),
                states: index.all_states().len(),
                years: index.all_years().to_vec(),
                aggregates: index
                    .all_years()
                    .iter()
                    .filter_map(|&year| year_aggregate(&index, year, metric))
                    .collect(),
            };
            output::emit(&summary, cli.json, output::print_summary)?;
        }
        Commands::Domain { steps } => {
            let domain = value_domain(&index, metric).ok_or("No values to derive a domain from")?;
            let report = DomainReport {
                metric,
                domain,
                stops: domain.stops(steps),
            };
            output::emit(&report, cli.json, output::print_domain)?;
        }
        Commands::Changes { .. } => {
            output::emit(&session.change_view()?, cli.json, output::print_changes)?;
        }
        Commands::Rank {
            by,
            ascending,
            limit,
        } => {
            let order = if ascending {
                RankOrder::Ascending
            } else {
                RankOrder::Descending
            };
            let changes = match by {
                RankBy::Change => {
                    let (start, end) = session.config().change_years(&index)?;
                    percentage_changes(&index, metric, start, end)
                }
                RankBy::Average | RankBy::Name => Vec::new(),
            };
            let key = match by {
                RankBy::Average => RankKey::AverageValue,
                RankBy::Change => RankKey::Change(&changes),
                RankBy::Name => RankKey::Lexicographic,
            };

            let ranked = rank_states(
                index.all_states(),
                &index,
                metric,
                RankOptions { by: key, order },
            );
            let entries: Vec<RankEntry> = ranked
                .into_iter()
                .take(limit.unwrap_or(usize::MAX))
                .enumerate()
                .map(|(i, state)| {
                    let value = match by {
                        RankBy::Change => changes
                            .iter()
                            .find(|c| c.state == state)
                            .and_then(|c| c.percent_change),
                        RankBy::Average | RankBy::Name => state_average(&index, &state, metric),
                    };
                    RankEntry {
                        rank: i + 1,
                        state,
                        value,
                    }
                })
                .collect();
            output::emit(&entries, cli.json, |entries| {
                output::print_rank(entries, metric, matches!(by, RankBy::Change));
            })?;
        }
        Commands::Heatmap { .. } => {
            output::emit(&session.heatmap_view(), cli.json, output::print_heatmap)?;
        }
        Commands::Scatter { .. } => {
            output::emit(&session.scatter_view(), cli.json, output::print_scatter)?;
        }
        Commands::Play { loops, .. } => play(&session, loops, cli.json).await?,
    }

    Ok(())
}

/// Runs the animated choropleth until every year has been shown `loops`
/// times.
async fn play(session: &Session, loops: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(PlaybackState, UpdateCause)>();
    let observer = move |state: &PlaybackState, cause: UpdateCause| {
        if tx.send((*state, cause)).is_err() {
            log::debug!("Playback receiver closed");
        }
    };

    let controller = session.start_playback(Arc::new(observer))?;
    let frames = u64::from(loops.max(1)) * u64::from(controller.state().year_count());
    let mut shown = 0_u64;

    while let Some((state, _cause)) = rx.recv().await {
        let frame = session.choropleth_frame(state.current_year);
        output::emit(&frame, json, |frame| output::print_frame(frame, &state))?;
        shown += 1;
        if shown >= frames {
            break;
        }
    }

    controller.stop();
    Ok(())
}
