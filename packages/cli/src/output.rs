//! Plain-text and JSON rendering of dashboard snapshots.

use mortality_map_analytics_models::{AggregateKind, ValueDomain, YearAggregate};
use mortality_map_geography_models::state_abbr;
use mortality_map_playback::PlaybackState;
use mortality_map_record_models::Metric;
use mortality_map_session::{ChangeView, ChoroplethFrame, HeatmapView, ScatterView};
use serde::Serialize;

/// Dataset overview printed by `summary`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub metric: Metric,
    pub records: usize,
    pub states: usize,
    pub years: Vec<i32>,
    pub aggregates: Vec<YearAggregate>,
}

/// Colour domain and legend stops printed by `domain`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainReport {
    pub metric: Metric,
    pub domain: ValueDomain,
    pub stops: Vec<f64>,
}

/// One line of `rank` output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub rank: usize,
    pub state: String,
    pub value: Option<f64>,
}

/// Writes `value` as pretty JSON when `json` is set, otherwise hands it to
/// `print`.
pub fn emit<T: Serialize + ?Sized>(
    value: &T,
    json: bool,
    print: impl FnOnce(&T),
) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print(value);
    }
    Ok(())
}

fn fmt_value(value: f64, metric: Metric) -> String {
    let precision = metric.display_precision();
    format!("{value:.precision$}")
}

fn fmt_percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |p| format!("{p:+.1}%"))
}

pub fn print_summary(summary: &DatasetSummary) {
    let (first, last) = (summary.years.first(), summary.years.last());
    println!(
        "{} records, {} states, years {}-{}",
        summary.records,
        summary.states,
        first.map_or_else(String::new, ToString::to_string),
        last.map_or_else(String::new, ToString::to_string),
    );
    println!();
    println!("{:<6} {:>8} {:>14}", "YEAR", "STATES", summary.metric.label());
    println!("{}", "-".repeat(30));
    for aggregate in &summary.aggregates {
        let suffix = match aggregate.kind {
            AggregateKind::Total => "",
            AggregateKind::Average => " avg",
        };
        println!(
            "{:<6} {:>8} {:>14}{suffix}",
            aggregate.year,
            aggregate.record_count,
            fmt_value(aggregate.value, summary.metric),
        );
    }
}

pub fn print_domain(report: &DomainReport) {
    println!(
        "{}: {} to {}",
        report.metric.label(),
        fmt_value(report.domain.min, report.metric),
        fmt_value(report.domain.max, report.metric),
    );
    let stops: Vec<String> = report
        .stops
        .iter()
        .map(|&s| fmt_value(s, report.metric))
        .collect();
    println!("Legend: {}", stops.join(" | "));
}

pub fn print_changes(view: &ChangeView) {
    println!(
        "{} change {} -> {}",
        view.metric.label(),
        view.start_year,
        view.end_year
    );
    println!("{}", "-".repeat(48));
    for change in &view.changes {
        println!(
            "{:<4} {:<22} {:>9} {:>10}",
            state_abbr(&change.state),
            change.state,
            fmt_percent(change.percent_change),
            fmt_value(change.absolute_change, view.metric),
        );
    }
    for change in &view.undefined {
        println!(
            "{:<4} {:<22} {:>9} {:>10}",
            state_abbr(&change.state),
            change.state,
            fmt_percent(None),
            fmt_value(change.absolute_change, view.metric),
        );
    }

    if let Some(summary) = &view.summary {
        println!();
        println!(
            "Average {}  |  max increase {}  |  max decrease {}",
            fmt_percent(Some(summary.average_percent_change)),
            fmt_percent(Some(summary.max_increase)),
            fmt_percent(Some(summary.max_decrease)),
        );
        println!(
            "{} increased, {} decreased, {} without a defined change",
            summary.states_increased, summary.states_decreased, summary.states_excluded
        );
    }
}

pub fn print_rank(entries: &[RankEntry], metric: Metric, percent: bool) {
    for entry in entries {
        let value = if percent {
            fmt_percent(entry.value)
        } else {
            entry
                .value
                .map_or_else(|| "n/a".to_string(), |v| fmt_value(v, metric))
        };
        println!("{:>3}. {:<22} {value:>10}", entry.rank, entry.state);
    }
}

pub fn print_heatmap(view: &HeatmapView) {
    print!("{:<4}", "");
    for year in &view.years {
        print!(" {year:>7}");
    }
    println!();

    for state in &view.states {
        print!("{:<4}", state_abbr(state));
        for year in &view.years {
            let cell = view
                .cells
                .iter()
                .find(|c| c.year == *year && c.state == *state);
            match cell {
                Some(cell) => print!(" {:>7}", fmt_value(cell.value, view.metric)),
                None => print!(" {:>7}", "-"),
            }
        }
        println!();
    }
}

pub fn print_scatter(view: &ScatterView) {
    println!("{} points ({})", view.points.len(), view.filter);
    if let (Some(x), Some(y)) = (view.x_domain, view.y_domain) {
        println!("Deaths {:.0}-{:.0}, rate {:.1}-{:.1}", x.min, x.max, y.min, y.max);
    }
    match view.trend_line {
        Some(trend) => println!(
            "Trend: rate = {:.6} * deaths + {:.3} ({:.0}, {:.2}) -> ({:.0}, {:.2})",
            trend.slope, trend.intercept, trend.x1, trend.y1, trend.x2, trend.y2
        ),
        None => println!("Trend: none"),
    }
}

pub fn print_frame(frame: &ChoroplethFrame, state: &PlaybackState) {
    let (ordinal, total) = state.position();
    let footer = frame.aggregate.map_or_else(String::new, |a| match a.kind {
        AggregateKind::Total => format!("total {}", fmt_value(a.value, frame.metric)),
        AggregateKind::Average => format!("average {}", fmt_value(a.value, frame.metric)),
    });
    println!("{} (year {ordinal} of {total})  {footer}", frame.year);

    let line: Vec<String> = frame
        .values
        .iter()
        .map(|v| {
            let shade = frame.domain.map_or(0.0, |d| d.normalize(v.value));
            format!("{}:{}{}", v.abbr, fmt_value(v.value, frame.metric), shade_mark(shade))
        })
        .collect();
    println!("  {}", line.join(" "));
}

/// Single-character intensity marker for a value normalised onto `[0, 1]`.
fn shade_mark(normalized: f64) -> char {
    const MARKS: [char; 5] = [' ', '.', ':', '*', '#'];
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let i = (normalized * 4.0).round() as usize;
    MARKS[i.min(MARKS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_use_metric_precision() {
        assert_eq!(fmt_value(1234.0, Metric::DeathCount), "1234");
        assert_eq!(fmt_value(15.26, Metric::AdjustedRate), "15.3");
    }

    #[test]
    fn percent_is_signed_or_na() {
        assert_eq!(fmt_percent(Some(12.34)), "+12.3%");
        assert_eq!(fmt_percent(Some(-5.0)), "-5.0%");
        assert_eq!(fmt_percent(None), "n/a");
    }

    #[test]
    fn shade_spans_marks() {
        assert_eq!(shade_mark(0.0), ' ');
        assert_eq!(shade_mark(0.5), ':');
        assert_eq!(shade_mark(1.0), '#');
    }
}
