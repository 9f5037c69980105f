//! Record aggregation and statistics.
//!
//! This module provides the pure functions that turn a record collection into
//! year series, regional snapshots and year-over-year comparisons. Every
//! function takes its inputs by reference and returns a fresh value.

use crate::models::{
    DashboardSummary, RegionCatalog, RegionFilter, RegionSummary, TrendDirection, VitalRecord,
    YearSeriesPoint, YearTotals,
};
use std::collections::{BTreeMap, HashMap};

/// Records for one year that pass the region filter.
pub fn year_slice<'a>(
    records: &'a [VitalRecord],
    year: i32,
    filter: &RegionFilter,
) -> Vec<&'a VitalRecord> {
    records
        .iter()
        .filter(|r| r.year == year && filter.matches(&r.region))
        .collect()
}

/// Records (all years) that pass the region filter, in input order.
pub fn filter_by_region(records: &[VitalRecord], filter: &RegionFilter) -> Vec<VitalRecord> {
    records
        .iter()
        .filter(|r| filter.matches(&r.region))
        .cloned()
        .collect()
}

/// Sum births and deaths over a set of records.
///
/// Sums saturate at `u64::MAX` instead of overflowing.
pub fn sum_totals<'a, I>(records: I) -> YearTotals
where
    I: IntoIterator<Item = &'a VitalRecord>,
{
    records
        .into_iter()
        .fold(YearTotals::default(), |mut acc, record| {
            acc.add(record);
            acc
        })
}

/// Totals for one year under the region filter.
pub fn year_totals(records: &[VitalRecord], year: i32, filter: &RegionFilter) -> YearTotals {
    sum_totals(year_slice(records, year, filter))
}

/// Totals for the year before `year` under the region filter.
///
/// Empty when `year` has no predecessor (`i32::MIN`).
pub fn previous_year_totals(
    records: &[VitalRecord],
    year: i32,
    filter: &RegionFilter,
) -> YearTotals {
    match year.checked_sub(1) {
        Some(previous) => year_totals(records, previous, filter),
        None => YearTotals::default(),
    }
}

/// Distinct years present in the records, most recent first.
pub fn distinct_years(records: &[VitalRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Yearly totals in ascending year order.
///
/// Only years that have at least one matching record appear; gaps are not
/// interpolated.
pub fn series_by_year(records: &[VitalRecord], filter: &RegionFilter) -> Vec<YearSeriesPoint> {
    let mut by_year: BTreeMap<i32, YearTotals> = BTreeMap::new();

    for record in records.iter().filter(|r| filter.matches(&r.region)) {
        let totals = by_year.entry(record.year).or_default();
        totals.add(record);
    }

    by_year
        .into_iter()
        .map(|(year, totals)| YearSeriesPoint {
            year,
            total_births: totals.births,
            total_deaths: totals.deaths,
        })
        .collect()
}

/// One entry per catalog region for `year`, sorted by births (highest first).
///
/// Regions without a record for the year are reported with zero births and
/// deaths. Ties keep catalog order.
pub fn regional_snapshot(
    records: &[VitalRecord],
    year: i32,
    catalog: &RegionCatalog,
) -> Vec<RegionSummary> {
    let mut by_region: HashMap<&str, &VitalRecord> = HashMap::new();
    for record in records.iter().filter(|r| r.year == year) {
        by_region.entry(record.region.as_str()).or_insert(record);
    }

    let mut snapshot: Vec<RegionSummary> = catalog
        .names()
        .iter()
        .map(|region| {
            let record = by_region.get(region.as_str());
            RegionSummary {
                region: region.clone(),
                births: record.map_or(0, |r| r.births),
                deaths: record.map_or(0, |r| r.deaths),
            }
        })
        .collect();

    // sort_by is stable, so equal birth counts stay in catalog order
    snapshot.sort_by(|a, b| b.births.cmp(&a.births));
    snapshot
}

/// The first `n` entries of a snapshot (what the regional chart displays).
pub fn top_regions(snapshot: &[RegionSummary], n: usize) -> &[RegionSummary] {
    &snapshot[..n.min(snapshot.len())]
}

/// Percentage change from `previous` to `current`.
///
/// Returns `None` when there is no baseline (`previous == 0`).
pub fn percent_change(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

/// Round to one decimal place, folding `-0.0` into `0.0`.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0 + 0.0
}

/// `part` as a percentage of `whole`, formatted with one decimal.
fn share_percent(part: u64, whole: f64) -> String {
    if whole == 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole * 100.0)
}

/// Headline dashboard figures for `year` compared with `year - 1`.
pub fn dashboard_summary(
    records: &[VitalRecord],
    year: i32,
    filter: &RegionFilter,
) -> DashboardSummary {
    let current = year_totals(records, year, filter);
    let previous = previous_year_totals(records, year, filter);

    let trend = percent_change(current.births, previous.births)
        .map(round_one_decimal)
        .unwrap_or(0.0);
    let trend_direction = if trend >= 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    let population = current.births as f64 + current.deaths as f64;

    DashboardSummary {
        year,
        previous_year: year.saturating_sub(1),
        total_births: current.births,
        total_deaths: current.deaths,
        birth_rate: share_percent(current.births, population),
        death_rate: share_percent(current.deaths, population),
        birth_trend: format!("{:.1}%", trend),
        trend_direction,
    }
}
