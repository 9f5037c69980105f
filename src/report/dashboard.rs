//! Dashboard view model and terminal rendering.
//!
//! The dashboard combines the headline cards, the yearly trend series for the
//! selected scope and the national regional breakdown for the reference year.

use crate::analysis::{dashboard_summary, regional_snapshot, series_by_year, top_regions};
use crate::models::{
    DashboardSummary, RegionCatalog, RegionFilter, RegionSummary, VitalRecord, YearSeriesPoint,
};
use crate::report::format_count;
use serde::Serialize;

/// Width of the longest bar in the text charts.
const BAR_WIDTH: usize = 40;

/// Everything the dashboard displays.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// `"Nigeria"` or the selected region.
    pub scope: String,
    pub summary: DashboardSummary,
    /// Yearly totals for the selected scope, oldest first.
    pub trend: Vec<YearSeriesPoint>,
    /// Leading regions nationally for the reference year.
    pub regions: Vec<RegionSummary>,
}

/// Assemble the dashboard for `year`.
///
/// The trend series and headline cards follow `filter`; the regional
/// breakdown always covers the whole catalog so regions can be compared.
pub fn build_dashboard(
    records: &[VitalRecord],
    catalog: &RegionCatalog,
    year: i32,
    filter: &RegionFilter,
    top_n: usize,
) -> DashboardView {
    let snapshot = regional_snapshot(records, year, catalog);

    DashboardView {
        scope: filter.scope_label().to_string(),
        summary: dashboard_summary(records, year, filter),
        trend: series_by_year(records, filter),
        regions: top_regions(&snapshot, top_n).to_vec(),
    }
}

/// Render the dashboard for a terminal.
pub fn render_dashboard_text(view: &DashboardView) -> String {
    let mut out = String::new();
    let summary = &view.summary;

    let heading = match view.scope.as_str() {
        crate::models::NATIONAL_SCOPE => "National Overview".to_string(),
        region => format!("{} State", region),
    };
    out.push_str(&format!("📊 {}\n\n", heading));

    out.push_str(&format!(
        "   Total Births ({}): {}  {} {} from last year\n",
        summary.year,
        format_count(summary.total_births),
        summary.trend_direction.emoji(),
        summary.birth_trend
    ));
    out.push_str(&format!(
        "   Total Deaths ({}): {}\n",
        summary.year,
        format_count(summary.total_deaths)
    ));
    out.push_str(&format!("   Birth Rate: {}\n", summary.birth_rate));
    out.push_str(&format!("   Death Rate: {}\n\n", summary.death_rate));

    out.push_str("📈 Yearly Trends\n\n");
    if view.trend.is_empty() {
        out.push_str("   No data available for this selection.\n");
    } else {
        let max = view.trend.iter().map(|p| p.total_births).max().unwrap_or(0);
        for point in &view.trend {
            out.push_str(&format!(
                "   {}  {:<width$}  births {:>12}  deaths {:>12}\n",
                point.year,
                bar(point.total_births, max),
                format_count(point.total_births),
                format_count(point.total_deaths),
                width = BAR_WIDTH
            ));
        }
    }
    out.push('\n');

    out.push_str(&format!(
        "🗺️  Regional Breakdown ({}, top {})\n\n",
        summary.year,
        view.regions.len()
    ));
    let max = view.regions.iter().map(|r| r.births).max().unwrap_or(0);
    let name_width = view
        .regions
        .iter()
        .map(|r| r.region.chars().count())
        .max()
        .unwrap_or(0);
    for region in &view.regions {
        out.push_str(&format!(
            "   {:<name_width$}  {:<width$}  births {:>12}  deaths {:>12}\n",
            region.region,
            bar(region.births, max),
            format_count(region.births),
            format_count(region.deaths),
            name_width = name_width,
            width = BAR_WIDTH
        ));
    }

    out
}

/// Render the dashboard as pretty JSON.
pub fn render_dashboard_json(view: &DashboardView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(view)
}

/// Horizontal bar proportional to `value / max`.
fn bar(value: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len)
}
