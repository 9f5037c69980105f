//! Report generation.
//!
//! This module composes aggregation results into a [`Report`] for a given
//! year and region filter, and renders reports as printable Markdown or JSON.

use crate::analysis::{percent_change, previous_year_totals, sum_totals, year_slice};
use crate::models::{
    DetailRow, DetailTable, RegionFilter, Report, ReportSummary, TableMode, VitalRecord,
    YearTotals,
};
use chrono::NaiveDate;

/// Year-over-year birth changes within this band (in percent) count as stable.
pub const STABLE_BAND_PERCENT: f64 = 5.0;

/// Ratio shown when there were no deaths to divide by.
pub const RATIO_UNAVAILABLE: &str = "N/A";

/// Message rendered in place of an empty detail table.
pub const NO_DATA_MESSAGE: &str = "No data available for this selection.";

/// Build the report for `year` under `filter`.
///
/// Pure function of its inputs: the same records, year and filter always
/// produce the same report.
pub fn generate_report(records: &[VitalRecord], year: i32, filter: &RegionFilter) -> Report {
    let current = sum_totals(year_slice(records, year, filter));
    let previous = previous_year_totals(records, year, filter);

    let summary = ReportSummary {
        total_births: current.births,
        total_deaths: current.deaths,
        net_change: current.net_change(),
        birth_death_ratio: birth_death_ratio(current.births, current.deaths),
    };

    let insights = generate_insights(&current, &previous, year.saturating_sub(1));
    let table = detail_table(records, year, filter);

    Report {
        year,
        region: filter.clone(),
        summary,
        previous_year: previous,
        insights,
        table,
    }
}

/// Births per death as `"{ratio:.2}:1"`, or `"N/A"` when there were no deaths.
pub fn birth_death_ratio(births: u64, deaths: u64) -> String {
    if deaths == 0 {
        return RATIO_UNAVAILABLE.to_string();
    }
    format!("{:.2}:1", births as f64 / deaths as f64)
}

/// Narrative insights in display order: birth trend (when a baseline exists),
/// then population change.
pub fn generate_insights(
    current: &YearTotals,
    previous: &YearTotals,
    previous_year: i32,
) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some(insight) = birth_trend_insight(current.births, previous.births, previous_year) {
        insights.push(insight);
    }
    insights.push(population_insight(current.net_change()));

    insights
}

/// Compare births with the previous year. `None` when the previous year had no births.
pub fn birth_trend_insight(births: u64, previous_births: u64, previous_year: i32) -> Option<String> {
    let change = percent_change(births, previous_births)?;

    let insight = if change > STABLE_BAND_PERCENT {
        format!(
            "Significant increase in births by {:.1}% from {}.",
            change, previous_year
        )
    } else if change < -STABLE_BAND_PERCENT {
        // Magnitude first, then round, so both directions round the same way
        format!(
            "Significant decrease in births by {:.1}% from {}.",
            change.abs(),
            previous_year
        )
    } else {
        format!(
            "Birth rate remained relatively stable compared to {}.",
            previous_year
        )
    };

    Some(insight)
}

/// Describe the net population change.
pub fn population_insight(net_change: i64) -> String {
    if net_change > 0 {
        format!(
            "There was a net population increase of {}.",
            format_count(net_change)
        )
    } else {
        format!(
            "There was a net population decrease of {}.",
            format_count(net_change.unsigned_abs())
        )
    }
}

/// Detail rows for the report.
///
/// With no region selected: one row per record of `year`, in record order.
/// With a region selected: every year on record for it, newest first.
pub fn detail_table(records: &[VitalRecord], year: i32, filter: &RegionFilter) -> DetailTable {
    match filter {
        RegionFilter::All => {
            let mut table = DetailTable::new(TableMode::ByRegion);
            table.rows = records
                .iter()
                .filter(|r| r.year == year)
                .map(|r| DetailRow {
                    label: r.region.clone(),
                    births: r.births,
                    deaths: r.deaths,
                })
                .collect();
            table
        }
        RegionFilter::Region(region) => {
            let mut matching: Vec<&VitalRecord> =
                records.iter().filter(|r| &r.region == region).collect();
            matching.sort_by(|a, b| b.year.cmp(&a.year));

            let mut table = DetailTable::new(TableMode::ByYear);
            table.rows = matching
                .into_iter()
                .map(|r| DetailRow {
                    label: r.year.to_string(),
                    births: r.births,
                    deaths: r.deaths,
                })
                .collect();
            table
        }
    }
}

/// Format an integer with thousands separators, e.g. `12,000`.
pub fn format_count<T: Into<i128>>(value: T) -> String {
    let value: i128 = value.into();
    let digits = value.unsigned_abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Generate a complete printable Markdown report.
pub fn generate_markdown_report(report: &Report, generated_on: NaiveDate) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", report.title()));
    output.push_str(&format!(
        "*Generated on {}*\n\n",
        generated_on.format("%Y-%m-%d")
    ));

    output.push_str(&generate_summary_section(report));
    output.push_str(&generate_insights_section(&report.insights));
    output.push_str(&generate_table_section(&report.table));
    output.push_str(&generate_footer());

    output
}

/// Generate the executive summary section.
fn generate_summary_section(report: &Report) -> String {
    let mut section = String::new();
    let summary = &report.summary;
    let previous = &report.previous_year;

    section.push_str("## Executive Summary\n\n");
    section.push_str(&format!(
        "| Metric | {} | {} |\n",
        report.year,
        report.year.saturating_sub(1)
    ));
    section.push_str("|:---|---:|---:|\n");
    section.push_str(&format!(
        "| 👶 Total Births | {} | {} |\n",
        format_count(summary.total_births),
        format_count(previous.births)
    ));
    section.push_str(&format!(
        "| ⚰️ Total Deaths | {} | {} |\n",
        format_count(summary.total_deaths),
        format_count(previous.deaths)
    ));
    section.push_str(&format!(
        "| 📈 Net Population Change | {} | |\n",
        format_count(summary.net_change)
    ));
    section.push_str(&format!(
        "| ⚖️ Birth to Death Ratio | {} | |\n\n",
        summary.birth_death_ratio
    ));

    section
}

/// Generate the key insights section.
fn generate_insights_section(insights: &[String]) -> String {
    let mut section = String::new();

    section.push_str("## Key Insights\n\n");
    for insight in insights {
        section.push_str(&format!("- {}\n", insight));
    }
    section.push('\n');

    section
}

/// Generate the detailed data section.
fn generate_table_section(table: &DetailTable) -> String {
    let mut section = String::new();

    section.push_str("## Detailed Data\n\n");

    if table.is_empty() {
        section.push_str(NO_DATA_MESSAGE);
        section.push_str("\n\n");
        return section;
    }

    section.push_str(&format!("| {} |\n", table.headers.join(" | ")));
    section.push_str("|:---|---:|---:|\n");
    for row in &table.rows {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            row.label,
            format_count(row.births),
            format_count(row.deaths)
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by VitalStats*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lagos_records() -> Vec<VitalRecord> {
        vec![
            VitalRecord::new(2023, "Lagos", 10_000, 2_000),
            VitalRecord::new(2024, "Lagos", 12_000, 2_100),
        ]
    }

    fn lagos() -> RegionFilter {
        RegionFilter::Region("Lagos".to_string())
    }

    #[test]
    fn test_generate_report_lagos_scenario() {
        let report = generate_report(&lagos_records(), 2024, &lagos());

        assert_eq!(report.summary.total_births, 12_000);
        assert_eq!(report.summary.total_deaths, 2_100);
        assert_eq!(report.summary.net_change, 9_900);
        assert_eq!(report.summary.birth_death_ratio, "5.71:1");
        assert_eq!(report.previous_year.births, 10_000);
        assert_eq!(
            report.insights,
            vec![
                "Significant increase in births by 20.0% from 2023.".to_string(),
                "There was a net population increase of 9,900.".to_string(),
            ]
        );
    }

    #[test]
    fn test_generate_report_region_table_is_newest_first() {
        let report = generate_report(&lagos_records(), 2023, &lagos());

        assert_eq!(report.table.mode, TableMode::ByYear);
        let labels: Vec<&str> = report.table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["2024", "2023"]);
    }

    #[test]
    fn test_generate_report_all_regions_table() {
        let mut records = lagos_records();
        records.push(VitalRecord::new(2024, "Kano", 9_000, 3_000));

        let report = generate_report(&records, 2024, &RegionFilter::All);

        assert_eq!(report.table.mode, TableMode::ByRegion);
        assert_eq!(report.table.headers[0], "State");
        let labels: Vec<&str> = report.table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Lagos", "Kano"]);
        assert_eq!(report.summary.total_births, 21_000);
    }

    #[test]
    fn test_generate_report_empty() {
        let report = generate_report(&[], 2024, &RegionFilter::All);

        assert!(report.table.is_empty());
        assert_eq!(report.summary.total_births, 0);
        assert_eq!(report.summary.total_deaths, 0);
        assert_eq!(report.summary.net_change, 0);
        assert_eq!(report.summary.birth_death_ratio, "N/A");
        assert_eq!(
            report.insights,
            vec!["There was a net population decrease of 0.".to_string()]
        );
    }

    #[test]
    fn test_generate_report_huge_counts() {
        let records = vec![
            VitalRecord::new(2024, "Lagos", u64::MAX, 0),
            VitalRecord::new(2024, "Kano", 1, 0),
        ];
        let report = generate_report(&records, 2024, &RegionFilter::All);

        assert_eq!(report.summary.total_births, u64::MAX);
        assert_eq!(report.summary.net_change, i64::MAX);
        assert_eq!(report.summary.birth_death_ratio, "N/A");
    }

    #[test]
    fn test_generate_report_earliest_year() {
        let records = vec![VitalRecord::new(i32::MIN, "Lagos", 100, 40)];
        let report = generate_report(&records, i32::MIN, &RegionFilter::All);

        assert_eq!(report.previous_year, YearTotals::default());
        assert_eq!(report.summary.net_change, 60);
        assert_eq!(
            report.insights,
            vec!["There was a net population increase of 60.".to_string()]
        );

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(generate_markdown_report(&report, date).contains("## Executive Summary"));
    }

    #[test]
    fn test_birth_death_ratio() {
        assert_eq!(birth_death_ratio(500, 0), "N/A");
        assert_eq!(birth_death_ratio(0, 0), "N/A");
        assert_eq!(birth_death_ratio(12_000, 2_100), "5.71:1");
        assert_eq!(birth_death_ratio(100, 100), "1.00:1");
    }

    #[test]
    fn test_birth_trend_insight_branches() {
        assert_eq!(birth_trend_insight(100, 0, 2023), None);
        assert_eq!(
            birth_trend_insight(104, 100, 2023).unwrap(),
            "Birth rate remained relatively stable compared to 2023."
        );
        assert_eq!(
            birth_trend_insight(95, 100, 2023).unwrap(),
            "Birth rate remained relatively stable compared to 2023."
        );
        assert_eq!(
            birth_trend_insight(80, 100, 2023).unwrap(),
            "Significant decrease in births by 20.0% from 2023."
        );
        assert_eq!(
            birth_trend_insight(1_106, 1_000, 2023).unwrap(),
            "Significant increase in births by 10.6% from 2023."
        );
    }

    #[test]
    fn test_population_insight() {
        assert_eq!(
            population_insight(500),
            "There was a net population increase of 500."
        );
        assert_eq!(
            population_insight(-1_234_567),
            "There was a net population decrease of 1,234,567."
        );
        assert_eq!(
            population_insight(0),
            "There was a net population decrease of 0."
        );
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0u64), "0");
        assert_eq!(format_count(999u64), "999");
        assert_eq!(format_count(1_000u64), "1,000");
        assert_eq!(format_count(12_345_678u64), "12,345,678");
        assert_eq!(format_count(-9_900i64), "-9,900");
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = generate_report(&lagos_records(), 2024, &lagos());
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let markdown = generate_markdown_report(&report, date);

        assert!(markdown.contains("# Vital Statistics Report: Lagos - 2024"));
        assert!(markdown.contains("*Generated on 2024-06-01*"));
        assert!(markdown.contains("## Executive Summary"));
        assert!(markdown.contains("| 👶 Total Births | 12,000 | 10,000 |"));
        assert!(markdown.contains("5.71:1"));
        assert!(markdown.contains("## Key Insights"));
        assert!(markdown.contains("| Year | Births | Deaths |"));
        assert!(markdown.contains("| 2024 | 12,000 | 2,100 |"));
    }

    #[test]
    fn test_generate_markdown_report_no_data() {
        let report = generate_report(&[], 2024, &RegionFilter::All);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let markdown = generate_markdown_report(&report, date);

        assert!(markdown.contains("# Vital Statistics Report: Nigeria - 2024"));
        assert!(markdown.contains(NO_DATA_MESSAGE));
        assert!(!markdown.contains("| State | Births | Deaths |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = generate_report(&lagos_records(), 2024, &lagos());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"birth_death_ratio\": \"5.71:1\""));
        assert!(json.contains("\"region\": \"Lagos\""));
        assert!(json.contains("\"mode\": \"by_year\""));
    }
}
