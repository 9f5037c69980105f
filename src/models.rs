//! Data models for vital-records statistics.
//!
//! This module contains the core data structures used throughout
//! the application for representing records, filters, aggregates and reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Sentinel accepted wherever a region filter is expected, meaning every region.
pub const ALL_REGIONS: &str = "all";

/// Label used for the national scope in report titles and export filenames.
pub const NATIONAL_SCOPE: &str = "Nigeria";

/// Default region catalog: the 36 Nigerian states and the FCT, in display order.
pub const NIGERIAN_STATES: [&str; 37] = [
    "Abia",
    "Adamawa",
    "Akwa Ibom",
    "Anambra",
    "Bauchi",
    "Bayelsa",
    "Benue",
    "Borno",
    "Cross River",
    "Delta",
    "Ebonyi",
    "Edo",
    "Ekiti",
    "Enugu",
    "FCT - Abuja",
    "Gombe",
    "Imo",
    "Jigawa",
    "Kaduna",
    "Kano",
    "Katsina",
    "Kebbi",
    "Kogi",
    "Kwara",
    "Lagos",
    "Nasarawa",
    "Niger",
    "Ogun",
    "Ondo",
    "Osun",
    "Oyo",
    "Plateau",
    "Rivers",
    "Sokoto",
    "Taraba",
    "Yobe",
    "Zamfara",
];

/// A single vital-records row: births and deaths for one region in one year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VitalRecord {
    /// Calendar year the counts refer to.
    pub year: i32,
    /// Region (state) name, a member of the region catalog.
    pub region: String,
    /// Registered births.
    pub births: u64,
    /// Registered deaths.
    pub deaths: u64,
}

impl VitalRecord {
    /// Creates a new record.
    pub fn new(year: i32, region: impl Into<String>, births: u64, deaths: u64) -> Self {
        Self {
            year,
            region: region.into(),
            births,
            deaths,
        }
    }
}

/// Ordered set of fixed region names.
///
/// Order matters: it is the tie-break order for regional snapshots and the
/// order regions are listed in filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCatalog {
    names: Vec<String>,
}

impl RegionCatalog {
    /// Builds a catalog, dropping blank and repeated names while keeping first-seen order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into().trim().to_string();
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    /// The default Nigerian catalog.
    pub fn nigeria() -> Self {
        Self::new(NIGERIAN_STATES)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Finds the canonical spelling of a region name, ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::nigeria()
    }
}

/// Errors raised when turning user-supplied filter values into typed filters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Unknown region '{0}' (use 'all' or a name from the region catalog)")]
    UnknownRegion(String),

    #[error("Year {year} is not present in the dataset (available: {available})")]
    YearNotAvailable { year: i32, available: String },

    #[error("The dataset contains no records, so there is no year to select")]
    NoYears,
}

/// Region selection applied to aggregations, reports and exports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RegionFilter {
    /// Every region (the `"all"` sentinel).
    #[default]
    All,
    /// A single catalog region.
    Region(String),
}

impl RegionFilter {
    /// Parses a filter value against the catalog.
    ///
    /// `"all"` (any case) selects every region; anything else must name a
    /// catalog region and is normalised to the catalog spelling.
    pub fn parse(input: &str, catalog: &RegionCatalog) -> Result<Self, FilterError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case(ALL_REGIONS) {
            return Ok(RegionFilter::All);
        }

        catalog
            .resolve(trimmed)
            .map(|name| RegionFilter::Region(name.to_string()))
            .ok_or_else(|| FilterError::UnknownRegion(trimmed.to_string()))
    }

    /// Returns true when a record from `region` passes this filter.
    pub fn matches(&self, region: &str) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Region(selected) => selected == region,
        }
    }

    /// The selected region, if any.
    pub fn region(&self) -> Option<&str> {
        match self {
            RegionFilter::All => None,
            RegionFilter::Region(name) => Some(name),
        }
    }

    /// Human-readable scope: the region name or the national label.
    pub fn scope_label(&self) -> &str {
        self.region().unwrap_or(NATIONAL_SCOPE)
    }
}

impl fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionFilter::All => write!(f, "{}", ALL_REGIONS),
            RegionFilter::Region(name) => write!(f, "{}", name),
        }
    }
}

impl From<String> for RegionFilter {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case(ALL_REGIONS) {
            RegionFilter::All
        } else {
            RegionFilter::Region(value)
        }
    }
}

impl From<RegionFilter> for String {
    fn from(filter: RegionFilter) -> Self {
        filter.to_string()
    }
}

/// Births and deaths summed for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSeriesPoint {
    pub year: i32,
    pub total_births: u64,
    pub total_deaths: u64,
}

/// Births and deaths for one region in a reference year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    pub births: u64,
    pub deaths: u64,
}

/// Totals for a filtered slice of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotals {
    pub births: u64,
    pub deaths: u64,
}

impl YearTotals {
    /// Adds a record's counts, saturating at `u64::MAX`.
    pub fn add(&mut self, record: &VitalRecord) {
        self.births = self.births.saturating_add(record.births);
        self.deaths = self.deaths.saturating_add(record.deaths);
    }

    /// Births minus deaths, clamped to the `i64` range.
    pub fn net_change(&self) -> i64 {
        let net = i128::from(self.births) - i128::from(self.deaths);
        i64::try_from(net).unwrap_or(if net > 0 { i64::MAX } else { i64::MIN })
    }
}

/// Headline figures of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_births: u64,
    pub total_deaths: u64,
    /// `total_births - total_deaths`; negative when deaths outnumber births.
    pub net_change: i64,
    /// `"{births/deaths:.2}:1"`, or `"N/A"` when there were no deaths.
    pub birth_death_ratio: String,
}

/// What the rows of a detail table are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// One row per region for the report year.
    ByRegion,
    /// One row per year for the selected region.
    ByYear,
}

impl TableMode {
    /// Column headers for this mode.
    pub fn headers(&self) -> [&'static str; 3] {
        match self {
            TableMode::ByRegion => ["State", "Births", "Deaths"],
            TableMode::ByYear => ["Year", "Births", "Deaths"],
        }
    }
}

/// A single row of the report detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    /// Region name or year, depending on the table mode.
    pub label: String,
    pub births: u64,
    pub deaths: u64,
}

/// Detail table attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailTable {
    pub mode: TableMode,
    pub headers: Vec<String>,
    pub rows: Vec<DetailRow>,
}

impl DetailTable {
    /// Creates an empty table with the headers for `mode`.
    pub fn new(mode: TableMode) -> Self {
        Self {
            mode,
            headers: mode.headers().iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A generated vital statistics report for one year and region filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Report year.
    pub year: i32,
    /// Region filter the report was generated for.
    pub region: RegionFilter,
    /// Headline figures for `year`.
    pub summary: ReportSummary,
    /// Totals for `year - 1`, shown as the comparison baseline.
    pub previous_year: YearTotals,
    /// Narrative insights, in display order.
    pub insights: Vec<String>,
    /// Detail rows.
    pub table: DetailTable,
}

impl Report {
    /// Report title as printed at the top of the document.
    pub fn title(&self) -> String {
        format!(
            "Vital Statistics Report: {} - {}",
            self.region.scope_label(),
            self.year
        )
    }
}

/// Direction of the year-over-year birth trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

impl TrendDirection {
    /// Returns an emoji representation of the direction.
    pub fn emoji(&self) -> &'static str {
        match self {
            TrendDirection::Up => "📈",
            TrendDirection::Down => "📉",
        }
    }
}

/// Headline cards shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Reference year.
    pub year: i32,
    /// Comparison year (`year - 1`).
    pub previous_year: i32,
    pub total_births: u64,
    pub total_deaths: u64,
    /// Births as a share of births plus deaths, e.g. `"78.3%"`.
    pub birth_rate: String,
    /// Deaths as a share of births plus deaths.
    pub death_rate: String,
    /// Change in births from the previous year, e.g. `"4.2%"`.
    pub birth_trend: String,
    pub trend_direction: TrendDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = RegionCatalog::default();
        assert_eq!(catalog.len(), 37);
        assert_eq!(catalog.names()[0], "Abia");
        assert_eq!(catalog.names()[36], "Zamfara");
        assert!(catalog.contains("FCT - Abuja"));
    }

    #[test]
    fn test_catalog_drops_duplicates_and_blanks() {
        let catalog = RegionCatalog::new(["Lagos", " ", "Kano", "Lagos"]);
        assert_eq!(catalog.names(), &["Lagos".to_string(), "Kano".to_string()]);
    }

    #[test]
    fn test_region_filter_parse() {
        let catalog = RegionCatalog::nigeria();

        assert_eq!(RegionFilter::parse("all", &catalog), Ok(RegionFilter::All));
        assert_eq!(RegionFilter::parse("ALL", &catalog), Ok(RegionFilter::All));
        assert_eq!(
            RegionFilter::parse("lagos", &catalog),
            Ok(RegionFilter::Region("Lagos".to_string()))
        );
        assert_eq!(
            RegionFilter::parse("Atlantis", &catalog),
            Err(FilterError::UnknownRegion("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_region_filter_matches() {
        let lagos = RegionFilter::Region("Lagos".to_string());
        assert!(lagos.matches("Lagos"));
        assert!(!lagos.matches("Kano"));
        assert!(RegionFilter::All.matches("Kano"));
        assert_eq!(RegionFilter::All.scope_label(), "Nigeria");
        assert_eq!(lagos.scope_label(), "Lagos");
    }

    #[test]
    fn test_region_filter_serializes_as_string() {
        let json = serde_json::to_string(&RegionFilter::All).unwrap();
        assert_eq!(json, "\"all\"");

        let decoded: RegionFilter = serde_json::from_str("\"Kano\"").unwrap();
        assert_eq!(decoded, RegionFilter::Region("Kano".to_string()));
    }

    #[test]
    fn test_year_totals_net_change() {
        let totals = YearTotals {
            births: 100,
            deaths: 250,
        };
        assert_eq!(totals.net_change(), -150);
    }

    #[test]
    fn test_year_totals_large_counts() {
        let mut totals = YearTotals::default();
        totals.add(&VitalRecord::new(2024, "Lagos", u64::MAX, 0));
        totals.add(&VitalRecord::new(2024, "Kano", 1, u64::MAX));
        assert_eq!(totals.births, u64::MAX);
        assert_eq!(totals.deaths, u64::MAX);
        assert_eq!(totals.net_change(), 0);

        let births_only = YearTotals {
            births: 10_000_000_000_000_000_000,
            deaths: 0,
        };
        assert_eq!(births_only.net_change(), i64::MAX);

        let deaths_only = YearTotals {
            births: 0,
            deaths: u64::MAX,
        };
        assert_eq!(deaths_only.net_change(), i64::MIN);

        let fits = YearTotals {
            births: i64::MAX as u64,
            deaths: 1,
        };
        assert_eq!(fits.net_change(), i64::MAX - 1);
    }

    #[test]
    fn test_table_mode_headers() {
        let table = DetailTable::new(TableMode::ByYear);
        assert_eq!(table.headers, vec!["Year", "Births", "Deaths"]);
        assert!(table.is_empty());
        assert_eq!(TableMode::ByRegion.headers()[0], "State");
    }
}
