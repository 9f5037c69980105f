//! CSV export and import of vital records.
//!
//! Format: header `Year,State,Births,Deaths`, one record per line, fields in
//! that order, no quoting. Region names never contain commas.

use crate::analysis::filter_by_region;
use crate::models::{RegionFilter, VitalRecord};
use thiserror::Error;

/// Header row of every export.
pub const CSV_HEADER: &str = "Year,State,Births,Deaths";

/// Largest births or deaths count accepted for a single record.
pub const MAX_COUNT: u64 = 1_000_000_000_000;

/// Filename scope used when no region is selected.
const NATIONAL_FILE_SCOPE: &str = "nigeria";

/// Errors raised while reading CSV record data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    #[error("CSV input is empty (expected header 'Year,State,Births,Deaths')")]
    MissingHeader,

    #[error("Unexpected CSV header '{0}' (expected 'Year,State,Births,Deaths')")]
    BadHeader(String),

    #[error("Line {line}: expected 4 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("Line {line}: invalid {field} value '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: {field} value {value} exceeds the limit of {max}", max = MAX_COUNT)]
    CountTooLarge {
        line: usize,
        field: &'static str,
        value: u64,
    },

    #[error("Line {line}: state name is empty")]
    EmptyRegion { line: usize },
}

/// Serialize records to CSV, rows joined with `\n` and no trailing newline.
pub fn to_csv(records: &[VitalRecord]) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(CSV_HEADER.to_string());

    for record in records {
        rows.push(format!(
            "{},{},{},{}",
            record.year, record.region, record.births, record.deaths
        ));
    }

    rows.join("\n")
}

/// CSV for the records that pass `filter` (all records for `All`).
pub fn export_records(records: &[VitalRecord], filter: &RegionFilter) -> String {
    to_csv(&filter_by_region(records, filter))
}

/// Download filename for an export: `vitalstats_report_<region|nigeria>.csv`.
pub fn export_filename(filter: &RegionFilter) -> String {
    format!(
        "vitalstats_report_{}.csv",
        filter.region().unwrap_or(NATIONAL_FILE_SCOPE)
    )
}

/// Parse CSV produced by [`to_csv`].
///
/// Blank lines and CRLF line endings are tolerated. Line numbers in errors
/// are 1-based and count the header.
pub fn parse_csv(text: &str) -> Result<Vec<VitalRecord>, CsvError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or(CsvError::MissingHeader)?;
    if !header.trim().eq_ignore_ascii_case(CSV_HEADER) {
        return Err(CsvError::BadHeader(header.trim().to_string()));
    }

    lines.map(|(line, row)| parse_row(line, row)).collect()
}

fn parse_row(line: usize, row: &str) -> Result<VitalRecord, CsvError> {
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    if fields.len() != 4 {
        return Err(CsvError::FieldCount {
            line,
            found: fields.len(),
        });
    }

    let year = fields[0]
        .parse::<i32>()
        .map_err(|_| invalid(line, "Year", fields[0]))?;
    let region = fields[1];
    if region.is_empty() {
        return Err(CsvError::EmptyRegion { line });
    }
    let births = parse_count(line, "Births", fields[2])?;
    let deaths = parse_count(line, "Deaths", fields[3])?;

    Ok(VitalRecord::new(year, region, births, deaths))
}

fn parse_count(line: usize, field: &'static str, raw: &str) -> Result<u64, CsvError> {
    let value = raw.parse::<u64>().map_err(|_| invalid(line, field, raw))?;
    if value > MAX_COUNT {
        return Err(CsvError::CountTooLarge { line, field, value });
    }
    Ok(value)
}

fn invalid(line: usize, field: &'static str, value: &str) -> CsvError {
    CsvError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    }
}
