//! In-memory record store.
//!
//! Holds the record collection and the region catalog. The store is
//! read-only once built; every consumer receives borrowed slices.

pub mod loader;
pub mod sample;

pub use loader::{collect_csv_files, load_path};
pub use sample::{sample_records, DEFAULT_SAMPLE_YEARS, DEFAULT_SEED};

use crate::analysis::{distinct_years, filter_by_region};
use crate::export::CsvError;
use crate::models::{FilterError, RegionCatalog, RegionFilter, VitalRecord};
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate record for {region} in {year}")]
    Duplicate { region: String, year: i32 },

    #[error("Record for {year} names unknown region '{region}'")]
    UnknownRegion { region: String, year: i32 },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: CsvError,
    },

    #[error("Failed to scan data directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Read-only collection of vital records plus the region catalog.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<VitalRecord>,
    catalog: RegionCatalog,
}

impl RecordStore {
    /// Build a store, enforcing one record per (region, year).
    ///
    /// Region names are normalised to their catalog spelling; names outside
    /// the catalog are rejected.
    pub fn new(records: Vec<VitalRecord>, catalog: RegionCatalog) -> Result<Self, StoreError> {
        let mut seen: HashSet<(String, i32)> = HashSet::with_capacity(records.len());
        let mut normalised = Vec::with_capacity(records.len());

        for mut record in records {
            let canonical = catalog
                .resolve(&record.region)
                .ok_or_else(|| StoreError::UnknownRegion {
                    region: record.region.clone(),
                    year: record.year,
                })?
                .to_string();
            record.region = canonical;

            if !seen.insert((record.region.clone(), record.year)) {
                return Err(StoreError::Duplicate {
                    region: record.region,
                    year: record.year,
                });
            }
            normalised.push(record);
        }

        Ok(Self {
            records: normalised,
            catalog,
        })
    }

    /// Store populated with the generated sample dataset.
    pub fn sample(catalog: RegionCatalog, years: &[i32], seed: u64) -> Self {
        let records = sample_records(&catalog, years, seed);
        Self { records, catalog }
    }

    pub fn all_records(&self) -> &[VitalRecord] {
        &self.records
    }

    pub fn region_names(&self) -> &[String] {
        self.catalog.names()
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years on record, most recent first.
    pub fn years(&self) -> Vec<i32> {
        distinct_years(&self.records)
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.records.iter().map(|r| r.year).max()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.records.iter().any(|r| r.year == year)
    }

    /// Validate a requested year, defaulting to the most recent one.
    pub fn resolve_year(&self, requested: Option<i32>) -> Result<i32, FilterError> {
        match requested {
            Some(year) if self.contains_year(year) => Ok(year),
            Some(year) => Err(FilterError::YearNotAvailable {
                year,
                available: self
                    .years()
                    .iter()
                    .map(|y| y.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
            None => self.latest_year().ok_or(FilterError::NoYears),
        }
    }

    /// Parse a region filter against this store's catalog.
    pub fn region_filter(&self, input: &str) -> Result<RegionFilter, FilterError> {
        RegionFilter::parse(input, &self.catalog)
    }

    /// Records passing `filter`, in store order.
    pub fn filtered(&self, filter: &RegionFilter) -> Vec<VitalRecord> {
        filter_by_region(&self.records, filter)
    }
}
