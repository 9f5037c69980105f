//! Loading record data from CSV files.
//!
//! A data source is either a single CSV file or a directory, which is walked
//! for `*.csv` files. Hidden entries are skipped. Files are read in path order
//! so the resulting store order is stable.

use super::{RecordStore, StoreError};
use crate::export::parse_csv;
use crate::models::RegionCatalog;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Load a record store from a CSV file or a directory of CSV files.
pub fn load_path(path: &Path, catalog: RegionCatalog) -> Result<RecordStore, StoreError> {
    let files = if path.is_dir() {
        collect_csv_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    info!("Loading records from {} file(s)", files.len());

    let mut records = Vec::new();
    for file in &files {
        let content = fs::read_to_string(file).map_err(|source| StoreError::Io {
            path: file.clone(),
            source,
        })?;
        let parsed = parse_csv(&content).map_err(|source| StoreError::Csv {
            path: file.clone(),
            source,
        })?;
        debug!("Read {} records from {}", parsed.len(), file.display());
        records.extend(parsed);
    }

    RecordStore::new(records, catalog)
}

/// All `*.csv` files below `dir`, sorted by path.
pub fn collect_csv_files(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && has_csv_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
