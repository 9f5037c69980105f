//! Record export.

pub mod csv;

pub use self::csv::{
    export_filename, export_records, parse_csv, to_csv, CsvError, CSV_HEADER, MAX_COUNT,
};
