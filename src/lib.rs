//! VitalStats - births and deaths statistics by region and year.
//!
//! The crate is organised around a read-only [`store::RecordStore`]:
//!
//! - [`analysis`] derives yearly series, regional snapshots and the headline
//!   dashboard figures.
//! - [`report`] builds yearly reports with insights and renders them as
//!   Markdown or JSON, plus the terminal dashboard.
//! - [`export`] reads and writes the `Year,State,Births,Deaths` CSV format.
//! - [`submission`] validates birth and death entry forms and hands accepted
//!   records to a [`submission::RecordSink`].
//! - [`session`] decides whether a route is shown, deferred or redirected.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod export;
pub mod models;
pub mod report;
pub mod session;
pub mod store;
pub mod submission;
