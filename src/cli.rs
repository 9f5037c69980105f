//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// VitalStats - births and deaths statistics by region and year
///
/// Explore yearly trends, compare regions, export filtered records
/// to CSV and generate printable reports.
///
/// Examples:
///   vitalstats --user admin dashboard
///   vitalstats --user admin dashboard --region Lagos --format json
///   vitalstats --user admin report --year 2024 --region Kano
///   vitalstats --user admin export --region Lagos
///   vitalstats --user admin --data ./records submit-death --region Oyo --age 70 --dod 2024-03-02
///   vitalstats init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .vitalstats.toml in the current directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV file or directory of CSV files to load records from
    ///
    /// When neither this nor the config file names a source, a generated
    /// sample dataset is used.
    #[arg(short, long, global = true, value_name = "PATH", env = "VITALSTATS_DATA")]
    pub data: Option<PathBuf>,

    /// Seed for the generated sample dataset
    #[arg(long, global = true, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Signed-in user name
    #[arg(short, long, global = true, value_name = "NAME", env = "VITALSTATS_USER")]
    pub user: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show headline figures, yearly trends and the regional breakdown
    Dashboard(DashboardArgs),

    /// Generate a printable report for one year and region
    Report(ReportArgs),

    /// Export records to CSV
    Export(ExportArgs),

    /// List the years and regions available as filters
    Filters,

    /// Log a birth record
    SubmitBirth(BirthArgs),

    /// Log a death record
    SubmitDeath(DeathArgs),

    /// Generate a default .vitalstats.toml configuration file
    InitConfig,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DashboardArgs {
    /// Region to focus on, or "all"
    #[arg(short, long, default_value = "all")]
    pub region: String,

    /// Reference year (defaults to the most recent year on record)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Number of regions in the regional breakdown
    #[arg(short, long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: DashboardFormat,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReportArgs {
    /// Region to report on, or "all"
    #[arg(short, long, default_value = "all")]
    pub region: String,

    /// Report year (defaults to the most recent year on record)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the report instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ExportArgs {
    /// Region to export, or "all"
    #[arg(short, long, default_value = "all")]
    pub region: String,

    /// Output file or directory (defaults to vitalstats_report_<region>.csv)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Birth form fields. Left optional so missing values are reported by validation.
#[derive(ClapArgs, Debug, Clone)]
pub struct BirthArgs {
    /// State of birth
    #[arg(short, long)]
    pub region: Option<String>,

    /// Gender (Male, Female)
    #[arg(short, long)]
    pub gender: Option<String>,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub dob: Option<String>,
}

/// Death form fields. Left optional so missing values are reported by validation.
#[derive(ClapArgs, Debug, Clone)]
pub struct DeathArgs {
    /// State of death
    #[arg(short, long)]
    pub region: Option<String>,

    /// Age at death
    #[arg(short, long)]
    pub age: Option<String>,

    /// Date of death (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub dod: Option<String>,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
        }
    }
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DashboardFormat {
    /// Terminal text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl Command {
    /// Route the command corresponds to, for the session gate.
    ///
    /// `None` for commands that do not touch records.
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Command::Dashboard(_) | Command::Export(_) | Command::Filters => Some("/"),
            Command::Report(_) => Some("/reports"),
            Command::SubmitBirth(_) | Command::SubmitDeath(_) => Some("/data-entry"),
            Command::InitConfig => None,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Command::Dashboard(ref dashboard) = self.command {
            if dashboard.top == Some(0) {
                return Err("--top must be at least 1".to_string());
            }
        }

        // Validate data path if provided
        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Data path does not exist: {}", data.display()));
            }
        }

        Ok(())
    }
}
