//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.vitalstats.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use crate::models::{RegionCatalog, NIGERIAN_STATES};
use crate::store::{DEFAULT_SAMPLE_YEARS, DEFAULT_SEED};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".vitalstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Data source settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Region catalog.
    #[serde(default)]
    pub regions: RegionsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path for generated reports.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "vitalstats_report.md".to_string()
}

/// Where records come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file or directory of CSV files. When unset, the sample dataset is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,

    /// Seed for the sample dataset.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Years covered by the sample dataset.
    #[serde(default = "default_sample_years")]
    pub sample_years: Vec<i32>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: None,
            seed: default_seed(),
            sample_years: default_sample_years(),
        }
    }
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_sample_years() -> Vec<i32> {
    DEFAULT_SAMPLE_YEARS.to_vec()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Number of regions shown in the dashboard's regional breakdown.
    #[serde(default = "default_top_regions")]
    pub top_regions: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            top_regions: default_top_regions(),
        }
    }
}

fn default_top_regions() -> usize {
    10
}

/// Region catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsConfig {
    /// Region names in display order.
    #[serde(default = "default_catalog")]
    pub catalog: Vec<String>,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
        }
    }
}

fn default_catalog() -> Vec<String> {
    NIGERIAN_STATES.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// where the CLI provides an explicit value.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref data) = args.data {
            self.data.source = Some(data.clone());
        }
        if let Some(seed) = args.seed {
            self.data.seed = seed;
        }

        match &args.command {
            Command::Report(report) => {
                if let Some(format) = report.format {
                    self.report.format = format;
                }
                if let Some(ref output) = report.output {
                    self.general.output = output.display().to_string();
                }
            }
            Command::Dashboard(dashboard) => {
                if let Some(top) = dashboard.top {
                    self.report.top_regions = top;
                }
            }
            _ => {}
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Check values that serde defaults cannot guard.
    pub fn validate(&self) -> Result<()> {
        if self.report.top_regions == 0 {
            bail!("report.top_regions must be at least 1");
        }
        if self.regions.catalog.iter().all(|r| r.trim().is_empty()) {
            bail!("regions.catalog must name at least one region");
        }
        if self.data.source.is_none() && self.data.sample_years.is_empty() {
            bail!("data.sample_years must list at least one year when no data source is set");
        }
        Ok(())
    }

    /// Log level from the merged settings.
    ///
    /// `quiet` wins; otherwise `general.verbose` (set by the file or by
    /// `--verbose`) selects DEBUG.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The configured region catalog.
    pub fn catalog(&self) -> RegionCatalog {
        RegionCatalog::new(self.regions.catalog.iter().cloned())
    }

    /// Report output path.
    ///
    /// The default path and paths without an extension take the extension of
    /// the configured format; explicit extensions are kept.
    pub fn report_output(&self) -> PathBuf {
        let path = PathBuf::from(&self.general.output);
        if path.extension().is_some() && self.general.output != default_output() {
            return path;
        }
        path.with_extension(self.report.format.extension())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReportArgs;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "vitalstats_report.md");
        assert_eq!(config.data.seed, DEFAULT_SEED);
        assert_eq!(config.data.sample_years, vec![2020, 2021, 2022, 2023, 2024]);
        assert_eq!(config.report.top_regions, 10);
        assert_eq!(config.catalog().len(), 37);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "lagos.md"
verbose = true

[data]
source = "data/records.csv"

[report]
format = "json"
top_regions = 5

[regions]
catalog = ["Lagos", "Kano", "Oyo"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "lagos.md");
        assert!(config.general.verbose);
        assert_eq!(config.data.source, Some(PathBuf::from("data/records.csv")));
        assert_eq!(config.data.seed, DEFAULT_SEED);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.top_regions, 5);
        assert_eq!(config.catalog().names()[2], "Oyo");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.report.top_regions = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.regions.catalog = vec![" ".to_string()];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.data.sample_years.clear();
        assert!(config.validate().is_err());
        config.data.source = Some(PathBuf::from("records.csv"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let args = Args {
            config: None,
            data: Some(PathBuf::from("records")),
            seed: Some(7),
            user: None,
            verbose: true,
            quiet: false,
            command: Command::Report(ReportArgs {
                region: "all".to_string(),
                year: None,
                format: Some(OutputFormat::Json),
                output: Some(PathBuf::from("out.json")),
                stdout: false,
            }),
        };

        config.merge_with_args(&args);

        assert_eq!(config.data.source, Some(PathBuf::from("records")));
        assert_eq!(config.data.seed, 7);
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.general.output, "out.json");
        assert!(config.general.verbose);
    }

    #[test]
    fn test_log_level() {
        let config = Config::default();
        assert_eq!(config.log_level(false), tracing::Level::INFO);
        assert_eq!(config.log_level(true), tracing::Level::ERROR);

        let verbose: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        assert_eq!(verbose.log_level(false), tracing::Level::DEBUG);
        assert_eq!(verbose.log_level(true), tracing::Level::ERROR);
    }

    #[test]
    fn test_verbose_flag_raises_log_level() {
        let mut config = Config::default();
        let args = Args {
            config: None,
            data: None,
            seed: None,
            user: None,
            verbose: true,
            quiet: false,
            command: Command::Filters,
        };

        config.merge_with_args(&args);
        assert_eq!(config.log_level(args.quiet), tracing::Level::DEBUG);
    }

    #[test]
    fn test_report_output_extension() {
        let mut config = Config::default();
        assert_eq!(config.report_output(), PathBuf::from("vitalstats_report.md"));

        config.report.format = OutputFormat::Json;
        assert_eq!(config.report_output(), PathBuf::from("vitalstats_report.json"));

        config.general.output = "annual".to_string();
        assert_eq!(config.report_output(), PathBuf::from("annual.json"));

        config.general.output = "annual.txt".to_string();
        assert_eq!(config.report_output(), PathBuf::from("annual.txt"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[regions]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.catalog().len(), 37);
    }
}
