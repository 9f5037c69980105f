//! VitalStats - births and deaths statistics dashboard
//!
//! A CLI tool that explores vital records by region and year, exports
//! them to CSV and generates printable yearly reports.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad filter, unreadable data, invalid submission, etc.)
//!   3 - Sign-in required (no user for a protected command)

use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vitalstats::cli::{
    Args, BirthArgs, Command, DashboardArgs, DashboardFormat, DeathArgs, ExportArgs, OutputFormat,
    ReportArgs,
};
use vitalstats::config::{Config, CONFIG_FILE_NAME};
use vitalstats::export::{export_filename, export_records};
use vitalstats::report::{
    build_dashboard, generate_json_report, generate_markdown_report, generate_report,
    render_dashboard_json, render_dashboard_text,
};
use vitalstats::session::{resolve_gate, AuthSignal, GateDecision, User};
use vitalstats::store::{load_path, RecordStore};
use vitalstats::submission::{
    submit_record, BirthForm, DeathForm, LoggingSink, RecordCandidate, SubmissionError,
};

/// Exit code when a protected command runs without a signed-in user.
const EXIT_SIGN_IN_REQUIRED: i32 = 3;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle init-config early (no logging needed)
    if matches!(args.command, Command::InitConfig) {
        return handle_init_config();
    }

    // Configuration comes first: general.verbose feeds the log level
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(config.log_level(args.quiet));

    info!("VitalStats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle init-config: generate a default .vitalstats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the data source, report format, and region catalog.");
    Ok(())
}

/// Initialize logging at `level`; `RUST_LOG` directives take precedence.
fn init_logging(level: Level) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the selected command. Returns the process exit code.
fn run(args: Args, config: Config) -> Result<i32> {
    // Session gate
    if let Some(route) = args.command.route() {
        let signal = AuthSignal::Resolved(User::from_identity(args.user.as_deref()));
        match resolve_gate(&signal, route) {
            GateDecision::RedirectToLogin => {
                eprintln!("🔒 Sign in required: pass --user or set VITALSTATS_USER.");
                return Ok(EXIT_SIGN_IN_REQUIRED);
            }
            decision => debug!("Session gate for {}: {}", route, decision),
        }
    }

    let store = load_store(&config)?;
    info!(
        "Loaded {} records across {} years",
        store.len(),
        store.years().len()
    );

    match &args.command {
        Command::Dashboard(dashboard) => handle_dashboard(&store, &config, dashboard),
        Command::Report(report) => handle_report(&store, &config, report),
        Command::Export(export) => handle_export(&store, export),
        Command::Filters => handle_filters(&store),
        Command::SubmitBirth(birth) => handle_submit_birth(&store, birth),
        Command::SubmitDeath(death) => handle_submit_death(&store, death),
        Command::InitConfig => Ok(0),
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before logging is set up, so problems are reported on stderr.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        // Try explicit config path
        Some(ref config_path) => Config::load(config_path)?,
        // Try default location
        None => match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Load records from the configured source, or generate the sample dataset.
fn load_store(config: &Config) -> Result<RecordStore> {
    match config.data.source {
        Some(ref source) => {
            info!("Loading records from: {}", source.display());
            load_path(source, config.catalog())
                .with_context(|| format!("Failed to load records from {}", source.display()))
        }
        None => {
            info!(
                "No data source configured, generating sample data (seed {})",
                config.data.seed
            );
            Ok(RecordStore::sample(
                config.catalog(),
                &config.data.sample_years,
                config.data.seed,
            ))
        }
    }
}

fn handle_dashboard(store: &RecordStore, config: &Config, args: &DashboardArgs) -> Result<i32> {
    let year = store.resolve_year(args.year)?;
    let filter = store.region_filter(&args.region)?;

    let view = build_dashboard(
        store.all_records(),
        store.catalog(),
        year,
        &filter,
        config.report.top_regions,
    );

    match args.format {
        DashboardFormat::Text => print!("{}", render_dashboard_text(&view)),
        DashboardFormat::Json => println!("{}", render_dashboard_json(&view)?),
    }
    Ok(0)
}

fn handle_report(store: &RecordStore, config: &Config, args: &ReportArgs) -> Result<i32> {
    let year = store.resolve_year(args.year)?;
    let filter = store.region_filter(&args.region)?;

    println!("📝 Generating report for {} ({})...", filter.scope_label(), year);
    let report = generate_report(store.all_records(), year, &filter);

    let output = match config.report.format {
        OutputFormat::Json => generate_json_report(&report)?,
        OutputFormat::Markdown => generate_markdown_report(&report, Local::now().date_naive()),
    };

    if args.stdout {
        println!("{}", output);
        return Ok(0);
    }

    let path = config.report_output();
    std::fs::write(&path, &output)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!("\n📊 {}", report.title());
    println!("   Total births: {}", report.summary.total_births);
    println!("   Total deaths: {}", report.summary.total_deaths);
    println!("   Birth-to-death ratio: {}", report.summary.birth_death_ratio);
    println!("\n✅ Report saved to: {}", path.display());
    Ok(0)
}

fn handle_export(store: &RecordStore, args: &ExportArgs) -> Result<i32> {
    let filter = store.region_filter(&args.region)?;
    let filename = export_filename(&filter);

    let path = match args.output {
        Some(ref output) if output.is_dir() => output.join(&filename),
        Some(ref output) => output.clone(),
        None => filename.into(),
    };

    let rows = store.filtered(&filter).len();
    let csv = export_records(store.all_records(), &filter);
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write export to {}", path.display()))?;

    println!("✅ Exported {} records to: {}", rows, path.display());
    Ok(0)
}

fn handle_filters(store: &RecordStore) -> Result<i32> {
    let years = store.years();
    if years.is_empty() {
        println!("📅 Years: (none)");
    } else {
        let listed: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        println!("📅 Years: {}", listed.join(", "));
    }

    println!("\n🗺️  Regions ({}):", store.region_names().len());
    for name in store.region_names() {
        println!("   {}", name);
    }
    Ok(0)
}

fn handle_submit_birth(store: &RecordStore, args: &BirthArgs) -> Result<i32> {
    let candidate = RecordCandidate::Birth(BirthForm {
        region: args.region.clone(),
        gender: args.gender.clone(),
        date_of_birth: args.dob.clone(),
    });
    submit(store, &candidate)
}

fn handle_submit_death(store: &RecordStore, args: &DeathArgs) -> Result<i32> {
    let candidate = RecordCandidate::Death(DeathForm {
        region: args.region.clone(),
        age: args.age.clone(),
        date_of_death: args.dod.clone(),
    });
    submit(store, &candidate)
}

fn submit(store: &RecordStore, candidate: &RecordCandidate) -> Result<i32> {
    let mut sink = LoggingSink::new();
    let today = Local::now().date_naive();

    match submit_record(candidate, store.catalog(), today, &mut sink) {
        Ok(notice) => {
            println!("✅ {}", notice.title);
            println!("   {}", notice.description);
            Ok(0)
        }
        Err(SubmissionError::Invalid(errors)) => {
            eprintln!("⚠️  Please fix the following fields:");
            for field_error in errors.errors() {
                eprintln!("   - {}", field_error);
            }
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
