//! adthreat - Active Directory critical-event analyzer
//!
//! The main entry point, handling:
//! - Batch analysis of exported security logs (CSV + chart artifacts)
//! - An interactive dashboard served over HTTP
//! - Catalog and input validation

use adt_common::{format_error_human, Error, OutputFormat, StructuredError, SCHEMA_VERSION};
use adt_config::{resolve_catalog, ResolvedCatalog};
use adt_core::aggregate::{aggregate, filter_critical};
use adt_core::dashboard::{DashboardConfig, DashboardServer};
use adt_core::exit_codes::ExitCode;
use adt_core::export::export_artifacts;
use adt_core::ingest::load_records;
use adt_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use adt_core::output::{render_preview, render_report, RunReport};
use adt_report::DashboardOptions;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// adthreat - Critical-event analysis for Active Directory logs
#[derive(Parser)]
#[command(name = "adthreat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a critical-event catalog file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "summary")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a log export: count tables on stdout, CSV and chart artifacts on disk
    Analyze(AnalyzeArgs),

    /// Serve the interactive dashboard
    Dashboard(DashboardArgs),

    /// Validate the catalog and, optionally, an input file
    Check(CheckArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to the exported log CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Directory for CSV and chart artifacts (default: next to the input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Skip chart SVGs, write summary CSVs only
    #[arg(long)]
    no_charts: bool,

    /// Number of head rows to show before the count tables
    #[arg(long, default_value = "5")]
    preview: usize,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Path to the exported log CSV
    #[arg(short, long)]
    input: PathBuf,

    /// Bind address
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port
    #[arg(long, default_value = "8050")]
    port: u16,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Validate the catalog only, skip input checks
    #[arg(long)]
    catalog_only: bool,

    /// Input file to validate
    #[arg(short, long)]
    input: Option<PathBuf>,
}

fn main() {
    // Help and version requests exit 0; actual argument errors get a
    // stable code instead of clap's default.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::ArgsError.as_i32()
            } else {
                0
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Explicit flags win over ADTHREAT_LOG / ADTHREAT_LOG_FORMAT; the
    // defaults leave the environment in charge.
    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };

    // JSONL logs when stdout carries JSON, human logs otherwise
    let cli_format = matches!(cli.global.format, OutputFormat::Json).then_some(LogFormat::Jsonl);

    init_logging(&LogConfig::from_env(cli_level, cli_format));

    let exit_code = match cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, &args),
        Commands::Dashboard(args) => run_dashboard(&cli.global, &args),
        Commands::Check(args) => run_check(&cli.global, &args),
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    match analyze(global, args) {
        Ok(code) => code,
        Err(e) => report_error(global, &e),
    }
}

fn analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> Result<ExitCode, Error> {
    let resolved = load_catalog(global.catalog.as_deref())?;
    let outcome = load_records(&args.input)?;
    let critical = filter_critical(&outcome.records, &resolved.catalog)?;
    let result = aggregate(&critical);

    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| {
            args.input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));
    let artifacts = export_artifacts(&result, &out_dir, !args.no_charts)?;

    let exit_code = if outcome.parse_failures > 0 {
        ExitCode::Degraded
    } else {
        ExitCode::Clean
    };

    if matches!(global.format, OutputFormat::Summary) && args.preview > 0 {
        print!("{}", render_preview(&outcome.records, args.preview));
        println!();
    }

    let report = RunReport {
        result: &result,
        parse_failures: outcome.parse_failures,
        artifacts: &artifacts,
        exit_code,
    };
    print!("{}", render_report(&report, global.format)?);

    Ok(exit_code)
}

fn run_dashboard(global: &GlobalOpts, args: &DashboardArgs) -> ExitCode {
    match serve_dashboard(global, args) {
        Ok(code) => code,
        Err(e) => report_error(global, &e),
    }
}

fn serve_dashboard(global: &GlobalOpts, args: &DashboardArgs) -> Result<ExitCode, Error> {
    let resolved = load_catalog(global.catalog.as_deref())?;
    let outcome = load_records(&args.input)?;
    let critical = filter_critical(&outcome.records, &resolved.catalog)?;
    let result = aggregate(&critical);

    let config = DashboardConfig {
        bind: args.bind.clone(),
        port: args.port,
    };
    let server = DashboardServer::start(
        &config,
        &result,
        critical,
        &DashboardOptions::default(),
    )?;

    println!("Dashboard available at http://{}/", server.addr());
    println!("Press Ctrl-C to stop.");

    // Serve until the process is killed
    server.join();

    Ok(ExitCode::Clean)
}

fn run_check(global: &GlobalOpts, args: &CheckArgs) -> ExitCode {
    match check(global, args) {
        Ok(code) => code,
        Err(e) => report_error(global, &e),
    }
}

fn check(global: &GlobalOpts, args: &CheckArgs) -> Result<ExitCode, Error> {
    let resolved = load_catalog(global.catalog.as_deref())?;

    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "catalog": {
                    "source": resolved.source.to_string(),
                    "path": resolved.path,
                    "events": resolved.catalog.len(),
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        _ => {
            println!("Catalog: {} ({} events)", resolved.source, resolved.catalog.len());
            if let Some(path) = &resolved.path {
                println!("  Path: {}", path.display());
            }
            for entry in resolved.catalog.iter() {
                println!("  {:>6}  {}", entry.event_id, entry.description);
            }
        }
    }

    if args.catalog_only {
        return Ok(ExitCode::Clean);
    }

    if let Some(input) = &args.input {
        let outcome = load_records(input)?;
        let critical = filter_critical(&outcome.records, &resolved.catalog)?;
        println!(
            "Input: {} rows, {} critical, {} timestamp failures",
            outcome.records.len(),
            critical.len(),
            outcome.parse_failures
        );
        if outcome.parse_failures > 0 {
            return Ok(ExitCode::Degraded);
        }
    }

    Ok(ExitCode::Clean)
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "name": "adthreat",
                "version": env!("CARGO_PKG_VERSION"),
                "schema_version": SCHEMA_VERSION,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        }
        _ => {
            println!("adthreat {}", env!("CARGO_PKG_VERSION"));
            println!("schema version {SCHEMA_VERSION}");
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Resolve and load the event catalog, mapping resolution failures onto the
/// unified error type.
fn load_catalog(cli_path: Option<&Path>) -> Result<ResolvedCatalog, Error> {
    if let Some(path) = cli_path {
        if !path.exists() {
            return Err(Error::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
    }
    resolve_catalog(cli_path).map_err(|e| Error::CatalogInvalid(e.to_string()))
}

/// Print an error to stderr in the format matching the output mode and map
/// it to an exit code.
fn report_error(global: &GlobalOpts, err: &Error) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            eprintln!("{}", StructuredError::from(err).to_json());
        }
        _ => {
            let use_color = !global.no_color && std::io::stderr().is_terminal();
            eprintln!("{}", format_error_human(err, use_color));
        }
    }
    ExitCode::from(err)
}
