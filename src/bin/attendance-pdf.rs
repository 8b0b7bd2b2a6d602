//! Attendance PDF CLI tool
//!
//! Splits attendance documents per worker and fills in monthly schedules.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use attendance_pdf::config::Config;
use attendance_pdf::output::{read_input, write_atomic};
use attendance_pdf::pdf::{
    document_period, load_document, overlay_schedule, plan_split, split_by_worker, OverlayOptions,
};
use attendance_pdf::period::Period;
use attendance_pdf::schedule::{generate_schedule, Schedule};

/// Attendance PDF - Split attendance records and complete work schedules
#[derive(Parser)]
#[command(name = "attendance-pdf")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Split a monthly attendance export into one PDF per worker
    attendance-pdf split registros.pdf -o documentos_divididos.zip

    # Preview the file names without writing anything
    attendance-pdf split registros.pdf -o out.zip --dry-run

    # Fill in January 2025 on a worker's sheet
    attendance-pdf complete Juan_Perez.pdf -o output_completed.pdf --month 1 --year 2025

    # Take the month/year from the \"Periodo:\" line of the document
    attendance-pdf complete Juan_Perez.pdf -o output_completed.pdf")]
struct Cli {
    /// Configuration file (TOML) with markers, work times and holidays
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a multi-page PDF into one PDF per worker, bundled as a ZIP archive
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Output ZIP archive path
        #[arg(short, long)]
        output: PathBuf,

        /// Text preceding the worker's name (overrides the configuration)
        #[arg(long)]
        marker: Option<String>,

        /// Only print the page to file name plan
        #[arg(long)]
        dry_run: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Overlay the month's schedule table onto page 1 of a PDF
    Complete {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Month (1-12); read from the document when omitted
        #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,

        /// Year; read from the document when omitted
        #[arg(long, requires = "month")]
        year: Option<i32>,

        /// Keep pages after the first in the output
        #[arg(long)]
        keep_pages: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Print the schedule table for a month
    Schedule {
        /// Month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,

        /// Year
        #[arg(long)]
        year: i32,
    },

    /// List configured holidays
    Holidays {
        /// Only this year
        #[arg(long)]
        year: Option<i32>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Split { input, output, marker, dry_run, open } => {
            cmd_split(&config, input, output, marker, dry_run, open)
        }
        Commands::Complete { input, output, month, year, keep_pages, open } => {
            cmd_complete(&config, input, output, month.zip(year), keep_pages, open)
        }
        Commands::Schedule { month, year } => cmd_schedule(&config, month, year),
        Commands::Holidays { year } => cmd_holidays(&config, year),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Route tracing output to stderr
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Split a PDF into one document per worker
fn cmd_split(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    marker: Option<String>,
    dry_run: bool,
    open: bool,
) -> Result<()> {
    let mut options = config.split.clone();
    if let Some(marker) = marker {
        options.worker_marker = marker;
    }

    let bytes = read_input(&input)?;

    if dry_run {
        let doc = load_document(&bytes)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        for page in plan_split(&doc, &options) {
            let source = if page.from_marker { "worker" } else { "fallback" };
            println!("page {:>3} -> {} ({})", page.page_number, page.file_name(), source);
        }
        return Ok(());
    }

    eprintln!("Splitting {}...", input.display());
    let result = split_by_worker(&bytes, &options)
        .with_context(|| format!("Failed to split {}", input.display()))?;

    let fallbacks = result.pages.iter().filter(|page| !page.from_marker).count();
    if fallbacks > 0 {
        eprintln!(
            "Warning: {} page(s) had no \"{}\" marker and were named by position",
            fallbacks, options.worker_marker
        );
    }

    write_atomic(&output, &result.archive)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Split into {} documents: {}", result.pages.len(), output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Overlay the schedule table onto a PDF
fn cmd_complete(
    config: &Config,
    input: PathBuf,
    output: PathBuf,
    month_year: Option<(u32, i32)>,
    keep_pages: bool,
    open: bool,
) -> Result<()> {
    let bytes = read_input(&input)?;

    let period = match month_year {
        Some((month, year)) => {
            Period::new(year, month).ok_or_else(|| anyhow!("Invalid period {}/{}", month, year))?
        }
        None => {
            let doc = load_document(&bytes)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            document_period(&doc, &config.period_marker).with_context(|| {
                format!("{} does not state its month/year; pass --month and --year", input.display())
            })?
        }
    };

    let schedule = build_schedule(config, period)?;

    eprintln!(
        "Completing {} for {} ({} workdays, {} hours)...",
        input.display(),
        period,
        schedule.workday_count(),
        schedule.total_hours
    );

    let options = OverlayOptions {
        keep_remaining_pages: keep_pages,
        ..OverlayOptions::default()
    };
    let completed = overlay_schedule(&bytes, &schedule, &options)
        .with_context(|| format!("Failed to complete {}", input.display()))?;

    write_atomic(&output, &completed)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    eprintln!("Output: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

fn build_schedule(config: &Config, period: Period) -> Result<Schedule> {
    let holidays = config.holidays.days_in_month(period.year, period.month);
    Ok(generate_schedule(period.year, period.month, &holidays, &config.schedule)?)
}

/// Print the schedule table for a month
fn cmd_schedule(config: &Config, month: u32, year: i32) -> Result<()> {
    let period = Period::new(year, month).ok_or_else(|| anyhow!("Invalid period {}/{}", month, year))?;
    let schedule = build_schedule(config, period)?;
    let table = schedule.table();

    let widths: Vec<usize> = (0..6)
        .map(|column| table.iter().map(|row| row[column].chars().count()).max().unwrap_or(0))
        .collect();

    for row in &table {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:^width$}", cell, width = width))
            .collect();
        println!("{}", line.join(" | ").trim_end());
    }

    Ok(())
}

/// List configured holidays
fn cmd_holidays(config: &Config, year: Option<i32>) -> Result<()> {
    let years: Vec<i32> = match year {
        Some(year) => vec![year],
        None => config.holidays.years().collect(),
    };

    for year in years {
        let dates = config.holidays.holidays_in_year(year);
        if dates.is_empty() {
            println!("{}: no holidays configured", year);
            continue;
        }

        println!("{}:", year);
        for date in dates {
            println!("  {}", date.format("%Y-%m-%d (%A)"));
        }
    }

    Ok(())
}
