use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use client_report::config::DEFAULT_OUTPUT_FILE;
use client_report::{ReportConfig, ReportData};
use env_logger::{Builder, Env};
use log::info;

/// Generates the StartupXYZ client status report as a PDF.
///
/// Fonts are looked up under `assets/fonts` next to the binary or in the directory named by
/// `CLIENT_REPORT_FONTS_DIR`, falling back to system Liberation Sans or Arial.
#[derive(Parser)]
#[command(author, version, about = "Generate the client status report PDF")]
struct Cli {
    /// Destination of the generated PDF.
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Date printed on the cover (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ReportConfig::new(cli.output);
    if let Some(date) = cli.date {
        config = config.with_generated_on(date);
    }

    info!(
        "generating report dated {} into {}",
        config.generated_on(),
        config.output_path().display()
    );
    match client_report::generate(&ReportData::sample(), &config) {
        Ok(path) => println!("PDF report generated successfully: {}", path.display()),
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
