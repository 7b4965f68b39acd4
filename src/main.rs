//! CLI entry point for the air-quality statistics tool.
//!
//! Provides subcommands for summarizing a reading file (overall averages and
//! the dominant pollutant per hour) and for dumping the decoded readings.

use air_quality_stats::{
    output::{append_record, encode_readings_json, print_pretty, render_text, to_json},
    parser::{InputFormat, load_readings},
    stats::Summary,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "air_quality_stats")]
#[command(about = "Summarize air-quality sensor readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print overall averages and the dominant pollutant for each hour
    Summarize {
        /// CSV or JSON file with sensor readings
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Input format (detected from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,

        /// Report format written to stdout
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        output: ReportFormat,

        /// Optional: CSV file to append per-hour rows to
        #[arg(long)]
        append_csv: Option<String>,
    },
    /// Decode a reading file and print the readings as JSON
    Readings {
        /// CSV or JSON file with sensor readings
        #[arg(value_name = "FILE")]
        source: PathBuf,

        /// Input format (detected from the file extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<InputFormat>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/air_quality_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("air_quality_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize {
            source,
            format,
            output,
            append_csv,
        } => {
            let readings = load_readings(&source, format)
                .with_context(|| format!("Failed to parse readings from {}", source.display()))?;
            print_pretty(&readings);

            let summary = Summary::from_readings(&readings);
            info!(
                readings = summary.reading_count,
                hours_with_data = summary
                    .hourly_dominant
                    .iter()
                    .filter(|(_, d)| d.is_some())
                    .count(),
                "Readings summarized"
            );

            match output {
                ReportFormat::Text => println!("{}", render_text(&summary)),
                ReportFormat::Json => println!("{}", to_json(&summary)?),
            }

            if let Some(path) = append_csv {
                append_record(&path, &summary)?;
                info!(path = %path, "Hourly rows appended");
            }
        }
        Commands::Readings { source, format } => {
            let readings = load_readings(&source, format)
                .with_context(|| format!("Failed to parse readings from {}", source.display()))?;
            println!("{}", encode_readings_json(&readings)?);
        }
    }

    Ok(())
}
