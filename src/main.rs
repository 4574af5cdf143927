//! CLI entry point for the UNEB results analyzer.
//!
//! Provides one subcommand per analytical view over a district results
//! sheet, plus an export command for downstream chart renderers.

mod report;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use uneb_results_analyzer::cache::DatasetCache;
use uneb_results_analyzer::output::{EXPORT_FILES, export_all};
use uneb_results_analyzer::record::Field;

#[derive(Parser)]
#[command(name = "uneb_results_analyzer")]
#[command(about = "Analytics over a UNEB district results sheet", long_about = None)]
struct Cli {
    /// Path to the results sheet
    #[arg(
        short,
        long,
        global = true,
        default_value = "moyo_adjumani_schools.csv"
    )]
    source: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Key figures for the whole sheet and the district gap
    Overview,
    /// Per-district performance means and school shares
    Performance,
    /// Grade distribution per district
    Grades,
    /// Pass and failure rate histograms plus the top schools
    Distribution {
        /// Histogram bin width in percentage points
        #[arg(short, long, default_value_t = 10)]
        bin_width: u8,
    },
    /// Tier counts and the ranked school table
    Ranking {
        /// Only schools from this district
        #[arg(short, long)]
        district: Option<String>,

        /// Only schools in this performance tier
        #[arg(short, long)]
        tier: Option<String>,

        /// Field to rank by
        #[arg(short, long, default_value = "pass_rate")]
        by: String,

        /// Keep only the leading N schools
        #[arg(long)]
        top: Option<usize>,
    },
    /// Correlation matrix with headline insights
    Correlation,
    /// Comprehensive insight summary
    Insights,
    /// Compare two schools side by side
    Compare {
        /// Substring of the first centre name
        school_a: String,

        /// Substring of the second centre name
        school_b: String,
    },
    /// Write records.csv and the JSON documents
    Export {
        /// Directory receiving the artefacts
        #[arg(short, long, default_value = "analysis")]
        out_dir: String,
    },
    /// Render every section in order
    Report,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/uneb_results_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("uneb_results_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let source = PathBuf::from(&cli.source);
    let cache = DatasetCache::new();

    match cli.command {
        Commands::Overview => report::overview(&*cache.load(&source)?)?,
        Commands::Performance => report::performance(&*cache.load(&source)?)?,
        Commands::Grades => report::grades(&*cache.load(&source)?)?,
        Commands::Distribution { bin_width } => {
            report::distribution(&*cache.load(&source)?, bin_width)?;
        }
        Commands::Ranking {
            district,
            tier,
            by,
            top,
        } => {
            let options = report::RankingOptions {
                district: district.as_deref().map(report::parse_district).transpose()?,
                tier: tier.as_deref().map(report::parse_tier).transpose()?,
                by: report::parse_field(&by)?,
                top,
            };
            report::ranking(&*cache.load(&source)?, &options)?;
        }
        Commands::Correlation => report::correlation(&*cache.load(&source)?)?,
        Commands::Insights => report::insights(&*cache.load(&source)?)?,
        Commands::Compare { school_a, school_b } => {
            report::compare(&*cache.load(&source)?, &school_a, &school_b)?;
        }
        Commands::Export { out_dir } => {
            let dataset = cache.load(&source)?;
            export_all(Path::new(&out_dir), dataset.records())?;
            println!("Wrote {} artefacts to {out_dir}", EXPORT_FILES.len());
        }
        Commands::Report => {
            // Every section loads through the same cache; the sheet is
            // parsed once.
            report::overview(&*cache.load(&source)?)?;
            report::performance(&*cache.load(&source)?)?;
            report::grades(&*cache.load(&source)?)?;
            report::distribution(&*cache.load(&source)?, 10)?;
            report::ranking(
                &*cache.load(&source)?,
                &report::RankingOptions {
                    district: None,
                    tier: None,
                    by: Field::PassRate,
                    top: None,
                },
            )?;
            report::correlation(&*cache.load(&source)?)?;
            report::insights(&*cache.load(&source)?)?;
        }
    }

    Ok(())
}
