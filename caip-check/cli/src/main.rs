//! caip-check - CI gate for CAIP front-matter

use caip_check_lib::{CheckConfig, check_folder};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Folder checked when neither an argument nor `CAIP_DIR` is given
const DEFAULT_FOLDER: &str = "CAIPs";

#[derive(Parser)]
#[command(name = "caip-check")]
#[command(about = "Validate the front-matter of every CAIP in a folder", long_about = None)]
struct Cli {
    /// Folder of proposal documents [default: $CAIP_DIR or CAIPs]
    #[arg(value_name = "FOLDER")]
    folder: Option<PathBuf>,

    /// YAML rule-set to use instead of the built-in CAIP rules
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,caip_check_lib=info".to_string(),
            2 => "info,caip_check_lib=debug".to_string(),
            _ => "debug,caip_check_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    // Logs go to stderr; stdout carries only the check result
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn resolve_folder(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::var("CAIP_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER))
}

/// Print the failure banner and reason, then exit non-zero
fn fail(kind: &str, reason: impl std::fmt::Display) -> ! {
    println!("Validation of {} failed", kind);
    println!("Reason: {}", reason);
    std::process::exit(1);
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    let config = match cli.config.as_deref() {
        Some(path) => {
            tracing::debug!("Loading rule-set from {}", path.display());
            match CheckConfig::load(path) {
                Ok(config) => config,
                Err(e) => fail(&CheckConfig::caip().display_plural(), e),
            }
        }
        None => CheckConfig::caip(),
    };

    let folder = resolve_folder(cli.folder);
    tracing::info!("Checking {} in {}", config.display_plural(), folder.display());

    match check_folder(&folder, &config) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            tracing::debug!("Check failed: {:?}", e);
            fail(&config.display_plural(), e);
        }
    }
}
