//! Hype Detector CLI
//!
//! Composite hype index for search terms.

use chrono::Utc;
use clap::{Parser, Subcommand};
use hype_detector::{
    config::Config,
    core::{HypeReport, ReportBuilder},
    source::{fetch_sample, FileSource, VideoSource},
    stats::create_shared_stats_with_persistence,
    METHODOLOGY, VERSION,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "fetch")]
use hype_detector::BlockingTikTokClient;

#[derive(Parser)]
#[command(name = "hype-detector")]
#[command(version = VERSION)]
#[command(about = "Composite hype index for search terms from short-video engagement", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch videos for a search term and compute its hype index
    Analyze {
        /// Search term to analyze
        term: String,

        /// Read videos from a JSON file instead of the search API
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Save the report to the export directory
        #[arg(long)]
        save: bool,
    },

    /// Score a local JSON sample of videos
    Score {
        /// JSON file (array of videos or saved API response)
        #[arg(long, short)]
        input: PathBuf,

        /// Label for the report
        #[arg(long, default_value = "")]
        term: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Explain how the index is computed
    Methodology,

    /// Show configuration summary and usage statistics
    Status {
        /// Reset the usage statistics
        #[arg(long)]
        reset: bool,
    },

    /// Show configuration, or update the saved search API settings
    Config {
        /// Search API host
        #[arg(long)]
        api_host: Option<String>,

        /// Search API key
        #[arg(long)]
        api_key: Option<String>,

        /// Videos requested per search
        #[arg(long)]
        result_count: Option<u32>,
    },

    /// Serve the index over HTTP (requires server feature)
    #[cfg(feature = "server")]
    Serve {
        /// Port to bind to
        #[arg(long, default_value = "8787")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command {
        Commands::Analyze {
            term,
            input,
            json,
            save,
        } => {
            cmd_analyze(&term, input, json, save);
        }
        Commands::Score { input, term, json } => {
            cmd_score(&input, &term, json);
        }
        Commands::Methodology => {
            cmd_methodology();
        }
        Commands::Status { reset } => {
            cmd_status(reset);
        }
        Commands::Config {
            api_host,
            api_key,
            result_count,
        } => {
            if api_host.is_some() || api_key.is_some() || result_count.is_some() {
                cmd_config_update(api_host, api_key, result_count);
            }
            cmd_config();
        }
        #[cfg(feature = "server")]
        Commands::Serve { port } => {
            cmd_serve(port);
        }
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default_filter = if debug {
        "hype_detector=debug"
    } else {
        "hype_detector=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_analyze(term: &str, input: Option<PathBuf>, json: bool, save: bool) {
    let term = term.trim();
    if term.is_empty() {
        eprintln!("Error: search term must not be empty");
        std::process::exit(1);
    }

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config, using defaults: {e}");
        Config::default()
    });
    let stats = create_shared_stats_with_persistence(config.data_path.join("stats.json"));

    let records = match input {
        Some(path) => fetch_sample(&FileSource::new(path), term),
        None => fetch_from_api(&config, term),
    };

    let builder = ReportBuilder::new();
    let report = builder.build(term, records.as_deref());
    stats.record_report(&report);

    print_report(&report, json);

    if save {
        if let Err(e) = config.ensure_directories() {
            eprintln!("Error creating directories: {e}");
            std::process::exit(1);
        }
        match export_report(&config.export_path, &report) {
            Ok(path) => {
                stats.record_report_exported();
                eprintln!("Saved report to {path:?}");
            }
            Err(e) => eprintln!("Error writing report: {e}"),
        }
    }

    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save usage stats: {e}");
    }
}

#[cfg(feature = "fetch")]
fn fetch_from_api(config: &Config, term: &str) -> Option<Vec<hype_detector::VideoRecord>> {
    match BlockingTikTokClient::new(config.api.clone()) {
        Ok(client) => fetch_sample(&client as &dyn VideoSource, term),
        Err(e) => {
            eprintln!("Warning: {e}");
            eprintln!(
                "Set {} and {} (or edit {:?}) to enable searches.",
                hype_detector::config::API_KEY_ENV,
                hype_detector::config::API_HOST_ENV,
                Config::config_path()
            );
            None
        }
    }
}

#[cfg(not(feature = "fetch"))]
fn fetch_from_api(_config: &Config, _term: &str) -> Option<Vec<hype_detector::VideoRecord>> {
    eprintln!("Warning: search API support not enabled at compile time (fetch feature).");
    eprintln!("Use --input to analyze a local sample.");
    None
}

fn cmd_score(input: &Path, term: &str, json: bool) {
    let source = FileSource::new(input);
    let records = match source.fetch(term) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let report = ReportBuilder::new().build(term.trim(), Some(&records[..]));
    print_report(&report, json);
}

fn print_report(report: &HypeReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing report: {e}"),
        }
    } else {
        println!("{}", report.summary());
    }
}

/// Write a report as pretty JSON into an existing `dir`, returning the file path.
fn export_report(dir: &Path, report: &HypeReport) -> std::io::Result<PathBuf> {
    let slug: String = report
        .term
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let path = dir.join(format!(
        "report_{}_{}.json",
        slug,
        Utc::now().format("%Y%m%d_%H%M%S")
    ));

    let json = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

fn cmd_methodology() {
    println!("{METHODOLOGY}");
}

fn cmd_status(reset: bool) {
    let config = Config::load().unwrap_or_default();
    let stats_path = config.data_path.join("stats.json");

    if reset {
        let stats = create_shared_stats_with_persistence(stats_path.clone());
        stats.reset();
        if let Err(e) = stats.save() {
            eprintln!("Error resetting usage stats: {e}");
            std::process::exit(1);
        }
        println!("Usage statistics reset.");
        println!();
    }

    println!("Hype Detector Status");
    println!("====================");
    println!();

    println!("Configuration:");
    println!(
        "  Search API: {}",
        if config.api.has_credentials() {
            "configured"
        } else {
            "not configured"
        }
    );
    println!(
        "  Network fetch: {}",
        if cfg!(feature = "fetch") {
            "compiled in"
        } else {
            "not compiled in"
        }
    );
    println!("  Videos per search: {}", config.api.result_count);
    println!("  Reports directory: {:?}", config.export_path);
    println!();

    if stats_path.exists() {
        let stats = create_shared_stats_with_persistence(stats_path);
        println!("{}", stats.summary());
    } else {
        println!("No previous queries found.");
    }
}

/// Update the saved config file. Environment overrides are not persisted.
fn cmd_config_update(host: Option<String>, key: Option<String>, result_count: Option<u32>) {
    let mut config = match Config::load_from(&Config::config_path()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            std::process::exit(1);
        }
    };

    if let Some(host) = host {
        config.api.host = host.trim().to_string();
    }
    if let Some(key) = key {
        config.api.key = key.trim().to_string();
    }
    if let Some(count) = result_count {
        config.api.result_count = count;
    }

    if let Err(e) = config.save() {
        eprintln!("Error saving config: {e}");
        std::process::exit(1);
    }
    println!("Saved configuration.");
    println!();
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();

    let mut shown = config.clone();
    if !shown.api.key.is_empty() {
        shown.api.key = "********".to_string();
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&shown).unwrap_or_else(|_| "Error".to_string())
    );
}

#[cfg(feature = "server")]
fn cmd_serve(port: u16) {
    use hype_detector::server::{run, ServerConfig};

    let config = Config::load().unwrap_or_default();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error creating runtime: {e}");
            std::process::exit(1);
        }
    };

    runtime.block_on(async move {
        let (addr, shutdown_tx) = match run(ServerConfig::new(port, config.api)).await {
            Ok(started) => started,
            Err(e) => {
                eprintln!("Error starting server: {e}");
                std::process::exit(1);
            }
        };

        println!("Hype Detector v{VERSION} listening on http://{addr}");
        println!("Press Ctrl+C to stop");

        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Error waiting for Ctrl+C: {e}");
        }
        let _ = shutdown_tx.send(());
    });
}
