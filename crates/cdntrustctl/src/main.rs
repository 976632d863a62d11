// # cdntrustctl - operator CLI
//
// Thin integration layer over cdntrust-core. All reconciliation logic lives
// in the core crate; this binary parses the command line, reads
// configuration from environment variables, wires the HTTP source and the
// range store together and maps outcomes to exit codes.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `CDNTRUST_ENDPOINTS`: comma-separated tools endpoint URLs, queried in
//   order; takes precedence over the fallback when set
// - `CDNTRUST_FALLBACK_URL`: single fallback URL (default: the public
//   ip-ranges document; set to an empty string to disable)
// - `CDNTRUST_TRUSTED_PROXIES`: comma-separated independently trusted
//   proxies, merged with the stored set by embedding hosts
// - `CDNTRUST_STORE_PATH`: path of the persisted range file
//   (default: /var/lib/cdntrust/ranges.json)
// - `CDNTRUST_LOG_LEVEL`: trace|debug|info|warn|error (default: warn)
//
// ## Example
//
// ```bash
// export CDNTRUST_STORE_PATH=/var/lib/cdntrust/ranges.json
//
// cdntrustctl update --force
// cdntrustctl list
// ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

use cdntrust_core::engine::{UpdateGate, UpdateOptions, UpdateReporter};
use cdntrust_core::{
    EndpointConfig, Error, RangeDiff, StoreConfig, TrustConfig, UpdateEngine, config, state,
};
use cdntrust_ranges_http::HttpRangeSource;

/// Default location of the persisted range file
const DEFAULT_STORE_PATH: &str = "/var/lib/cdntrust/ranges.json";

/// Exit codes for the different run outcomes
///
/// - 0: run accepted and persisted (or listing printed)
/// - 1: the operator declined, or no IPs were found
/// - 2: configuration or runtime error
#[derive(Debug, Clone, Copy)]
enum CtlExitCode {
    /// Accepted and persisted (or informational command succeeded)
    Accepted = 0,
    /// Run-level rejection: declined or nothing fetched
    Rejected = 1,
    /// Configuration error or runtime failure
    Error = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(name = "cdntrustctl")]
#[command(about = "Manage the trusted CDN proxy ranges", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the currently published CDN ranges and update the stored set
    Update(UpdateArgs),
    /// Print the stored set, one prefix per line
    #[command(alias = "ls")]
    List,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// Apply the changes without asking for confirmation
    #[arg(long, short = 'f', visible_alias = "yes", short_alias = 'y')]
    force: bool,

    /// Suppress report output (the decision logic is unaffected)
    #[arg(long, short = 'q')]
    quiet: bool,
}

/// Application configuration
struct AppConfig {
    trust: TrustConfig,
    log_level: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let cloudfront_tools = list_var("CDNTRUST_ENDPOINTS");

        // An explicitly empty value disables the fallback entirely
        let fallback = match env::var("CDNTRUST_FALLBACK_URL") {
            Ok(url) if url.trim().is_empty() => None,
            Ok(url) => Some(url.trim().to_string()),
            Err(_) => Some(config::IP_RANGES_URL.to_string()),
        };

        let store_path =
            env::var("CDNTRUST_STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());

        Self {
            trust: TrustConfig {
                endpoints: EndpointConfig {
                    cloudfront_tools,
                    fallback,
                },
                trusted_proxies: list_var("CDNTRUST_TRUSTED_PROXIES"),
                store: StoreConfig::File { path: store_path },
            },
            log_level: env::var("CDNTRUST_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        }
    }
}

/// Read a comma-separated environment variable into a trimmed list
fn list_var(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Prints the operator-facing report
///
/// `quiet` silences everything here; the engine and the gate still make the
/// same decisions.
struct ConsoleReporter {
    quiet: bool,
}

impl UpdateReporter for ConsoleReporter {
    fn downloading(&self, url: &str) {
        if !self.quiet {
            println!("Downloading IPs from [\"{url}\"]");
        }
    }

    fn fetch_failed(&self, url: &str, error: &Error) {
        if !self.quiet {
            eprintln!("Failed to download [\"{url}\"]: {error}");
        }
    }

    fn unrecognized_payload(&self, url: &str) {
        if !self.quiet {
            eprintln!("Skipping [\"{url}\"]: unrecognized payload");
        }
    }

    fn changes(&self, diff: &RangeDiff, total: usize) {
        if self.quiet {
            return;
        }

        if !diff.added.is_empty() {
            println!("\nAdding IPs:");
            for prefix in &diff.added {
                println!("    {prefix}");
            }
        }

        if !diff.removed.is_empty() {
            println!("\nRemoving IPs:");
            for prefix in &diff.removed {
                println!("    {prefix}");
            }
        }

        println!("\nLeaving us with {total} IPs remaining.\n");
    }

    fn no_changes(&self) {
        if !self.quiet {
            println!("No changes detected.");
        }
    }

    fn no_ranges_found(&self) {
        if !self.quiet {
            println!("No IPs were found.");
        }
    }
}

/// Interactive yes/no confirmation, defaulting to no
struct ConfirmGate;

impl UpdateGate for ConfirmGate {
    fn confirm(&self, _diff: &RangeDiff, _total: usize) -> cdntrust_core::Result<bool> {
        Confirm::new()
            .with_prompt("Do you want to apply these changes?")
            .default(false)
            .interact()
            .map_err(|e| Error::prompt(format!("confirmation failed: {e}")))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = AppConfig::from_env();
    if let Err(e) = config.trust.validate() {
        eprintln!("configuration error: {e}");
        return CtlExitCode::Error.into();
    }

    // Initialize tracing; operator-facing output goes through the reporter,
    // so diagnostics stay on stderr
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
        return CtlExitCode::Error.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to create tokio runtime: {e}");
            return CtlExitCode::Error.into();
        }
    };

    rt.block_on(async {
        let result = match cli.command {
            Commands::Update(args) => run_update(&config, args).await,
            Commands::List => run_list(&config).await,
        };

        result.unwrap_or_else(|e| {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            CtlExitCode::Error
        })
    })
    .into()
}

/// Run the update flow and map its outcome to an exit code
async fn run_update(config: &AppConfig, args: UpdateArgs) -> Result<CtlExitCode> {
    let store = state::build_store(&config.trust.store).await?;

    let engine = UpdateEngine::new(
        Box::new(HttpRangeSource::new()),
        store,
        Box::new(ConsoleReporter { quiet: args.quiet }),
        Box::new(ConfirmGate),
        config.trust.endpoints.clone(),
    );

    let outcome = engine.run(UpdateOptions { force: args.force }).await?;
    Ok(if outcome.accepted() {
        CtlExitCode::Accepted
    } else {
        CtlExitCode::Rejected
    })
}

/// Print the stored set, one prefix per line
async fn run_list(config: &AppConfig) -> Result<CtlExitCode> {
    let store = state::build_store(&config.trust.store).await?;
    let prefixes = store.load().await?;

    for prefix in &prefixes {
        println!("{prefix}");
    }

    Ok(CtlExitCode::Accepted)
}
