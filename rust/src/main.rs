//! Interactive entry point. Loads the optional config, sets up logging on
//! stderr so it never interleaves with the menu, and hands stdin/stdout to the
//! shell.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hill_vault::config::{load_config, RuntimeConfig};
use hill_vault::shell::Shell;
use hill_vault::CredentialStore;

const DEFAULT_LOG_FILTER: &str = "hill_vault=warn";

#[derive(Parser, Debug)]
#[command(name = "hill-vault")]
#[command(version, about = "Hill cipher password manager", long_about = None)]
struct Args {
    /// JSON config file with an optional `keyMatrix` and `logFilter`.
    #[arg(long, env = "HILL_VAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter directive (e.g. "hill_vault=debug"). Overrides the config file.
    #[arg(long, env = "HILL_VAULT_LOG")]
    log_filter: Option<String>,
}

fn main() {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("config load failed: {err}");
                std::process::exit(1);
            }
        },
        None => RuntimeConfig::default(),
    };

    let directive = args
        .log_filter
        .or_else(|| config.log_filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let filter_ok = EnvFilter::try_new(&directive).is_ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    if !filter_ok {
        warn!(directive = %directive, "invalid log filter, falling back to default");
    }

    if let Some(fingerprint) = &config.fingerprint {
        info!(fingerprint = %fingerprint, "configuration loaded");
    }
    info!(determinant = config.cipher.key().determinant(), "cipher ready");

    let store = CredentialStore::new(config.cipher);
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout().lock(), store);

    if let Err(err) = shell.run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
