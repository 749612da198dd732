// # zonesync - zone record synchronization CLI
//
// This is a THIN integration layer: it reads configuration, sets up
// logging, builds a store through the registry and hands the work to
// `zonesync_core::Reconciler`. No record logic lives here.
//
// ## Configuration
//
// Provider settings come from environment variables:
//
// - `ZONESYNC_ZONE`: Zone to operate on (overridden by `--zone`)
// - `ZONESYNC_PROVIDER_TYPE`: Store type (default regery, or any registered factory)
// - `ZONESYNC_PROVIDER_CONFIG`: JSON settings for a non-regery store (default `{}`)
// - `ZONESYNC_API_TOKEN`: API token
// - `ZONESYNC_API_SECRET`: API secret
// - `ZONESYNC_BASE_URL`: API base URL (optional)
// - `ZONESYNC_DEFAULT_TTL`: TTL in seconds for records without one (default 3600)
// - `ZONESYNC_TIMEOUT_SECS`: Per-request timeout in seconds (default 30)
// - `ZONESYNC_MODE`: Set to `dry-run` to log writes instead of sending them
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export ZONESYNC_API_TOKEN=your_token
// export ZONESYNC_API_SECRET=your_secret
//
// zonesync --zone example.com list
// echo '[{"name":"www","type":"A","value":"10.0.0.2","ttl":600}]' | zonesync --zone example.com set -
// ```
//
// Results are printed to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::{ProviderConfig, Reconciler, Record, StoreRegistry, ZoneSyncConfig};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Success
/// - 1: Configuration or startup error
/// - 2: Runtime error (store call failed, interrupted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoneSyncExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<ZoneSyncExitCode> for ExitCode {
    fn from(code: ZoneSyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "zonesync", version, about = "Synchronize DNS zone records with a remote provider")]
struct Cli {
    /// Zone to operate on (defaults to ZONESYNC_ZONE)
    #[arg(long, short = 'z')]
    zone: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every record in the zone
    List,
    /// Add records without touching existing ones
    Append {
        /// JSON array of records, or `-` for stdin
        file: PathBuf,
    },
    /// Remove records
    Delete {
        /// JSON array of records, or `-` for stdin
        file: PathBuf,
    },
    /// Replace all records sharing a name with the given records
    Set {
        /// JSON array of records, or `-` for stdin
        file: PathBuf,
    },
}

/// Application configuration
struct Config {
    zone: Option<String>,
    provider_type: String,
    provider_config: serde_json::Value,
    api_token: String,
    api_secret: String,
    base_url: Option<String>,
    default_ttl_secs: Option<u64>,
    timeout_secs: Option<u64>,
    dry_run: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            zone: env::var("ZONESYNC_ZONE").ok(),
            provider_type: env::var("ZONESYNC_PROVIDER_TYPE")
                .unwrap_or_else(|_| "regery".to_string()),
            provider_config: match env::var("ZONESYNC_PROVIDER_CONFIG") {
                Ok(raw) => serde_json::from_str(&raw)
                    .context("ZONESYNC_PROVIDER_CONFIG must be a JSON object")?,
                Err(_) => serde_json::json!({}),
            },
            api_token: env::var("ZONESYNC_API_TOKEN").unwrap_or_default(),
            api_secret: env::var("ZONESYNC_API_SECRET").unwrap_or_default(),
            base_url: env::var("ZONESYNC_BASE_URL").ok().filter(|s| !s.is_empty()),
            default_ttl_secs: parse_env("ZONESYNC_DEFAULT_TTL")?,
            timeout_secs: parse_env("ZONESYNC_TIMEOUT_SECS")?,
            dry_run: env::var("ZONESYNC_MODE")
                .unwrap_or_default()
                .to_lowercase()
                == "dry-run",
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    fn is_regery(&self) -> bool {
        self.provider_type == "regery"
    }

    /// Validate the configuration against the stores in `registry`
    fn validate(&self, registry: &StoreRegistry) -> Result<()> {
        if !registry.has_store(&self.provider_type) {
            anyhow::bail!(
                "ZONESYNC_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: {}",
                self.provider_type,
                registry.list_stores().join(", ")
            );
        }

        log_level(&self.log_level)?;

        if !self.is_regery() {
            if !self.provider_config.is_object() {
                anyhow::bail!("ZONESYNC_PROVIDER_CONFIG must be a JSON object");
            }
            return Ok(());
        }

        if self.api_token.is_empty() {
            anyhow::bail!(
                "ZONESYNC_API_TOKEN is required. \
                Set it via: export ZONESYNC_API_TOKEN=your_token"
            );
        }

        if self.api_secret.is_empty() {
            anyhow::bail!(
                "ZONESYNC_API_SECRET is required. \
                Set it via: export ZONESYNC_API_SECRET=your_secret"
            );
        }

        if let Some(ttl) = self.default_ttl_secs
            && ttl == 0
        {
            anyhow::bail!("ZONESYNC_DEFAULT_TTL must be greater than 0");
        }

        if let Some(timeout) = self.timeout_secs
            && !(1..=600).contains(&timeout)
        {
            anyhow::bail!(
                "ZONESYNC_TIMEOUT_SECS must be between 1 and 600 seconds. Got: {}",
                timeout
            );
        }

        Ok(())
    }

    /// Build the library configuration, preferring `zone_override` over the environment
    fn to_zone_sync_config(&self, zone_override: Option<String>) -> Result<ZoneSyncConfig> {
        let zone = zone_override
            .or_else(|| self.zone.clone())
            .context("No zone given. Pass --zone or set ZONESYNC_ZONE")?;

        if !self.is_regery() {
            let provider = ProviderConfig::Custom {
                factory: self.provider_type.clone(),
                config: self.provider_config.clone(),
            };
            let config = ZoneSyncConfig::new(zone, provider);
            config.validate()?;
            return Ok(config);
        }

        let mut provider = ProviderConfig::regery(&self.api_token, &self.api_secret);
        if let ProviderConfig::Regery {
            base_url,
            default_ttl_secs,
            timeout_secs,
            dry_run,
            ..
        } = &mut provider
        {
            *base_url = self.base_url.clone();
            if let Some(ttl) = self.default_ttl_secs {
                *default_ttl_secs = ttl;
            }
            if let Some(timeout) = self.timeout_secs {
                *timeout_secs = timeout;
            }
            *dry_run = self.dry_run;
        }

        let config = ZoneSyncConfig::new(zone, provider);
        config.validate()?;
        Ok(config)
    }
}

fn parse_env(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a whole number of seconds. Got: {}", key, value)),
        Err(_) => Ok(None),
    }
}

fn log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "ZONESYNC_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Read a JSON array of records from `path`, or stdin for `-`
fn read_records(path: &Path) -> Result<Vec<Record>> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read records from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file {}", path.display()))?
    };

    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid records JSON in {}", path.display()))
}

/// Registry with every store compiled into this binary
fn build_registry() -> StoreRegistry {
    let registry = StoreRegistry::new();

    #[cfg(feature = "regery")]
    zonesync_provider_regery::register(&registry);

    registry
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let registry = build_registry();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ZoneSyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate(&registry) {
        eprintln!("Configuration validation error: {:#}", e);
        return ZoneSyncExitCode::ConfigError.into();
    }

    let sync_config = match config.to_zone_sync_config(cli.zone.clone()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return ZoneSyncExitCode::ConfigError.into();
        }
    };

    // Initialize tracing; stdout is reserved for results
    let level = log_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZoneSyncExitCode::ConfigError.into();
    }

    let reconciler = match open_store(&registry, &sync_config) {
        Ok(reconciler) => reconciler,
        Err(code) => return code.into(),
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZoneSyncExitCode::ConfigError.into();
        }
    };

    let is_set = matches!(cli.command, Command::Set { .. });

    let result = rt.block_on(async {
        tokio::select! {
            result = run(&reconciler, &sync_config.zone, cli.command) => match result {
                Ok(()) => ZoneSyncExitCode::Success,
                Err(e) => {
                    error!("{:#}", e);
                    ZoneSyncExitCode::RuntimeError
                }
            },
            // A failed handler setup disables this branch; the command keeps running.
            Ok(name) = wait_for_shutdown() => {
                warn!("Received {}, aborting in-flight request", name);
                if is_set {
                    warn!("Set was interrupted; the zone may hold both old and new records");
                }
                ZoneSyncExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Build the configured store; failures here are startup errors
fn open_store(
    registry: &StoreRegistry,
    config: &ZoneSyncConfig,
) -> std::result::Result<Reconciler, ZoneSyncExitCode> {
    match registry.create_store(&config.provider) {
        Ok(store) => Ok(Reconciler::new(Arc::from(store))),
        Err(e) => {
            error!("Failed to create {} store: {}", config.provider.type_name(), e);
            Err(ZoneSyncExitCode::ConfigError)
        }
    }
}

/// Execute one command against the configured store
async fn run(reconciler: &Reconciler, zone: &str, command: Command) -> Result<()> {
    info!("Using {} store for zone {}", reconciler.store_name(), zone);

    let output = match command {
        Command::List => reconciler.list(zone).await?,
        Command::Append { file } => reconciler.append(zone, &read_records(&file)?).await?,
        Command::Delete { file } => reconciler.delete(zone, &read_records(&file)?).await?,
        Command::Set { file } => {
            let report = reconciler.reconcile(zone, &read_records(&file)?).await?;
            if let Some(e) = &report.cleanup_error {
                warn!(
                    "Records were set, but {} superseded record(s) are still in {}: {}",
                    report.superseded.len(),
                    zone,
                    e
                );
                for record in &report.superseded {
                    warn!("Stale record: {}", record);
                }
            }
            report.applied
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
