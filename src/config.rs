use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DATA_DIR_ENV: &str = "FEEDHUB_DATA_DIR";
pub const LOG_ENV: &str = "FEEDHUB_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Pick the table directory: explicit flag, then `FEEDHUB_DATA_DIR`, then
/// the platform data directory, then `./Data`.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = flag {
        return dir;
    }
    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    default_data_dir()
}

fn default_data_dir() -> PathBuf {
    // Use XDG data directory or fallback
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "feedhub") {
        proj_dirs.data_dir().join("data")
    } else {
        PathBuf::from("Data")
    }
}

/// Install a stderr subscriber filtered by `FEEDHUB_LOG` (default `warn`).
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = match env::var(LOG_ENV) {
        Ok(spec) if !spec.trim().is_empty() => spec,
        _ if verbose => "feedhub=debug".to_string(),
        _ => DEFAULT_LOG_FILTER.to_string(),
    };
    let env_filter = EnvFilter::try_new(&filter)
        .map_err(|e| anyhow!("Invalid log filter '{}': {}", filter, e))?;

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
