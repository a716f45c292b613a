//! # Configuration
//!
//! Policy resolution and logging setup.
//!
//! Precedence for the policy: explicit file (`--policy` or `BRONCHIO_POLICY`)
//! > named preset (`--preset` or `BRONCHIO_PRESET`) > built-in default.
//! Whatever wins is validated before use.

use crate::error::{AppError, AppResult};
use bronchio_core::PolicyConfig;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// POLICY
// =============================================================================

/// Read and validate a policy JSON file.
pub fn read_policy_file(path: &Path) -> AppResult<PolicyConfig> {
    let content = std::fs::read_to_string(path)?;
    let policy: PolicyConfig = serde_json::from_str(&content)?;
    Ok(policy.validated()?)
}

/// Resolve the effective policy.
pub fn load_policy(path: Option<&Path>, preset: Option<&str>) -> AppResult<PolicyConfig> {
    match (path, preset) {
        (Some(path), _) => {
            tracing::debug!(path = %path.display(), "loading policy file");
            read_policy_file(path)
        }
        (None, Some(name)) => {
            tracing::debug!(preset = name, "using policy preset");
            Ok(PolicyConfig::preset(name)?.validated()?)
        }
        (None, None) => Ok(PolicyConfig::default()),
    }
}

// =============================================================================
// SERVER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::InvalidArgument(format!("invalid host: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

// =============================================================================
// LOGGING
// =============================================================================

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Logs go to stderr so stdout stays clean for JSON output.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
    {
        tracing::debug!(error = %err, "global subscriber already installed; keeping it");
    }
}
