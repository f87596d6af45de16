//! Application configuration

use super::TraccarConfig;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
	/// Logging level, overridden by `RUST_LOG`
	#[serde(default = "default_log_level")]
	pub log_level: String,

	/// Upstream server
	pub traccar: TraccarConfig,

	/// Local state tree
	#[serde(default)]
	pub store: StoreConfig,
}

/// Configuration for the local state tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
	/// JSON file the tree is persisted to, kept in memory only when unset
	pub snapshot_path: Option<PathBuf>,
}

fn default_log_level() -> String {
	"info".to_string()
}

impl AppConfig {
	/// Load configuration from a TOML file, then apply `TRACCAR_*` environment overrides
	pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		info!("Loading config from {:?}", path);

		let contents = fs::read_to_string(path)
			.with_context(|| format!("failed to read config file {}", path.display()))?;

		let mut config = Self::from_toml_str(&contents)
			.with_context(|| format!("invalid config file {}", path.display()))?;

		config.apply_overrides(|key| std::env::var(key).ok())?;
		config.validate()?;

		Ok(config)
	}

	pub fn from_toml_str(contents: &str) -> Result<Self> {
		toml::from_str(contents).map_err(|e| anyhow!("{e}"))
	}

	/// Overrides connection settings with values found through `lookup`, which maps an
	/// environment variable name to its value
	pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
		let traccar = &mut self.traccar;

		if let Some(host) = lookup("TRACCAR_HOST") {
			traccar.host = host;
		}
		if let Some(port) = lookup("TRACCAR_PORT") {
			traccar.port = port
				.parse()
				.with_context(|| format!("TRACCAR_PORT is not a valid port: {port}"))?;
		}
		if let Some(username) = lookup("TRACCAR_USERNAME") {
			traccar.username = username;
		}
		if let Some(password) = lookup("TRACCAR_PASSWORD") {
			traccar.password = password;
		}
		if let Some(interval) = lookup("TRACCAR_UPDATE_INTERVAL") {
			traccar.update_interval = interval.parse().with_context(|| {
				format!("TRACCAR_UPDATE_INTERVAL is not a number of seconds: {interval}")
			})?;
		}

		Ok(())
	}

	pub fn validate(&self) -> Result<()> {
		if self.traccar.host.trim().is_empty() {
			bail!("traccar.host must not be empty");
		}
		if self.traccar.update_interval == 0 {
			bail!("traccar.update_interval must be at least one second");
		}
		if self.traccar.request_timeout == 0 {
			bail!("traccar.request_timeout must be at least one second");
		}

		Ok(())
	}
}
