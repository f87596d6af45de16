use std::{env, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use tm_core::{AppConfig, Node, SyncEngine, Upstream};
use tm_state_store::{MemoryStore, StateStore};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser, Debug)]
#[command(name = "traccar-mirror", about = "Mirrors a Traccar server into a local state tree")]
struct Args {
	/// Path to the TOML configuration file
	#[arg(short, long, default_value = "traccar-mirror.toml")]
	config: PathBuf,

	/// Run a single sync cycle and exit
	#[arg(long)]
	once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let (filter, filter_handle) = reload::Layer::new(
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
	);

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_target(false))
		.init();

	let config = AppConfig::load_from(&args.config)?;

	if let Some(filter) = configured_filter(env::var("RUST_LOG").ok().as_deref(), &config.log_level)? {
		filter_handle
			.reload(filter)
			.context("failed to apply the configured log level")?;
	}

	let store: Arc<dyn StateStore> = match &config.store.snapshot_path {
		Some(path) => Arc::new(
			MemoryStore::open(path)
				.await
				.with_context(|| format!("failed to open state snapshot {}", path.display()))?,
		),
		None => Arc::new(MemoryStore::new()),
	};

	let upstream: Arc<dyn Upstream> = Arc::new(
		config
			.traccar
			.request_config()
			.context("failed to build the Traccar client")?,
	);

	if args.once {
		let report = SyncEngine::new(upstream, Arc::clone(&store))
			.run_cycle()
			.await?;
		info!(?report, "Single sync cycle finished");

		store.flush().await?;
		return Ok(());
	}

	let node = Node::start(&config.traccar, upstream, store).await?;

	if let Err(e) = tokio::signal::ctrl_c().await {
		error!(?e, "Failed to listen for the shutdown signal");
	}

	info!("Shutting down");
	node.shutdown().await;

	Ok(())
}

/// Filter from the configured `log_level`, unless `RUST_LOG` already decided.
fn configured_filter(rust_log: Option<&str>, log_level: &str) -> Result<Option<EnvFilter>> {
	if rust_log.is_some_and(|directives| !directives.is_empty()) {
		return Ok(None);
	}

	EnvFilter::try_new(log_level)
		.map(Some)
		.with_context(|| format!("invalid log level '{log_level}'"))
}
