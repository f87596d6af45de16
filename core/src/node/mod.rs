use std::sync::Arc;

use tm_schema::ObjectPath;
use tm_state_store::{StateStore, StateValue};
use tracing::{debug, error, info};

use crate::{
	config::TraccarConfig,
	sync::{SyncEngine, SyncHandle, Upstream},
};

/// A running mirror: the sync loop plus the `info.connection` flag it advertises.
///
/// The flag tracks the process lifecycle, it turns on once startup completes and off on
/// shutdown, failed cycles leave it untouched.
pub struct Node {
	store: Arc<dyn StateStore>,
	sync: SyncHandle,
}

impl Node {
	pub async fn start(
		config: &TraccarConfig,
		upstream: Arc<dyn Upstream>,
		store: Arc<dyn StateStore>,
	) -> Result<Self, tm_state_store::Error> {
		set_connection(store.as_ref(), false).await?;

		debug!("Server IP: {}", config.host);
		debug!("Port: {}", config.port);
		debug!("Username: {}", config.username);
		debug!("Password: {}", config.masked_password());
		debug!("Update interval: {}", config.update_interval);

		let engine = Arc::new(SyncEngine::new(upstream, Arc::clone(&store)));
		let sync = engine.spawn(config.update_interval());

		set_connection(store.as_ref(), true).await?;
		info!("Traccar mirror is up and running");

		Ok(Self { store, sync })
	}

	pub async fn is_connected(&self) -> bool {
		matches!(
			self.store
				.get_state(ObjectPath::InfoConnection.as_template())
				.await,
			Ok(Some(state)) if state.value == StateValue::Bool(true)
		)
	}

	/// Stops the sync loop, then resets the connection flag. Never fails, store errors
	/// are only reported.
	pub async fn shutdown(self) {
		let Self { store, sync } = self;

		sync.shutdown().await;

		if let Err(e) = set_connection(store.as_ref(), false).await {
			error!(?e, "Failed to reset connection state: {e:#}");
		}

		if let Err(e) = store.flush().await {
			error!(?e, "Failed to flush state store: {e:#}");
		}

		info!("Traccar mirror stopped");
	}
}

async fn set_connection(store: &dyn StateStore, connected: bool) -> Result<(), tm_state_store::Error> {
	let path = ObjectPath::InfoConnection.as_template();

	store
		.ensure_object(path, ObjectPath::InfoConnection.spec())
		.await?;
	store.write_if_changed(path, connected.into()).await?;

	Ok(())
}
