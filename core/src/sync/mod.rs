//! Mirrors the Traccar collections into the state tree, one cycle at a time.

use std::{sync::Arc, time::Duration};

use futures_concurrency::future::Join;
use tm_state_store::StateStore;
use tracing::{debug, instrument};

mod error;
mod scheduler;
mod tree;
mod upstream;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CycleError;
pub use scheduler::SyncHandle;
pub use tree::{plan, Intent, Snapshot};
pub use upstream::Upstream;

/// What a successful cycle did to the state tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
	pub devices: usize,
	pub geofences: usize,
	pub objects_created: usize,
	pub states_written: usize,
	pub states_unchanged: usize,
}

pub struct SyncEngine {
	upstream: Arc<dyn Upstream>,
	store: Arc<dyn StateStore>,
}

impl SyncEngine {
	pub fn new(upstream: Arc<dyn Upstream>, store: Arc<dyn StateStore>) -> Self {
		Self { upstream, store }
	}

	/// Fetches, joins and writes everything once.
	///
	/// The tree is only touched after the whole snapshot was fetched and joined, so a
	/// failing cycle leaves the state exactly as the last successful one did.
	#[instrument(skip(self))]
	pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
		let snapshot = self.fetch().await?;

		debug!(
			devices = snapshot.devices.len(),
			positions = snapshot.positions.len(),
			geofences = snapshot.geofences.len(),
			"Fetched upstream collections",
		);

		let intents = plan(&snapshot)?;

		let mut report = CycleReport {
			devices: snapshot.devices.len(),
			geofences: snapshot.geofences.len(),
			..Default::default()
		};

		self.apply(intents, &mut report).await?;
		self.store.flush().await?;

		Ok(report)
	}

	async fn fetch(&self) -> Result<Snapshot, CycleError> {
		let (devices, positions, geofences) = (
			self.upstream.devices(),
			self.upstream.positions(),
			self.upstream.geofences(),
		)
			.join()
			.await;

		Ok(Snapshot {
			devices: devices?,
			positions: positions?,
			geofences: geofences?,
		})
	}

	async fn apply(&self, intents: Vec<Intent>, report: &mut CycleReport) -> Result<(), CycleError> {
		for intent in intents {
			match intent {
				Intent::Group { path, spec } => {
					if self.store.ensure_object(&path, &spec).await? {
						report.objects_created += 1;
					}
				}
				Intent::Leaf {
					path,
					object,
					value,
				} => {
					if self.store.ensure_object(&path, object.spec()).await? {
						report.objects_created += 1;
					}

					if self.store.write_if_changed(&path, value).await? {
						report.states_written += 1;
					} else {
						report.states_unchanged += 1;
					}
				}
			}
		}

		Ok(())
	}

	/// Starts the self-rescheduling loop: one cycle now, the next `interval` after it
	/// settles, and so on until the returned handle is shut down.
	pub fn spawn(self: Arc<Self>, interval: Duration) -> SyncHandle {
		scheduler::spawn_loop(self, interval)
	}
}
