use std::{
	collections::BTreeMap,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tm_schema::{resolve, ObjectSpec};
use tokio::{fs, sync::RwLock};
use tracing::{debug, info, trace};

use super::{Error, State, StateStore, StateValue};

/// Counters of what physically reached the store since it was opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
	pub objects_created: u64,
	pub states_written: u64,
	pub states_unchanged: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tree {
	objects: BTreeMap<String, ObjectSpec>,
	states: BTreeMap<String, State>,
	#[serde(skip)]
	stats: StoreStats,
	#[serde(skip)]
	dirty: bool,
}

impl Tree {
	fn ensure_object(&mut self, path: &str, spec: &ObjectSpec) -> bool {
		if self.objects.contains_key(path) {
			return false;
		}

		trace!(%path, name = %spec.name, "Creating object");
		self.objects.insert(path.to_string(), spec.clone());
		self.stats.objects_created += 1;
		self.dirty = true;

		true
	}
}

/// State tree kept in memory, optionally backed by a JSON snapshot file.
#[derive(Debug, Default)]
pub struct MemoryStore {
	tree: RwLock<Tree>,
	snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Opens a store persisted at `snapshot_path`, starting empty if the file doesn't exist
	/// yet.
	pub async fn open(snapshot_path: impl AsRef<Path>) -> Result<Self, Error> {
		let snapshot_path = snapshot_path.as_ref();

		let tree = match fs::read(snapshot_path).await {
			Ok(bytes) => {
				let tree = serde_json::from_slice::<Tree>(&bytes).map_err(|source| {
					Error::Snapshot {
						path: snapshot_path.into(),
						source,
					}
				})?;

				info!(
					path = %snapshot_path.display(),
					objects = tree.objects.len(),
					states = tree.states.len(),
					"Loaded state snapshot",
				);

				tree
			}
			Err(e) if e.kind() == ErrorKind::NotFound => {
				info!(path = %snapshot_path.display(), "No state snapshot found, starting empty");
				Tree::default()
			}
			Err(e) => return Err(Error::file_io(snapshot_path, e)),
		};

		Ok(Self {
			tree: RwLock::new(tree),
			snapshot_path: Some(snapshot_path.to_path_buf()),
		})
	}

	pub async fn stats(&self) -> StoreStats {
		self.tree.read().await.stats
	}

	/// All object paths currently in the tree, in lexicographic order.
	pub async fn object_paths(&self) -> Vec<String> {
		self.tree.read().await.objects.keys().cloned().collect()
	}
}

#[async_trait]
impl StateStore for MemoryStore {
	async fn ensure_object(&self, path: &str, spec: &ObjectSpec) -> Result<bool, Error> {
		Ok(self.tree.write().await.ensure_object(path, spec))
	}

	async fn write_if_changed(&self, path: &str, value: StateValue) -> Result<bool, Error> {
		let mut tree = self.tree.write().await;

		match tree.objects.get(path).map(ObjectSpec::is_group) {
			Some(true) => return Err(Error::NotALeaf(path.to_string())),
			Some(false) => {}
			None => {
				tree.ensure_object(path, &resolve(path).spec());
			}
		}

		if tree
			.states
			.get(path)
			.is_some_and(|current| current.ack && current.value == value)
		{
			tree.stats.states_unchanged += 1;
			return Ok(false);
		}

		trace!(%path, %value, "Writing state");
		tree.states
			.insert(path.to_string(), State::acknowledged(value));
		tree.stats.states_written += 1;
		tree.dirty = true;

		Ok(true)
	}

	async fn get_object(&self, path: &str) -> Result<Option<ObjectSpec>, Error> {
		Ok(self.tree.read().await.objects.get(path).cloned())
	}

	async fn get_state(&self, path: &str) -> Result<Option<State>, Error> {
		Ok(self.tree.read().await.states.get(path).cloned())
	}

	async fn flush(&self) -> Result<(), Error> {
		let Some(snapshot_path) = &self.snapshot_path else {
			return Ok(());
		};

		let mut tree = self.tree.write().await;
		if !tree.dirty {
			trace!("State snapshot is up to date");
			return Ok(());
		}

		let bytes = serde_json::to_vec_pretty(&*tree)?;

		if let Some(parent) = snapshot_path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| Error::file_io(parent, e))?;
		}

		// Write to a sibling file first so a crash never leaves a truncated snapshot
		let tmp_path = snapshot_path.with_extension("tmp");
		fs::write(&tmp_path, bytes)
			.await
			.map_err(|e| Error::file_io(&tmp_path, e))?;
		fs::rename(&tmp_path, snapshot_path)
			.await
			.map_err(|e| Error::file_io(snapshot_path, e))?;

		tree.dirty = false;
		debug!(path = %snapshot_path.display(), "Flushed state snapshot");

		Ok(())
	}
}
