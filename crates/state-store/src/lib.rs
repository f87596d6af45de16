#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::unnecessary_cast,
	clippy::cast_lossless,
	clippy::cast_possible_truncation,
	clippy::cast_possible_wrap,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::dbg_macro,
	clippy::deprecated_cfg_attr,
	clippy::separated_literal_suffix,
	deprecated
)]
#![forbid(deprecated_in_future)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

use async_trait::async_trait;
use tm_schema::ObjectSpec;

mod error;
mod memory;
mod value;

pub use error::Error;
pub use memory::{MemoryStore, StoreStats};
pub use value::{State, StateValue};

/// Hierarchical key-value tree the mirror writes into.
///
/// Objects are created at most once and never removed from here, values are compared
/// against the last known state so unchanged data never reaches the backing storage.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
	/// Creates the object at `path` if absent. Returns whether it was created.
	async fn ensure_object(&self, path: &str, spec: &ObjectSpec) -> Result<bool, Error>;

	/// Stores `value` as an acknowledged state unless it equals the current one. Returns
	/// whether a physical write happened.
	async fn write_if_changed(&self, path: &str, value: StateValue) -> Result<bool, Error>;

	async fn get_object(&self, path: &str) -> Result<Option<ObjectSpec>, Error>;

	async fn get_state(&self, path: &str) -> Result<Option<State>, Error>;

	/// Persists pending changes, called once per successful sync cycle.
	async fn flush(&self) -> Result<(), Error> {
		Ok(())
	}
}
