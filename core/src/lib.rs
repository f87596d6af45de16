//!
//! # Traccar Mirror Core
//!
//! Polls a Traccar server for devices, positions and geofences and mirrors them into a
//! hierarchical state tree:
//!
//! ```text
//! devices
//! └── <device id>          unique_id, device_name, status, latitude, altitude, ...
//! geofences
//! └── <geofence id>        geofence_name, device_ids, devices
//! info.connection
//! ```
//!
//! The [`Node`] owns the lifecycle: it flags the connection, then hands a [`SyncEngine`] to
//! a self-rescheduling loop that runs one cycle, waits the configured interval and starts
//! over, until [`Node::shutdown`] cancels the pending wake-up.

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

pub mod config;
pub mod node;
pub mod sync;

pub use config::{AppConfig, StoreConfig, TraccarConfig};
pub use node::Node;
pub use sync::{CycleError, CycleReport, SyncEngine, SyncHandle, Upstream};
