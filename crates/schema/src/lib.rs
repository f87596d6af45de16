//!
//! # Object Schema
//!
//! Static description of every object the mirror creates in the state tree.
//!
//! Paths are dot-separated templates where the instance segment is spelled as its
//! placeholder (`devices.device.speed`), callers substitute the concrete id only when
//! writing (`devices.42.speed`). Concrete paths the schema doesn't know about resolve to
//! [`Definition::DefaultLeaf`], a mixed-type read/write state.
//!
//! ```
//! use tm_schema::{describe, resolve, Definition, ObjectPath, ValueType};
//!
//! let altitude = describe("devices.device.altitude").unwrap();
//! assert_eq!(altitude.unit.as_deref(), Some("m"));
//!
//! assert_eq!(
//! 	resolve("devices.42.altitude"),
//! 	Definition::Schema(ObjectPath::DeviceAltitude)
//! );
//!
//! let fallback = resolve("devices.42.odometer").spec();
//! assert_eq!(fallback.value_type, Some(ValueType::Mixed));
//! ```

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

mod path;
mod spec;

pub use path::{describe, resolve, Definition, ObjectPath, Scope};
pub use spec::{NodeKind, ObjectSpec, ValueType};
