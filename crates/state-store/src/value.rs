use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
	Bool(bool),
	Number(f64),
	String(String),
}

impl fmt::Display for StateValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "{value}"),
			Self::Number(value) => write!(f, "{value}"),
			Self::String(value) => f.write_str(value),
		}
	}
}

impl From<bool> for StateValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<f64> for StateValue {
	fn from(value: f64) -> Self {
		Self::Number(value)
	}
}

impl From<String> for StateValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<&str> for StateValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
	#[serde(rename = "val")]
	pub value: StateValue,
	/// Confirmed data coming from the device side rather than a command
	pub ack: bool,
	#[serde(rename = "lc")]
	pub last_change: DateTime<Utc>,
}

impl State {
	#[must_use]
	pub fn acknowledged(value: StateValue) -> Self {
		Self {
			value,
			ack: true,
			last_change: Utc::now(),
		}
	}
}
