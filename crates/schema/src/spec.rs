use std::borrow::Cow;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
	/// Structural container, never holds a value
	Group,
	Leaf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Number,
	String,
	Boolean,
	Mixed,
}

/// Metadata attached to an object in the state tree.
///
/// `role` is an opaque tag for downstream consumers (`value.gps.latitude`, `json`, ...),
/// the mirror never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpec {
	pub kind: NodeKind,
	pub name: Cow<'static, str>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<Cow<'static, str>>,
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub value_type: Option<ValueType>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub unit: Option<Cow<'static, str>>,
	#[serde(default)]
	pub read: bool,
	#[serde(default)]
	pub write: bool,
}

impl ObjectSpec {
	pub(crate) const fn group(name: &'static str) -> Self {
		Self {
			kind: NodeKind::Group,
			name: Cow::Borrowed(name),
			role: None,
			value_type: None,
			unit: None,
			read: false,
			write: false,
		}
	}

	/// Mirrored data is always read-only.
	pub(crate) const fn leaf(
		name: &'static str,
		role: &'static str,
		value_type: ValueType,
		unit: Option<&'static str>,
	) -> Self {
		Self {
			kind: NodeKind::Leaf,
			name: Cow::Borrowed(name),
			role: Some(Cow::Borrowed(role)),
			value_type: Some(value_type),
			unit: match unit {
				Some(unit) => Some(Cow::Borrowed(unit)),
				None => None,
			},
			read: true,
			write: false,
		}
	}

	/// Fallback for values the schema didn't anticipate: anything goes, readable and
	/// writable.
	#[must_use]
	pub fn default_leaf(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			kind: NodeKind::Leaf,
			name: name.into(),
			role: Some(Cow::Borrowed("state")),
			value_type: Some(ValueType::Mixed),
			unit: None,
			read: true,
			write: true,
		}
	}

	/// Same metadata under a different display name, used for per-instance groups named
	/// after the upstream entity.
	#[must_use]
	pub fn named(&self, name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			name: name.into(),
			..self.clone()
		}
	}

	#[must_use]
	pub const fn is_group(&self) -> bool {
		matches!(self.kind, NodeKind::Group)
	}
}
