use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
	pub id: i64,
	pub name: String,
	pub unique_id: String,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub last_update: Option<String>,
	/// Latest position of the device, `0` when the server never received one
	#[serde(default)]
	pub position_id: i64,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub geofence_ids: Vec<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
	pub id: i64,
	pub device_id: i64,
	pub latitude: f64,
	pub longitude: f64,
	#[serde(default)]
	pub altitude: Option<f64>,
	/// Knots as reported by the device
	#[serde(default)]
	pub speed: Option<f64>,
	#[serde(default)]
	pub course: Option<f64>,
	#[serde(default)]
	pub attributes: PositionAttributes,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionAttributes {
	#[serde(default)]
	pub battery_level: Option<f64>,
	#[serde(default)]
	pub distance: Option<f64>,
	#[serde(default)]
	pub total_distance: Option<f64>,
	#[serde(default)]
	pub motion: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Geofence {
	pub id: i64,
	pub name: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
