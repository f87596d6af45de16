use std::collections::HashMap;

use serde::Serialize;
use tm_schema::{ObjectPath, ObjectSpec};
use tm_state_store::StateValue;
use tm_traccar_api::{Device, Geofence, Position};

use super::CycleError;

/// The three upstream collections fetched by one cycle.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
	pub devices: Vec<Device>,
	pub positions: Vec<Position>,
	pub geofences: Vec<Geofence>,
}

/// A single change to apply to the state tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
	Group { path: String, spec: ObjectSpec },
	Leaf {
		path: String,
		object: ObjectPath,
		value: StateValue,
	},
}

impl Intent {
	#[must_use]
	pub fn path(&self) -> &str {
		match self {
			Self::Group { path, .. } | Self::Leaf { path, .. } => path,
		}
	}
}

#[derive(Default)]
struct Plan {
	intents: Vec<Intent>,
}

impl Plan {
	fn root(&mut self, object: ObjectPath) {
		self.intents.push(Intent::Group {
			path: object.as_template().to_string(),
			spec: object.spec().clone(),
		});
	}

	fn group(&mut self, object: ObjectPath, id: i64, name: &str) {
		self.intents.push(Intent::Group {
			path: object.at(id),
			spec: object.spec().named(name.to_string()),
		});
	}

	/// `None` means there is nothing to update, the leaf keeps its previous value.
	fn leaf(&mut self, object: ObjectPath, id: i64, value: Option<impl Into<StateValue>>) {
		if let Some(value) = value {
			self.intents.push(Intent::Leaf {
				path: object.at(id),
				object,
				value: value.into(),
			});
		}
	}

	fn json_leaf(
		&mut self,
		object: ObjectPath,
		id: i64,
		value: &impl Serialize,
	) -> Result<(), CycleError> {
		let path = object.at(id);
		let json = serde_json::to_string(value).map_err(|source| CycleError::Serialize {
			path: path.clone(),
			source,
		})?;

		self.intents.push(Intent::Leaf {
			path,
			object,
			value: json.into(),
		});

		Ok(())
	}

	fn device(
		&mut self,
		device: &Device,
		positions: &HashMap<i64, &Position>,
		geofences: &HashMap<i64, &Geofence>,
	) -> Result<(), CycleError> {
		let id = device.id;

		self.group(ObjectPath::Device, id, &device.name);

		let position = positions
			.get(&device.position_id)
			.ok_or(CycleError::MissingPosition {
				device_id: id,
				position_id: device.position_id,
			})?;

		let geofence_names = device
			.geofence_ids
			.iter()
			.map(|&geofence_id| {
				geofences
					.get(&geofence_id)
					.map(|geofence| geofence.name.as_str())
					.ok_or(CycleError::MissingGeofence {
						device_id: id,
						geofence_id,
					})
			})
			.collect::<Result<Vec<_>, _>>()?;

		self.leaf(ObjectPath::DeviceUniqueId, id, Some(device.unique_id.as_str()));
		self.leaf(ObjectPath::DeviceName, id, Some(device.name.as_str()));
		self.leaf(ObjectPath::DeviceStatus, id, device.status.as_deref());
		self.leaf(ObjectPath::DeviceLastUpdate, id, device.last_update.as_deref());
		self.json_leaf(ObjectPath::DeviceGeofenceIds, id, &device.geofence_ids)?;
		self.json_leaf(ObjectPath::DeviceGeofences, id, &geofence_names)?;

		let attributes = &position.attributes;
		self.leaf(ObjectPath::DeviceBatteryLevel, id, attributes.battery_level);
		self.leaf(ObjectPath::DeviceDistance, id, attributes.distance);
		self.leaf(ObjectPath::DeviceTotalDistance, id, attributes.total_distance);
		self.leaf(ObjectPath::DeviceMotion, id, attributes.motion);

		let (latitude, longitude) = (position.latitude, position.longitude);
		self.leaf(ObjectPath::DeviceSpeed, id, position.speed);
		self.leaf(ObjectPath::DeviceCourse, id, position.course);
		self.leaf(ObjectPath::DeviceLatitude, id, Some(latitude));
		self.leaf(ObjectPath::DeviceLongitude, id, Some(longitude));
		self.leaf(
			ObjectPath::DeviceAltitude,
			id,
			position.altitude.map(one_decimal),
		);
		self.leaf(
			ObjectPath::DevicePosition,
			id,
			Some(format!("{latitude},{longitude}")),
		);
		self.leaf(
			ObjectPath::DevicePositionUrl,
			id,
			Some(format!(
				"http://maps.google.com/maps?z=15&t=m&q=loc:{latitude}+{longitude}"
			)),
		);

		Ok(())
	}

	fn geofence(&mut self, geofence: &Geofence, devices: &[Device]) -> Result<(), CycleError> {
		let id = geofence.id;

		self.group(ObjectPath::Geofence, id, &geofence.name);
		self.leaf(ObjectPath::GeofenceName, id, Some(geofence.name.as_str()));

		// Membership lives on the devices, keep their iteration order
		let (device_ids, device_names) = devices
			.iter()
			.filter(|device| device.geofence_ids.contains(&id))
			.map(|device| (device.id, device.name.as_str()))
			.unzip::<_, _, Vec<_>, Vec<_>>();

		self.json_leaf(ObjectPath::GeofenceDeviceIds, id, &device_ids)?;
		self.json_leaf(ObjectPath::GeofenceDevices, id, &device_names)
	}
}

/// Fixed one-decimal rendering where exact ties round away from zero and negative zero
/// prints as `0.0`. `{:.1}` alone would round ties to even.
#[allow(clippy::float_cmp)]
fn one_decimal(value: f64) -> String {
	if value == 0.0 {
		return "0.0".to_string();
	}

	let twentieths = (value * 20.0).round();

	// Only an exact multiple of 0.05 with an odd count sits on a tie, the fused
	// multiply-add tells exact products apart from rounded ones
	if value.mul_add(20.0, -twentieths) == 0.0 && twentieths % 2.0 != 0.0 {
		return format!("{:.1}", (value * 10.0).round() / 10.0);
	}

	format!("{value:.1}")
}

/// Derives every object and value of the mirrored tree from a fetched snapshot.
///
/// Fails on the first device referencing a position or geofence missing from the
/// snapshot, in which case nothing of this snapshot must be written.
pub fn plan(snapshot: &Snapshot) -> Result<Vec<Intent>, CycleError> {
	let positions = snapshot
		.positions
		.iter()
		.map(|position| (position.id, position))
		.collect::<HashMap<_, _>>();

	let geofences = snapshot
		.geofences
		.iter()
		.map(|geofence| (geofence.id, geofence))
		.collect::<HashMap<_, _>>();

	let mut plan = Plan::default();

	plan.root(ObjectPath::Devices);
	for device in &snapshot.devices {
		plan.device(device, &positions, &geofences)?;
	}

	plan.root(ObjectPath::Geofences);
	for geofence in &snapshot.geofences {
		plan.geofence(geofence, &snapshot.devices)?;
	}

	Ok(plan.intents)
}
