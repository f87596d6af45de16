use std::{borrow::Cow, fmt};

use strum::{EnumIter, IntoEnumIterator};

use super::spec::{ObjectSpec, ValueType};

/// Where an object lives in the tree, and therefore which segment of its template is an
/// instance placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
	Root,
	Device,
	Geofence,
}

/// Every template path known to the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ObjectPath {
	Devices,
	Device,
	DeviceAltitude,
	DeviceBatteryLevel,
	DeviceCourse,
	DeviceName,
	DeviceDistance,
	DeviceGeofenceIds,
	DeviceGeofences,
	DeviceLastUpdate,
	DeviceLatitude,
	DeviceLongitude,
	DeviceMotion,
	DevicePosition,
	DevicePositionUrl,
	DeviceSpeed,
	DeviceStatus,
	DeviceTotalDistance,
	DeviceUniqueId,
	Geofences,
	Geofence,
	GeofenceName,
	GeofenceDeviceIds,
	GeofenceDevices,
	InfoConnection,
}

static DEVICES: ObjectSpec = ObjectSpec::group("Devices");
static DEVICE: ObjectSpec = ObjectSpec::group("Device");
static DEVICE_ALTITUDE: ObjectSpec =
	ObjectSpec::leaf("Altitude", "value.distance", ValueType::Number, Some("m"));
static DEVICE_BATTERY_LEVEL: ObjectSpec =
	ObjectSpec::leaf("Battery level", "value.battery", ValueType::Number, Some("%"));
static DEVICE_COURSE: ObjectSpec =
	ObjectSpec::leaf("Course", "state", ValueType::Number, Some("°"));
static DEVICE_NAME: ObjectSpec =
	ObjectSpec::leaf("Device name", "info.name", ValueType::String, None);
static DEVICE_DISTANCE: ObjectSpec =
	ObjectSpec::leaf("Distance", "value.distance", ValueType::Number, Some("m"));
static DEVICE_GEOFENCE_IDS: ObjectSpec =
	ObjectSpec::leaf("Geofence IDs", "json", ValueType::String, None);
static DEVICE_GEOFENCES: ObjectSpec =
	ObjectSpec::leaf("Geofences", "json", ValueType::String, None);
static DEVICE_LAST_UPDATE: ObjectSpec =
	ObjectSpec::leaf("Last update", "date", ValueType::String, None);
static DEVICE_LATITUDE: ObjectSpec = ObjectSpec::leaf(
	"Latitude",
	"value.gps.latitude",
	ValueType::Number,
	Some("°"),
);
static DEVICE_LONGITUDE: ObjectSpec = ObjectSpec::leaf(
	"Longitude",
	"value.gps.longitude",
	ValueType::Number,
	Some("°"),
);
static DEVICE_MOTION: ObjectSpec =
	ObjectSpec::leaf("Motion", "sensor.motion", ValueType::Boolean, None);
static DEVICE_POSITION: ObjectSpec =
	ObjectSpec::leaf("Position", "value.gps", ValueType::String, None);
static DEVICE_POSITION_URL: ObjectSpec =
	ObjectSpec::leaf("Position URL", "text.url", ValueType::String, None);
static DEVICE_SPEED: ObjectSpec =
	ObjectSpec::leaf("Speed", "value.speed", ValueType::Number, Some("km/h"));
static DEVICE_STATUS: ObjectSpec = ObjectSpec::leaf("Status", "state", ValueType::String, None);
static DEVICE_TOTAL_DISTANCE: ObjectSpec =
	ObjectSpec::leaf("Total distance", "value.distance", ValueType::Number, Some("m"));
static DEVICE_UNIQUE_ID: ObjectSpec =
	ObjectSpec::leaf("Unique ID", "state", ValueType::String, None);
static GEOFENCES: ObjectSpec = ObjectSpec::group("Geofences");
static GEOFENCE: ObjectSpec = ObjectSpec::group("Geofence");
static GEOFENCE_NAME: ObjectSpec =
	ObjectSpec::leaf("Geofence name", "info.name", ValueType::String, None);
static GEOFENCE_DEVICE_IDS: ObjectSpec =
	ObjectSpec::leaf("Device IDs", "json", ValueType::String, None);
static GEOFENCE_DEVICES: ObjectSpec =
	ObjectSpec::leaf("Devices", "json", ValueType::String, None);
static INFO_CONNECTION: ObjectSpec = ObjectSpec::leaf(
	"Connected to server",
	"indicator.connected",
	ValueType::Boolean,
	None,
);

impl ObjectPath {
	#[must_use]
	pub const fn as_template(self) -> &'static str {
		match self {
			Self::Devices => "devices",
			Self::Device => "devices.device",
			Self::DeviceAltitude => "devices.device.altitude",
			Self::DeviceBatteryLevel => "devices.device.battery_level",
			Self::DeviceCourse => "devices.device.course",
			Self::DeviceName => "devices.device.device_name",
			Self::DeviceDistance => "devices.device.distance",
			Self::DeviceGeofenceIds => "devices.device.geofence_ids",
			Self::DeviceGeofences => "devices.device.geofences",
			Self::DeviceLastUpdate => "devices.device.last_update",
			Self::DeviceLatitude => "devices.device.latitude",
			Self::DeviceLongitude => "devices.device.longitude",
			Self::DeviceMotion => "devices.device.motion",
			Self::DevicePosition => "devices.device.position",
			Self::DevicePositionUrl => "devices.device.position-url",
			Self::DeviceSpeed => "devices.device.speed",
			Self::DeviceStatus => "devices.device.status",
			Self::DeviceTotalDistance => "devices.device.total_distance",
			Self::DeviceUniqueId => "devices.device.unique_id",
			Self::Geofences => "geofences",
			Self::Geofence => "geofences.geofence",
			Self::GeofenceName => "geofences.geofence.geofence_name",
			Self::GeofenceDeviceIds => "geofences.geofence.device_ids",
			Self::GeofenceDevices => "geofences.geofence.devices",
			Self::InfoConnection => "info.connection",
		}
	}

	#[must_use]
	pub fn spec(self) -> &'static ObjectSpec {
		match self {
			Self::Devices => &DEVICES,
			Self::Device => &DEVICE,
			Self::DeviceAltitude => &DEVICE_ALTITUDE,
			Self::DeviceBatteryLevel => &DEVICE_BATTERY_LEVEL,
			Self::DeviceCourse => &DEVICE_COURSE,
			Self::DeviceName => &DEVICE_NAME,
			Self::DeviceDistance => &DEVICE_DISTANCE,
			Self::DeviceGeofenceIds => &DEVICE_GEOFENCE_IDS,
			Self::DeviceGeofences => &DEVICE_GEOFENCES,
			Self::DeviceLastUpdate => &DEVICE_LAST_UPDATE,
			Self::DeviceLatitude => &DEVICE_LATITUDE,
			Self::DeviceLongitude => &DEVICE_LONGITUDE,
			Self::DeviceMotion => &DEVICE_MOTION,
			Self::DevicePosition => &DEVICE_POSITION,
			Self::DevicePositionUrl => &DEVICE_POSITION_URL,
			Self::DeviceSpeed => &DEVICE_SPEED,
			Self::DeviceStatus => &DEVICE_STATUS,
			Self::DeviceTotalDistance => &DEVICE_TOTAL_DISTANCE,
			Self::DeviceUniqueId => &DEVICE_UNIQUE_ID,
			Self::Geofences => &GEOFENCES,
			Self::Geofence => &GEOFENCE,
			Self::GeofenceName => &GEOFENCE_NAME,
			Self::GeofenceDeviceIds => &GEOFENCE_DEVICE_IDS,
			Self::GeofenceDevices => &GEOFENCE_DEVICES,
			Self::InfoConnection => &INFO_CONNECTION,
		}
	}

	#[must_use]
	pub const fn scope(self) -> Scope {
		match self {
			Self::Devices | Self::Geofences | Self::InfoConnection => Scope::Root,
			Self::Geofence | Self::GeofenceName | Self::GeofenceDeviceIds | Self::GeofenceDevices => {
				Scope::Geofence
			}
			_ => Scope::Device,
		}
	}

	/// Concrete path of this object for the entity `id`.
	///
	/// Root objects have no instance segment and ignore `id`.
	#[must_use]
	pub fn at(self, id: impl fmt::Display) -> String {
		let template = self.as_template();

		if matches!(self.scope(), Scope::Root) {
			return template.to_string();
		}

		let mut segments = template.split('.');
		let group = segments.next().unwrap_or_default();
		// Skip the placeholder segment
		segments.next();

		segments.fold(format!("{group}.{id}"), |mut path, segment| {
			path.push('.');
			path.push_str(segment);
			path
		})
	}

	#[must_use]
	pub fn from_template(template: &str) -> Option<Self> {
		Self::iter().find(|path| path.as_template() == template)
	}
}

impl fmt::Display for ObjectPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_template())
	}
}

/// Looks up the metadata of a template path.
#[must_use]
pub fn describe(template: &str) -> Option<&'static ObjectSpec> {
	ObjectPath::from_template(template).map(ObjectPath::spec)
}

/// Outcome of matching a concrete runtime path against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
	Schema(ObjectPath),
	/// Escape hatch for ad hoc values: a mixed-type state named after the last path
	/// segment. The sync engine never produces one, but the store write path accepts it.
	DefaultLeaf { name: String },
}

impl Definition {
	#[must_use]
	pub fn spec(&self) -> Cow<'static, ObjectSpec> {
		match self {
			Self::Schema(path) => Cow::Borrowed(path.spec()),
			Self::DefaultLeaf { name } => Cow::Owned(ObjectSpec::default_leaf(name.clone())),
		}
	}
}

/// Maps a concrete path such as `devices.42.speed` back to its template, substituting the
/// instance segment with the group's placeholder.
#[must_use]
pub fn resolve(path: &str) -> Definition {
	if let Some(known) = ObjectPath::from_template(path) {
		return Definition::Schema(known);
	}

	let mut segments = path.split('.').collect::<Vec<_>>();

	let placeholder = match segments.first() {
		Some(&"devices") => Some("device"),
		Some(&"geofences") => Some("geofence"),
		_ => None,
	};

	if let (Some(placeholder), true) = (placeholder, segments.len() > 1) {
		segments[1] = placeholder;
		if let Some(known) = ObjectPath::from_template(&segments.join(".")) {
			return Definition::Schema(known);
		}
	}

	Definition::DefaultLeaf {
		name: path.rsplit('.').next().unwrap_or(path).to_string(),
	}
}
