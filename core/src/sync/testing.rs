use std::{
	sync::{
		atomic::{AtomicBool, Ordering},
		Mutex,
	},
	time::Duration,
};

use async_trait::async_trait;
use tm_traccar_api::{Device, Error, Geofence, Position, PositionAttributes};
use tokio::time::{sleep, Instant};

use super::{Snapshot, Upstream};

/// One device inside one geofence, with a full position.
pub fn fixture() -> Snapshot {
	Snapshot {
		devices: vec![Device {
			id: 1,
			name: "Car".to_string(),
			unique_id: "ABC".to_string(),
			status: Some("online".to_string()),
			last_update: Some("2024-05-01T10:00:00.000+00:00".to_string()),
			position_id: 10,
			geofence_ids: vec![5],
		}],
		positions: vec![Position {
			id: 10,
			device_id: 1,
			latitude: 48.1,
			longitude: 11.6,
			altitude: Some(520.0),
			speed: Some(60.0),
			course: Some(90.0),
			attributes: PositionAttributes {
				battery_level: Some(80.0),
				distance: Some(100.0),
				total_distance: Some(5000.0),
				motion: Some(true),
			},
		}],
		geofences: vec![Geofence {
			id: 5,
			name: "Home".to_string(),
		}],
	}
}

/// In-process stand-in for the Traccar server.
pub struct FakeUpstream {
	snapshot: Mutex<Snapshot>,
	failing: AtomicBool,
	latency: Duration,
	fetches: Mutex<Vec<Instant>>,
}

impl FakeUpstream {
	pub fn new(snapshot: Snapshot) -> Self {
		Self {
			snapshot: Mutex::new(snapshot),
			failing: AtomicBool::new(false),
			latency: Duration::ZERO,
			fetches: Mutex::new(Vec::new()),
		}
	}

	/// Every request takes `latency` to answer.
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;
		self
	}

	pub fn set_snapshot(&self, snapshot: Snapshot) {
		*self.snapshot.lock().unwrap() = snapshot;
	}

	/// Makes the device listing answer with garbage.
	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::Relaxed);
	}

	/// When each cycle started fetching.
	pub fn fetch_times(&self) -> Vec<Instant> {
		self.fetches.lock().unwrap().clone()
	}

	pub fn fetch_count(&self) -> usize {
		self.fetches.lock().unwrap().len()
	}

	async fn respond(&self) {
		if !self.latency.is_zero() {
			sleep(self.latency).await;
		}
	}
}

fn garbage(endpoint: &'static str) -> Error {
	Error::Decode {
		endpoint,
		source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
	}
}

#[async_trait]
impl Upstream for FakeUpstream {
	async fn devices(&self) -> Result<Vec<Device>, Error> {
		self.fetches.lock().unwrap().push(Instant::now());
		self.respond().await;

		if self.failing.load(Ordering::Relaxed) {
			return Err(garbage("devices"));
		}

		let devices = self.snapshot.lock().unwrap().devices.clone();
		Ok(devices)
	}

	async fn positions(&self) -> Result<Vec<Position>, Error> {
		self.respond().await;

		let positions = self.snapshot.lock().unwrap().positions.clone();
		Ok(positions)
	}

	async fn geofences(&self) -> Result<Vec<Geofence>, Error> {
		self.respond().await;

		let geofences = self.snapshot.lock().unwrap().geofences.clone();
		Ok(geofences)
	}
}
