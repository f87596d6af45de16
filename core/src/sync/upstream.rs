use async_trait::async_trait;
use tm_traccar_api::{devices, geofences, positions, Device, Error, Geofence, Position, RequestConfig};

/// Read-only source of the three collections a cycle joins.
#[async_trait]
pub trait Upstream: Send + Sync + 'static {
	async fn devices(&self) -> Result<Vec<Device>, Error>;

	async fn positions(&self) -> Result<Vec<Position>, Error>;

	async fn geofences(&self) -> Result<Vec<Geofence>, Error>;
}

#[async_trait]
impl Upstream for RequestConfig {
	async fn devices(&self) -> Result<Vec<Device>, Error> {
		devices::list(self).await
	}

	async fn positions(&self) -> Result<Vec<Position>, Error> {
		positions::list(self).await
	}

	async fn geofences(&self) -> Result<Vec<Geofence>, Error> {
		geofences::list(self).await
	}
}
