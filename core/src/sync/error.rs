use thiserror::Error;

/// Reasons a sync cycle is abandoned. None of them is fatal to the process, the next
/// cycle runs on schedule regardless.
#[derive(Debug, Error)]
pub enum CycleError {
	#[error(transparent)]
	Fetch(#[from] tm_traccar_api::Error),
	#[error("device <id='{device_id}'> references unknown position <id='{position_id}'>")]
	MissingPosition { device_id: i64, position_id: i64 },
	#[error("device <id='{device_id}'> references unknown geofence <id='{geofence_id}'>")]
	MissingGeofence { device_id: i64, geofence_id: i64 },
	#[error("failed to encode value for <path='{path}'>: {source}")]
	Serialize {
		path: String,
		#[source]
		source: serde_json::Error,
	},
	#[error(transparent)]
	Store(#[from] tm_state_store::Error),
}
