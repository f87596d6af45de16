use tm_core::{CycleError, SyncEngine, TraccarConfig, Upstream};
use tm_state_store::{MemoryStore, StateStore, StateValue, StoreStats};

use std::{net::SocketAddr, sync::Arc};

use axum::{http::StatusCode, routing::get, Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing_test::traced_test;

fn traccar(geofences_status: StatusCode) -> Router {
	Router::new()
		.route(
			"/api/devices",
			get(|| async {
				Json(json!([{
					"id": 1,
					"name": "Car",
					"uniqueId": "ABC",
					"status": "online",
					"positionId": 10,
					"geofenceIds": [5]
				}]))
			}),
		)
		.route(
			"/api/positions",
			get(|| async {
				Json(json!([{
					"id": 10,
					"deviceId": 1,
					"latitude": 48.1,
					"longitude": 11.6,
					"altitude": 123.456,
					"speed": 0.0,
					"attributes": { "motion": false }
				}]))
			}),
		)
		.route(
			"/api/geofences",
			get(move || async move {
				(geofences_status, Json(json!([{ "id": 5, "name": "Home" }])))
			}),
		)
}

async fn serve(router: Router) -> SocketAddr {
	let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();

	tokio::spawn(async move {
		axum::serve(listener, router).await.unwrap();
	});

	addr
}

fn engine(addr: SocketAddr, store: &Arc<MemoryStore>) -> SyncEngine {
	let mut config = TraccarConfig::new(addr.ip().to_string());
	config.port = addr.port();

	SyncEngine::new(
		Arc::new(config.request_config().unwrap()) as Arc<dyn Upstream>,
		Arc::clone(store) as Arc<dyn StateStore>,
	)
}

async fn value(store: &MemoryStore, path: &str) -> Option<StateValue> {
	store
		.get_state(path)
		.await
		.unwrap()
		.map(|state| state.value)
}

#[tokio::test]
#[traced_test]
async fn cycle_over_http_mirrors_the_server() {
	let addr = serve(traccar(StatusCode::OK)).await;
	let store = Arc::new(MemoryStore::new());

	let report = engine(addr, &store).run_cycle().await.unwrap();

	assert_eq!(report.devices, 1);
	assert_eq!(report.geofences, 1);
	assert_eq!(
		value(&store, "devices.1.altitude").await,
		Some(StateValue::String("123.5".to_string()))
	);
	assert_eq!(
		value(&store, "devices.1.speed").await,
		Some(StateValue::Number(0.0))
	);
	assert_eq!(
		value(&store, "devices.1.motion").await,
		Some(StateValue::Bool(false))
	);
	assert_eq!(
		value(&store, "devices.1.geofences").await,
		Some(StateValue::String("[\"Home\"]".to_string()))
	);
	assert_eq!(
		value(&store, "geofences.5.devices").await,
		Some(StateValue::String("[\"Car\"]".to_string()))
	);
	assert!(value(&store, "devices.1.battery_level").await.is_none());
}

#[tokio::test]
#[traced_test]
async fn server_error_fails_the_cycle_without_writes() {
	let addr = serve(traccar(StatusCode::INTERNAL_SERVER_ERROR)).await;
	let store = Arc::new(MemoryStore::new());

	assert!(matches!(
		engine(addr, &store).run_cycle().await,
		Err(CycleError::Fetch(tm_traccar_api::Error::Request {
			endpoint: "geofences",
			..
		}))
	));

	assert_eq!(store.stats().await, StoreStats::default());
}
