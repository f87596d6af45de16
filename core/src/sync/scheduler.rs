use std::{sync::Arc, time::Duration};

use async_channel as chan;
use futures_concurrency::future::Race;
use tokio::{
	spawn,
	task::JoinHandle,
	time::{sleep, timeout},
};
use tracing::{debug, error, info, warn};

use super::SyncEngine;

const ONE_MINUTE: Duration = Duration::from_secs(60);

/// Owner of the running sync loop.
///
/// Dropping it closes the stop channel, so the loop still ends after its current cycle,
/// [`SyncHandle::shutdown`] additionally waits for that to happen.
pub struct SyncHandle {
	stop_tx: chan::Sender<()>,
	handle: JoinHandle<()>,
}

pub(super) fn spawn_loop(engine: Arc<SyncEngine>, interval: Duration) -> SyncHandle {
	let (stop_tx, stop_rx) = chan::bounded(1);

	SyncHandle {
		stop_tx,
		handle: spawn(run(engine, interval, stop_rx)),
	}
}

async fn run(engine: Arc<SyncEngine>, interval: Duration, stop_rx: chan::Receiver<()>) {
	enum RaceOutput {
		Tick,
		Stop,
	}

	info!(?interval, "Sync loop started");

	loop {
		run_once(&engine).await;

		// Waiting starts once the cycle settled, so two cycles never overlap
		match (
			async {
				sleep(interval).await;
				RaceOutput::Tick
			},
			async {
				if stop_rx.recv().await.is_err() {
					warn!("Sync stop channel closed, will stop the loop");
				}
				RaceOutput::Stop
			},
		)
			.race()
			.await
		{
			RaceOutput::Tick => {}
			RaceOutput::Stop => break,
		}
	}

	info!("Sync loop stopped");
}

/// Runs a single cycle, failures are reported and swallowed.
async fn run_once(engine: &SyncEngine) {
	match engine.run_cycle().await {
		Ok(report) => debug!(?report, "Sync cycle finished"),
		Err(e) => error!(?e, "Sync cycle failed: {e:#}"),
	}
}

impl SyncHandle {
	/// Cancels the pending cycle and waits for a running one to settle.
	pub async fn shutdown(self) {
		let Self { stop_tx, handle } = self;

		if stop_tx.send(()).await.is_err() {
			warn!("Sync loop already stopped");
		}

		let abort_handle = handle.abort_handle();

		match timeout(ONE_MINUTE, handle).await {
			Ok(Ok(())) => { /* Everything is Awesome! */ }
			Ok(Err(e)) => error!(?e, "Sync loop unexpectedly panicked"),
			Err(_) => {
				error!("Sync cycle failed to settle in the allotted time, will force abortion");
				abort_handle.abort();
			}
		}
	}

	#[must_use]
	pub fn is_finished(&self) -> bool {
		self.handle.is_finished()
	}
}

#[cfg(test)]
mod tests {
	use tm_state_store::{MemoryStore, StateStore};
	use tokio::time::Instant;
	use tracing_test::traced_test;

	use super::{
		super::{
			testing::{fixture, FakeUpstream},
			Upstream,
		},
		*,
	};

	const INTERVAL: Duration = Duration::from_secs(10);

	fn engine(upstream: &Arc<FakeUpstream>, store: &Arc<MemoryStore>) -> Arc<SyncEngine> {
		Arc::new(SyncEngine::new(
			Arc::clone(upstream) as Arc<dyn Upstream>,
			Arc::clone(store) as Arc<dyn StateStore>,
		))
	}

	#[tokio::test(start_paused = true)]
	#[traced_test]
	async fn reschedules_after_each_cycle() {
		let upstream = Arc::new(FakeUpstream::new(fixture()));
		let store = Arc::new(MemoryStore::new());

		let handle = engine(&upstream, &store).spawn(INTERVAL);

		sleep(Duration::from_millis(1)).await;
		assert_eq!(upstream.fetch_count(), 1);

		sleep(Duration::from_secs(9)).await;
		assert_eq!(upstream.fetch_count(), 1);

		sleep(Duration::from_secs(1)).await;
		assert_eq!(upstream.fetch_count(), 2);

		handle.shutdown().await;

		sleep(Duration::from_secs(60)).await;
		assert_eq!(upstream.fetch_count(), 2);
	}

	#[tokio::test(start_paused = true)]
	#[traced_test]
	async fn interval_counts_from_the_end_of_a_cycle() {
		let latency = Duration::from_secs(3);
		let upstream = Arc::new(FakeUpstream::new(fixture()).with_latency(latency));
		let store = Arc::new(MemoryStore::new());

		let handle = engine(&upstream, &store).spawn(INTERVAL);

		sleep(Duration::from_secs(30)).await;
		handle.shutdown().await;

		let starts = upstream.fetch_times();
		assert!(starts.len() >= 2);
		for pair in starts.windows(2) {
			assert!(pair[1] - pair[0] >= INTERVAL + latency);
		}
	}

	#[tokio::test(start_paused = true)]
	#[traced_test]
	async fn failed_cycles_are_rescheduled() {
		let upstream = Arc::new(FakeUpstream::new(fixture()));
		upstream.set_failing(true);
		let store = Arc::new(MemoryStore::new());

		let handle = engine(&upstream, &store).spawn(INTERVAL);

		sleep(Duration::from_secs(25)).await;
		assert_eq!(upstream.fetch_count(), 3);
		assert!(!handle.is_finished());

		handle.shutdown().await;

		assert!(store.object_paths().await.is_empty());
	}

	#[tokio::test]
	#[traced_test]
	async fn cycle_failures_are_logged_not_raised() {
		let mut snapshot = fixture();
		snapshot.devices[0].position_id = 99;
		let upstream = Arc::new(FakeUpstream::new(snapshot));
		let store = Arc::new(MemoryStore::new());

		run_once(&engine(&upstream, &store)).await;

		assert!(logs_contain("Sync cycle failed"));
		assert!(logs_contain("unknown position <id='99'>"));
	}

	#[tokio::test(start_paused = true)]
	#[traced_test]
	async fn shutdown_lets_the_running_cycle_finish() {
		let latency = Duration::from_secs(5);
		let upstream = Arc::new(FakeUpstream::new(fixture()).with_latency(latency));
		let store = Arc::new(MemoryStore::new());

		let started = Instant::now();
		let handle = engine(&upstream, &store).spawn(INTERVAL);

		sleep(Duration::from_secs(1)).await;
		handle.shutdown().await;

		assert!(started.elapsed() >= latency);
		assert_eq!(upstream.fetch_count(), 1);
		assert!(store
			.get_state("devices.1.unique_id")
			.await
			.unwrap()
			.is_some());

		sleep(Duration::from_secs(60)).await;
		assert_eq!(upstream.fetch_count(), 1);
	}

	#[tokio::test(start_paused = true)]
	#[traced_test]
	async fn dropping_the_handle_stops_the_loop() {
		let upstream = Arc::new(FakeUpstream::new(fixture()));
		let store = Arc::new(MemoryStore::new());

		drop(engine(&upstream, &store).spawn(INTERVAL));

		sleep(Duration::from_secs(60)).await;
		assert_eq!(upstream.fetch_count(), 1);
	}
}
