//! Module for [`RequestWorker`], running requests off the thread that serves user input

use std::{
	sync::{
		Arc,
		atomic::{
			AtomicBool,
			Ordering,
		},
	},
	thread::JoinHandle,
};

use crate::{
	data::save_directory::SaveDirectory,
	error::{
		CustomThreadJoin,
		IOErrorToError,
	},
	main::{
		download::Completion,
		request::{
			Request,
			process_request,
		},
	},
	traits::{
		media_service::MediaService,
		output_sink::OutputSink,
	},
};

/// Name of the thread a request is run on
pub const WORKER_THREAD_NAME: &str = "dawnloader request";

/// Resets the busy flag once dropped, even when the request panicked
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

/// Runs one [`Request`] at a time on a background thread
///
/// A submission while another request is still in flight is rejected, there is no queue and no cancellation.
#[derive(Debug)]
pub struct RequestWorker<S, K> {
	service:  Arc<S>,
	sink:     Arc<K>,
	save_dir: SaveDirectory,
	busy:     Arc<AtomicBool>,
	handle:   Option<JoinHandle<Result<Completion, crate::Error>>>,
}

impl<S, K> RequestWorker<S, K>
where
	S: MediaService + Send + Sync + 'static,
	K: OutputSink + 'static,
{
	/// Crate a new instance of [`RequestWorker`], all requests will be downloaded into `save_dir`
	pub fn new(service: Arc<S>, sink: Arc<K>, save_dir: SaveDirectory) -> Self {
		return Self {
			service,
			sink,
			save_dir,
			busy: Arc::new(AtomicBool::new(false)),
			handle: None,
		};
	}

	/// Get the directory all requests are downloaded into
	pub fn save_dir(&self) -> &SaveDirectory {
		return &self.save_dir;
	}

	/// Get whether a request is currently in flight
	pub fn is_busy(&self) -> bool {
		return self.busy.load(Ordering::Acquire);
	}

	/// Start processing `request` on a new thread
	/// Returns a [`crate::error::ErrorInner::Busy`] if another request is still in flight
	pub fn submit(&mut self, request: Request) -> Result<(), crate::Error> {
		if self
			.busy
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_err()
		{
			info!("Rejecting request \"{}\", another request is in flight", request.query);
			return Err(crate::Error::busy("A request is already in flight"));
		}

		// the flag is reset from here on, even if something below fails
		let guard = BusyGuard(Arc::clone(&self.busy));

		// a previous request that finished but was never waited for
		if let Some(old_handle) = self.handle.take() {
			if let Err(err) = old_handle.join_err() {
				warn!("Previous request thread did not exit cleanly: {}", err);
			}
		}

		let service = Arc::clone(&self.service);
		let sink = Arc::clone(&self.sink);
		let save_dir = self.save_dir.clone();

		let handle = std::thread::Builder::new()
			.name(WORKER_THREAD_NAME.to_owned())
			.spawn(move || {
				let _guard = guard;

				return process_request(service.as_ref(), &request, &save_dir, sink.as_ref());
			})
			.attach_location_err("spawn request thread")?;

		self.handle = Some(handle);

		return Ok(());
	}

	/// Wait for the last submitted request to finish and return its result
	/// Returns [`None`] if there is no request to wait for
	pub fn wait(&mut self) -> Option<Result<Completion, crate::Error>> {
		let handle = self.handle.take()?;

		return Some(handle.join_err().and_then(|v| return v));
	}
}
