//! Module for test helpers shared between the test modules of this crate

use std::{
	path::PathBuf,
	sync::{
		Mutex,
		mpsc::Receiver,
	},
};

use tempfile::{
	Builder as TempBuilder,
	TempDir,
};

use crate::{
	data::{
		metadata::MetadataRecord,
		save_directory::SaveDirectory,
	},
	main::download::{
		DownloadOptions,
		progress::RawProgress,
	},
	traits::media_service::{
		FetchOutcome,
		MediaService,
	},
};

/// Test helper function to create a usable [`SaveDirectory`] inside a new temporary directory
/// The [`TempDir`] needs to be kept alive for as long as the [`SaveDirectory`] is used
pub fn create_save_dir() -> (SaveDirectory, TempDir) {
	let testdir = TempBuilder::new()
		.prefix("dawn-test-savedir-")
		.tempdir()
		.expect("Expected a temp dir to be created");

	let save_dir = SaveDirectory::resolve_from([testdir.path().join("Dawnloader")])
		.expect("Expected the save directory to be usable");

	return (save_dir, testdir);
}

/// [`MediaService`] implementation for tests, which records all calls and replays configured results
#[derive(Default)]
pub struct MockService {
	/// The record to return from [`MediaService::resolve_metadata`]
	record:        MetadataRecord,
	/// The error to return from [`MediaService::resolve_metadata`], returned once
	resolve_error: Mutex<Option<crate::Error>>,
	/// Raw progress reports to send in [`MediaService::fetch_and_process`]
	progress:      Vec<RawProgress>,
	/// The output path to report in [`MediaService::fetch_and_process`]
	output_path:   Option<PathBuf>,
	/// The error to return from [`MediaService::fetch_and_process`] (after sending all progress), returned once
	fetch_error:   Mutex<Option<crate::Error>>,
	/// If set, [`MediaService::fetch_and_process`] blocks until something is received (or the sender is dropped)
	release:       Mutex<Option<Receiver<()>>>,

	/// All queries [`MediaService::resolve_metadata`] was called with
	resolve_calls: Mutex<Vec<String>>,
	/// All options and locators [`MediaService::fetch_and_process`] was called with
	fetch_calls:   Mutex<Vec<(DownloadOptions, String)>>,
}

impl MockService {
	/// Set the record to resolve to
	pub fn with_record(mut self, record: MetadataRecord) -> Self {
		self.record = record;

		return self;
	}

	/// Set the error resolving returns
	pub fn with_resolve_error(self, err: crate::Error) -> Self {
		*self.resolve_error.lock().expect("Expected lock") = Some(err);

		return self;
	}

	/// Set the progress reports to send while fetching
	pub fn with_progress(mut self, progress: Vec<RawProgress>) -> Self {
		self.progress = progress;

		return self;
	}

	/// Set the output path to report after fetching
	pub fn with_output_path(mut self, path: PathBuf) -> Self {
		self.output_path = Some(path);

		return self;
	}

	/// Set the error fetching returns
	pub fn with_fetch_error(self, err: crate::Error) -> Self {
		*self.fetch_error.lock().expect("Expected lock") = Some(err);

		return self;
	}

	/// Block fetching until `release` receives something
	pub fn with_release(self, release: Receiver<()>) -> Self {
		*self.release.lock().expect("Expected lock") = Some(release);

		return self;
	}

	/// Get all queries resolving was called with
	pub fn resolve_calls(&self) -> Vec<String> {
		return self.resolve_calls.lock().expect("Expected lock").clone();
	}

	/// Get all options and locators fetching was called with
	pub fn fetch_calls(&self) -> Vec<(DownloadOptions, String)> {
		return self.fetch_calls.lock().expect("Expected lock").clone();
	}
}

impl MediaService for MockService {
	fn resolve_metadata(&self, query: &str) -> Result<MetadataRecord, crate::Error> {
		self.resolve_calls.lock().expect("Expected lock").push(query.to_owned());

		if let Some(err) = self.resolve_error.lock().expect("Expected lock").take() {
			return Err(err);
		}

		return Ok(self.record.clone());
	}

	fn fetch_and_process(
		&self,
		options: &DownloadOptions,
		locator: &str,
		on_progress: &mut dyn FnMut(RawProgress),
	) -> Result<FetchOutcome, crate::Error> {
		self.fetch_calls
			.lock()
			.expect("Expected lock")
			.push((options.clone(), locator.to_owned()));

		if let Some(release) = self.release.lock().expect("Expected lock").take() {
			// an error only means that the sender was dropped, which also releases
			let _ = release.recv();
		}

		for raw in &self.progress {
			on_progress(raw.clone());
		}

		if let Some(err) = self.fetch_error.lock().expect("Expected lock").take() {
			return Err(err);
		}

		return Ok(FetchOutcome {
			output_path: self.output_path.clone(),
		});
	}
}
