//! Module for the [`MediaService`] trait, the external extraction and download service

use std::path::PathBuf;

use crate::{
	data::metadata::MetadataRecord,
	main::download::{
		DownloadOptions,
		progress::RawProgress,
	},
};

/// Result of a successful [`MediaService::fetch_and_process`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchOutcome {
	/// The final path of the output file, if the service reported it
	pub output_path: Option<PathBuf>,
}

/// The external service that does the actual metadata extraction, transfer and post-processing
///
/// Both functions are blocking and should not be called from a thread that serves user input.
pub trait MediaService {
	/// Resolve the given query (a locator or a search directive) without downloading any media
	fn resolve_metadata(&self, query: &str) -> Result<MetadataRecord, crate::Error>;

	/// Download the given locator with the given options, calling `on_progress` for every raw progress report
	fn fetch_and_process(
		&self,
		options: &DownloadOptions,
		locator: &str,
		on_progress: &mut dyn FnMut(RawProgress),
	) -> Result<FetchOutcome, crate::Error>;
}
