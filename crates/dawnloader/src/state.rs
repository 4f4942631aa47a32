//! Module for State Struct for all commands

use std::sync::Arc;

use libdawnloader::{
	data::{
		mode::DownloadMode,
		save_directory::SaveDirectory,
	},
	main::{
		request::Request,
		service::YtDlp,
	},
	spawn::ytdl::{
		YTDL_BIN_NAME,
		require_ytdl_installed,
	},
};

use crate::clap_conf::SessionArgs;

/// Struct to keep the data that does not change between requests of one session
#[derive(Debug, PartialEq, Clone)]
pub struct SessionState {
	/// The service every request is run with
	service:         Arc<YtDlp>,
	/// The directory every request is downloaded into
	save_dir:        SaveDirectory,
	/// Also save the thumbnail next to the media
	write_thumbnail: bool,
}

impl SessionState {
	/// Create a new instance of [`SessionState`], checks that youtube-dl and ffmpeg are usable and resolves the [`SaveDirectory`]
	pub fn new(args: &SessionArgs) -> Result<Self, crate::Error> {
		let ytdl_version = require_ytdl_installed()?;
		info!("Using {} version {}", YTDL_BIN_NAME, ytdl_version);

		return Self::from_args(args);
	}

	/// Create a new instance of [`SessionState`] without checking the environment
	fn from_args(args: &SessionArgs) -> Result<Self, crate::Error> {
		let save_dir = SaveDirectory::resolve(args.output_path.as_deref())?;

		let service = YtDlp::new()
			.with_extra_args(args.extra_ytdl_args_split())
			.with_print_command_log(args.print_youtubedl_stdout);

		return Ok(Self {
			service: Arc::new(service),
			save_dir,
			write_thumbnail: args.write_thumbnail,
		});
	}

	/// Get a new reference to the service
	pub fn service(&self) -> Arc<YtDlp> {
		return Arc::clone(&self.service);
	}

	/// Get the directory every request is downloaded into
	pub fn save_dir(&self) -> &SaveDirectory {
		return &self.save_dir;
	}

	/// Create a [`Request`] with the options of this session
	pub fn request<Q: Into<String>>(&self, query: Q, mode: DownloadMode) -> Request {
		return Request::new(query, mode).with_write_thumbnail(self.write_thumbnail);
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn create_dir() -> tempfile::TempDir {
		return tempfile::Builder::new()
			.prefix("dawn-bin-test-state-")
			.tempdir()
			.expect("Expected a temp dir to be created");
	}

	#[test]
	fn test_from_args() {
		let tempdir = create_dir();
		let out = tempdir.path().join("out");
		let args = SessionArgs {
			output_path: Some(out.clone()),
			write_thumbnail: true,
			..Default::default()
		};

		let state = SessionState::from_args(&args).expect("Expected the state to be created");

		assert_eq!(out, state.save_dir().path());
		assert!(out.is_dir());

		let request = state.request("lofi beats", DownloadMode::Audio);
		assert_eq!("lofi beats", request.query);
		assert_eq!(DownloadMode::Audio, request.mode);
		assert!(request.write_thumbnail);
	}

	#[test]
	fn test_service_is_shared() {
		let tempdir = create_dir();
		let args = SessionArgs {
			output_path: Some(tempdir.path().to_owned()),
			extra_ytdl_args: vec!["--limit-rate 1M".to_owned()],
			print_youtubedl_stdout: true,
			..Default::default()
		};

		let state = SessionState::from_args(&args).expect("Expected the state to be created");

		assert!(Arc::ptr_eq(&state.service(), &state.service()));
		assert_eq!(
			&YtDlp::new()
				.with_extra_args(["--limit-rate", "1M"])
				.with_print_command_log(true),
			state.service().as_ref()
		);
	}
}
