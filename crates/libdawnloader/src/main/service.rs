//! Module for [`YtDlp`], the [`MediaService`] backed by the youtube-dl(p) executable

use std::ffi::OsString;

use crate::{
	data::metadata::MetadataRecord,
	error::IOErrorToError,
	main::download::{
		DownloadOptions,
		assemble_ytdl_resolve_command,
		progress::RawProgress,
		strip_error_prefix,
		ytdl_fetch,
	},
	spawn::{
		group::{
			GroupGuard,
			own_process_group,
		},
		ytdl::YTDL_BIN_NAME,
	},
	traits::media_service::{
		FetchOutcome,
		MediaService,
	},
};

/// [`MediaService`] that spawns the youtube-dl(p) executable for every call
/// Assumes ytdl and ffmpeg have already been checked to exist and work (like using [`crate::spawn::ytdl::require_ytdl_installed`])
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YtDlp {
	/// Extra arguments added to every youtube-dl invocation, before the query / locator
	extra_args:        Vec<OsString>,
	/// Trace all youtube-dl output lines
	print_command_log: bool,
}

impl YtDlp {
	/// Crate a new instance of [`YtDlp`]
	pub fn new() -> Self {
		return Self::default();
	}

	/// Builder function to set extra arguments for every youtube-dl invocation
	#[must_use]
	pub fn with_extra_args<I, A>(mut self, extra_args: I) -> Self
	where
		I: IntoIterator<Item = A>,
		A: Into<OsString>,
	{
		self.extra_args = extra_args.into_iter().map(|v| return v.into()).collect();

		return self;
	}

	/// Builder function to trace all youtube-dl output lines
	#[must_use]
	pub fn with_print_command_log(mut self, print_command_log: bool) -> Self {
		self.print_command_log = print_command_log;

		return self;
	}
}

impl MediaService for YtDlp {
	fn resolve_metadata(&self, query: &str) -> Result<MetadataRecord, crate::Error> {
		let args = assemble_ytdl_resolve_command(&self.extra_args, query);

		let handle = own_process_group(duct::cmd(YTDL_BIN_NAME, args))
			.stdout_capture()
			.stderr_capture()
			.stdin_null()
			.unchecked()
			.start()
			.attach_location_err("duct ytdl resolve")?;
		let _group_guard = GroupGuard::register(handle.pids());
		let output = handle.wait().attach_location_err("duct ytdl resolve wait")?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);

			if self.print_command_log {
				trace!("ytdl [STDERR]: \"{}\"", stderr);
			}

			// use the last error line, because it is the most specific one
			let last_error = stderr
				.lines()
				.rev()
				.find(|line| return line.starts_with("ERROR:") || line.contains(": error:"))
				.map(|line| return strip_error_prefix(line).to_owned());

			return Err(crate::Error::command_unsuccessful(last_error.unwrap_or_else(|| {
				return format!("{} exited with {}", YTDL_BIN_NAME, output.status);
			})));
		}

		return MetadataRecord::from_json_slice(&output.stdout);
	}

	fn fetch_and_process(
		&self,
		options: &DownloadOptions,
		locator: &str,
		on_progress: &mut dyn FnMut(RawProgress),
	) -> Result<FetchOutcome, crate::Error> {
		return ytdl_fetch(options, &self.extra_args, locator, self.print_command_log, on_progress);
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		data::mode::DownloadMode,
		testing::create_save_dir,
	};

	#[test]
	fn test_builder() {
		let service = YtDlp::new()
			.with_extra_args(["--no-mtime", "--limit-rate=1M"])
			.with_print_command_log(true);

		assert_eq!(
			YtDlp {
				extra_args:        vec![OsString::from("--no-mtime"), OsString::from("--limit-rate=1M")],
				print_command_log: true,
			},
			service
		);
	}

	#[test]
	#[ignore = "CI Install not present currently"]
	fn test_resolve_unsupported() {
		let res = YtDlp::new().resolve_metadata("http://localhost:1/none");

		assert!(res.is_err());
	}

	#[test]
	#[ignore = "CI Install not present currently"]
	fn test_fetch_unsupported() {
		let (save_dir, _tempdir) = create_save_dir();
		let options = DownloadOptions::new(DownloadMode::Audio, &save_dir);

		let res = YtDlp::new().fetch_and_process(&options, "http://localhost:1/none", &mut |_| {});

		assert!(res.is_err());
	}
}
