//! Module for the Download Step and handling youtube-dl downloads

use parse_linetype::LineType;
use std::{
	ffi::OsString,
	io::{
		BufRead,
		BufReader,
	},
	path::PathBuf,
	time::Duration,
};

use crate::{
	data::{
		mode::DownloadMode,
		resolved_media::ResolvedMedia,
		save_directory::SaveDirectory,
	},
	error::IOErrorToError,
	spawn::{
		group::{
			GroupGuard,
			own_process_group,
		},
		ytdl::YTDL_BIN_NAME,
	},
	traits::{
		media_service::{
			FetchOutcome,
			MediaService,
		},
		progress::ProgressObserver,
	},
};

pub use assemble_cmd::{
	assemble_ytdl_command,
	assemble_ytdl_resolve_command,
};
pub use download_options::{
	AudioCodec,
	DownloadOptions,
	PostProcessor,
	VideoContainer,
};
use progress::RawProgress;

mod assemble_cmd;
mod download_options;
mod parse_linetype;
pub mod progress;

/// The result of a successful Download Step
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
	/// The media that got downloaded, as it was resolved
	pub media: ResolvedMedia,
	/// The final file path, if the service reported it
	pub path:  Option<PathBuf>,
}

/// Download the already resolved `media` in `mode` into `save_dir`
/// `observer` gets every normalized progress event, malformed progress reports are dropped
///
/// This function is blocking and should be run on a worker thread (like [`crate::main::worker::RequestWorker`])
/// Any failure is returned as a [`crate::error::ErrorInner::Download`] with a truncated message
pub fn download<S: MediaService + ?Sized, O: ProgressObserver + ?Sized>(
	service: &S,
	media: &ResolvedMedia,
	mode: DownloadMode,
	save_dir: &SaveDirectory,
	write_thumbnail: bool,
	observer: &mut O,
) -> Result<Completion, crate::Error> {
	let options = DownloadOptions::new(mode, save_dir).with_write_thumbnail(write_thumbnail);
	options
		.validate()
		.map_err(|err| return err.into_request_error(crate::Error::download))?;

	debug!(
		"Starting {} download of \"{}\" ({})",
		mode, media.title, media.canonical_locator
	);

	let mut on_progress = |raw: RawProgress| {
		if let Some(event) = progress::normalize(&raw) {
			observer.on_event(event);
		}
	};

	let outcome = service
		.fetch_and_process(&options, &media.canonical_locator, &mut on_progress)
		.map_err(|err| {
			warn!("Download of \"{}\" failed: {}", media.canonical_locator, err);
			return err.into_request_error(crate::Error::download);
		})?;

	return Ok(Completion {
		media: media.clone(),
		path:  outcome.output_path,
	});
}

/// Run youtube-dl to download `locator` with `options`
/// Assumes ytdl and ffmpeg have already been checked to exist and work (like using [`crate::spawn::ytdl::require_ytdl_installed`])
pub fn ytdl_fetch(
	options: &DownloadOptions,
	extra_args: &[OsString],
	locator: &str,
	print_stdout: bool,
	on_progress: &mut dyn FnMut(RawProgress),
) -> Result<FetchOutcome, crate::Error> {
	let ytdl_child = {
		let args = assemble_ytdl_command(options, extra_args, locator);

		// merge stderr into stdout
		own_process_group(duct::cmd(YTDL_BIN_NAME, args))
			.stderr_to_stdout()
			.stdin_null()
			.reader()
			.attach_location_err("duct ytdl reader")?
	};
	let _group_guard = GroupGuard::register(ytdl_child.pids());

	let stdout_reader = BufReader::new(&ytdl_child);

	let handled = handle_stdout(print_stdout, on_progress, stdout_reader);

	let mut exit_error = None;

	loop {
		// wait loop, because somehow a "ReaderHandle" does not implement "wait", only "try_wait", but have to wait for it to exit here
		match ytdl_child.try_wait() {
			Ok(v) => {
				// only in the "Some" case is the wait actually finished
				if v.is_some() {
					break;
				}
			},
			Err(err) => {
				warn!("youtube-dl exited with a non-0 code: {err}");
				exit_error = Some(crate::Error::command_unsuccessful(err.to_string()));
				break;
			},
		}

		std::thread::sleep(Duration::from_millis(100)); // sleep to same some time between the next wait (to not cause constant cpu spike)
	}

	// a error line from youtube-dl is more useful than the exit code
	let outcome = handled?;

	if let Some(err) = exit_error {
		return Err(err);
	}

	return Ok(outcome);
}

/// Helper function to handle the output from a spawned ytdl command
/// Calls `on_progress` for every progress line and returns the last "MOVE" path
#[inline]
fn handle_stdout<R: BufRead>(
	print_stdout: bool,
	on_progress: &mut dyn FnMut(RawProgress),
	reader: R,
) -> Result<FetchOutcome, crate::Error> {
	let mut outcome = FetchOutcome::default();
	// store the last error line encountered
	let mut last_error = None;

	// HACK: .lines() iter never exits on non-0 exit codes in duct, see https://github.com/oconnor663/duct.rs/issues/112
	for line in reader.lines() {
		let line = match line {
			Ok(v) => v,
			Err(err) => {
				debug!("duct lines reader errored: {}", err);
				break; // handle it as a non-breaking case, because in 99% of cases it is just a error of "command ... exited with code ?"
			},
		};

		// only print STDOUT to output when requested
		if print_stdout {
			trace!("ytdl [STDOUT]: \"{}\"", line);
		}

		if let Some(linetype) = LineType::try_from_line(&line) {
			match linetype {
				// currently there is nothing that needs to be done with "ProviderSpecific" Lines
				LineType::ProviderSpecific => (),
				LineType::PostProcess => {
					debug!("youtube-dl post-processing: \"{}\"", line);
				},
				LineType::Progress | LineType::Download => {
					if let Some(raw) = linetype.try_get_progress(&line) {
						on_progress(raw);
					}
				},
				LineType::Move => {
					if let Some(path) = linetype.try_get_move_path(&line) {
						debug!("Found MOVE: \"{}\"", path.display());
						outcome.output_path = Some(path);
					} else {
						warn!("Found MOVE, but could not get a path from it");
					}
				},
				LineType::Error => {
					// the following is using debug printing, because the line may include escape characters, which would mess-up the printing, but is still good to know when reading
					warn!("Encountered youtube-dl error: {:#?}", line);
					last_error = Some(line);
				},
				LineType::Warning => {
					// ytdl warnings are non-fatal, but should still be logged
					warn!("youtube-dl: {:#?}", line);
				},
			}
		} else if !line.is_empty() {
			info!("No type has been found for line \"{}\"", line);
		}
	}

	if let Some(last_error) = last_error {
		on_progress(RawProgress::new("error", None));

		return Err(crate::Error::other(strip_error_prefix(&last_error)));
	}

	return Ok(outcome);
}

/// Remove the "ERROR:" prefix youtube-dl adds to error lines
pub(crate) fn strip_error_prefix(line: &str) -> &str {
	return line
		.strip_prefix("ERROR:")
		.or_else(|| return line.strip_prefix("yt-dlp: error:"))
		.unwrap_or(line)
		.trim();
}

#[cfg(test)]
mod test {
	use std::sync::{
		Arc,
		Mutex,
	};

	use super::{
		progress::{
			ProgressEvent,
			ProgressStatus,
		},
		*,
	};
	use crate::{
		error::ErrorInner,
		testing::{
			MockService,
			create_save_dir,
		},
	};

	mod handle_stdout {
		use super::*;

		/// Run [`handle_stdout`] with `input` and collect all progress reports
		fn run(input: &str) -> (Result<FetchOutcome, crate::Error>, Vec<RawProgress>) {
			let mut collected = Vec::new();
			let res = handle_stdout(
				false,
				&mut |raw| {
					collected.push(raw);
				},
				BufReader::new(input.as_bytes()),
			);

			return (res, collected);
		}

		#[test]
		fn test_basic_video() {
			let input = r#"
DL_PROGRESS 'downloading' '  0.0%'
DL_PROGRESS 'downloading' ' 50.0%'
DL_PROGRESS 'downloading' '100.0%'
DL_PROGRESS 'finished' '100.0%'
DL_PROGRESS 'downloading' '  0.0%'
DL_PROGRESS 'downloading' ' 57.6%'
DL_PROGRESS 'finished' '100.0%'
[Merger] Merging formats into "/tmp/Dawnloader/Some Title Here.mp4"
MOVE /tmp/Dawnloader/Some Title Here.mp4
			"#;

			let (res, collected) = run(input);

			assert_eq!(
				Ok(FetchOutcome {
					output_path: Some(PathBuf::from("/tmp/Dawnloader/Some Title Here.mp4")),
				}),
				res
			);
			assert_eq!(7, collected.len());
			assert_eq!(RawProgress::new("downloading", Some(" 50.0%".to_owned())), collected[1]);
			assert_eq!(RawProgress::new("finished", Some("100.0%".to_owned())), collected[6]);
		}

		#[test]
		fn test_legacy_progress_lines() {
			let input = r#"
[youtube] -----------: Downloading webpage
[download] Destination: /tmp/Dawnloader/Some Title Here.webm
[download]   0.0% of 3.47MiB at 196.76KiB/s ETA 00:18
[download]  57.6% of 3.47MiB at  9.57MiB/s ETA 00:00
[download] 100% of 3.47MiB in 00:00
[ExtractAudio] Destination: /tmp/Dawnloader/Some Title Here.mp3
			"#;

			let (res, collected) = run(input);

			// no MOVE line, so no path
			assert_eq!(Ok(FetchOutcome::default()), res);
			assert_eq!(
				vec![
					RawProgress::new("downloading", Some("0.0%".to_owned())),
					RawProgress::new("downloading", Some("57.6%".to_owned())),
					RawProgress::new("downloading", Some("100%".to_owned())),
				],
				collected
			);
		}

		#[test]
		fn test_warning_line() {
			let input = r#"
WARNING: [youtube] Falling back to generic n function search
         player = https://youtube.com/some.js
DL_PROGRESS 'downloading' ' 12.0%'
MOVE /tmp/Dawnloader/Some Title Here.mp4
			"#;

			let (res, collected) = run(input);

			assert_eq!(
				Ok(FetchOutcome {
					output_path: Some(PathBuf::from("/tmp/Dawnloader/Some Title Here.mp4")),
				}),
				res
			);
			assert_eq!(1, collected.len());
		}

		#[test]
		fn test_error_line() {
			let input = r#"
DL_PROGRESS 'downloading' '  2.0%'
ERROR: [youtube] -----------: Unable to download webpage: The read operation timed out
			"#;

			let (res, collected) = run(input);

			assert_eq!(
				Err(crate::Error::other(
					"[youtube] -----------: Unable to download webpage: The read operation timed out"
				)),
				res
			);
			assert_eq!(
				vec![
					RawProgress::new("downloading", Some("  2.0%".to_owned())),
					RawProgress::new("error", None),
				],
				collected
			);
		}
	}

	#[test]
	fn test_strip_error_prefix() {
		assert_eq!("some error", strip_error_prefix("ERROR: some error"));
		assert_eq!("no such option: --bogus", strip_error_prefix("yt-dlp: error: no such option: --bogus"));
		assert_eq!("unprefixed", strip_error_prefix("unprefixed"));
	}

	#[test]
	fn test_download_video() {
		let (save_dir, _tempdir) = create_save_dir();
		let media = ResolvedMedia::new("Some Title", "Some Uploader", "https://example.com/watch?v=abc");
		let service = MockService::default()
			.with_progress(vec![
				RawProgress::new("downloading", Some(" 10.0%".to_owned())),
				RawProgress::new("downloading", Some("Unknown%".to_owned())),
				RawProgress::new("downloading", Some(" 99.9%".to_owned())),
				RawProgress::new("finished", Some("99.9%".to_owned())),
			])
			.with_output_path(save_dir.path().join("Some Title.mp4"));

		let mut events = Vec::new();
		let res = download(
			&service,
			&media,
			DownloadMode::Video,
			&save_dir,
			false,
			&mut |event: ProgressEvent| {
				events.push(event);
			},
		);

		assert_eq!(
			Ok(Completion {
				media,
				path: Some(save_dir.path().join("Some Title.mp4")),
			}),
			res
		);
		// the malformed percent has to be dropped without failing the download
		assert_eq!(
			vec![
				ProgressEvent::downloading(10.0),
				ProgressEvent::downloading(99.9),
				ProgressEvent::finished(),
			],
			events
		);

		let calls = service.fetch_calls();
		assert_eq!(1, calls.len());
		assert_eq!("https://example.com/watch?v=abc", calls[0].1);
		assert_eq!("bestvideo+bestaudio/best", calls[0].0.format_selector);
		assert_eq!(Some(VideoContainer::Mp4), calls[0].0.merge_output_format);
		assert!(calls[0].0.post_processors.is_empty());
	}

	#[test]
	fn test_download_audio() {
		let (save_dir, _tempdir) = create_save_dir();
		let media = ResolvedMedia::new("lofi beats to relax", "Some Channel", "https://example.com/watch?v=lofi");
		let service = MockService::default();

		let res = download(
			&service,
			&media,
			DownloadMode::Audio,
			&save_dir,
			true,
			&mut |_event: ProgressEvent| {},
		);

		assert_eq!(
			Ok(Completion {
				media,
				path: None,
			}),
			res
		);

		let calls = service.fetch_calls();
		assert_eq!(1, calls.len());
		assert_eq!("bestaudio/best", calls[0].0.format_selector);
		assert!(calls[0].0.write_thumbnail);
		assert_eq!(
			vec![PostProcessor::ExtractAudio {
				codec:        AudioCodec::Mp3,
				quality_kbps: 320,
			}],
			calls[0].0.post_processors
		);
	}

	#[test]
	fn test_download_failure_is_download_error() {
		let (save_dir, _tempdir) = create_save_dir();
		let media = ResolvedMedia::new("Some Title", "Some Uploader", "https://example.com/watch?v=abc");
		let service = MockService::default()
			.with_progress(vec![RawProgress::new("error", None)])
			.with_fetch_error(crate::Error::other(
				"Postprocessing: ffmpeg not found. Please install or provide the path using --ffmpeg-location",
			));

		// observer that is moved into another thread, to ensure it is usable from there
		let events = Arc::new(Mutex::new(Vec::new()));
		let events_clone = Arc::clone(&events);
		let mut observer = move |event: ProgressEvent| {
			events_clone.lock().expect("Expected lock").push(event);
		};

		let res = std::thread::spawn(move || {
			return download(&service, &media, DownloadMode::Audio, &save_dir, false, &mut observer);
		})
		.join()
		.expect("Expected thread to not panic");

		let err = res.expect_err("Expected download to fail");
		assert!(err.is_request_error());
		assert_eq!(
			&ErrorInner::Download("Postprocessing: ffmpeg not found. Please install o...".to_owned()),
			err.inner()
		);

		let events = events.lock().expect("Expected lock");
		assert_eq!(1, events.len());
		assert_eq!(ProgressStatus::Error, events[0].status);
	}

	#[test]
	#[ignore = "CI Install not present currently"]
	fn test_ytdl_fetch_invalid_locator() {
		let (save_dir, _tempdir) = create_save_dir();
		let options = DownloadOptions::new(DownloadMode::Video, &save_dir);

		let res = ytdl_fetch(&options, &[], "http://localhost:1/none", false, &mut |_| {});

		assert!(res.is_err());
	}
}
