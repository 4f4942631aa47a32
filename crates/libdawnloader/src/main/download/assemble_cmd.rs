use std::ffi::OsString;

use super::download_options::{
	DownloadOptions,
	PostProcessor,
};

/// Prefix of the custom progress lines, see [`PROGRESS_TEMPLATE`]
pub const PROGRESS_PREFIX: &str = "DL_PROGRESS";
/// Progress template so that progress lines have a consistent format, regardless of the youtube-dl version's default
pub const PROGRESS_TEMPLATE: &str = "download:DL_PROGRESS '%(progress.status)s' '%(progress._percent_str)s'";
/// Prefix of the custom print lines for the final file path
pub const MOVE_PREFIX: &str = "MOVE";
/// Print template to get the final file path after all post-processing
pub const MOVE_PRINT_TEMPLATE: &str = "after_move:MOVE %(filepath)s";

/// Internal Struct for easily adding various types that resolve to [`OsString`] and output a [`Vec<OsString>`]
/// exists because [std::process::Command] is too overkill to use for a argument collection for having to use [duct] later
#[derive(Debug)]
pub(crate) struct ArgsHelper(Vec<OsString>);
impl ArgsHelper {
	/// Create a new instance of ArgsHelper
	pub fn new() -> Self {
		return Self(Vec::default());
	}

	/// Add a new Argument to the list, added at the end and converted to a [`OsString`]
	/// Returns the input reference to "self" for chaining
	pub fn arg<U>(&mut self, arg: U) -> &mut Self
	where
		U: Into<OsString>,
	{
		self.0.push(arg.into());

		return self;
	}

	/// Convert Self to the inner value
	/// Consumes self
	pub fn into_inner(self) -> Vec<OsString> {
		return self.0;
	}
}

impl From<ArgsHelper> for Vec<OsString> {
	fn from(v: ArgsHelper) -> Self {
		return v.into_inner();
	}
}

/// Helper Function to assemble all ytdl command arguments for a download
/// Returns a list of arguments for youtube-dl in order
///
/// Expects `options` to already be validated
#[inline]
pub fn assemble_ytdl_command(options: &DownloadOptions, extra_args: &[OsString], locator: &str) -> Vec<OsString> {
	let mut ytdl_args = ArgsHelper::new();

	// set the format that should be downloaded
	ytdl_args.arg("-f").arg(&options.format_selector);

	if let Some(container) = options.merge_output_format {
		// set final consistent output container if streams need to be merged
		ytdl_args.arg("--merge-output-format").arg(container.to_str());
	}

	for post_processor in &options.post_processors {
		match post_processor {
			PostProcessor::ExtractAudio { codec, quality_kbps } => {
				// set ytdl to always extract the audio, if it is not already audio-only
				ytdl_args.arg("-x");
				ytdl_args.arg("--audio-format").arg(codec.to_str());
				ytdl_args.arg("--audio-quality").arg(format!("{quality_kbps}K"));
			},
		}
	}

	if options.add_metadata {
		// add metadata to the container if the container supports it
		ytdl_args.arg("--embed-metadata");
	}

	if options.write_thumbnail {
		// write the media's thumbnail as a seperate file
		ytdl_args.arg("--write-thumbnail");
	}

	if options.quiet {
		ytdl_args.arg("--quiet").arg("--no-warnings");
	}

	// only download the given media, even if the locator is part of a playlist
	ytdl_args.arg("--no-playlist");

	// ensure ytdl is printing progress reports, even with "--quiet"
	ytdl_args.arg("--progress");
	// ensure ytdl prints the progress reports on a new line
	ytdl_args.arg("--newline");
	ytdl_args.arg("--progress-template").arg(PROGRESS_TEMPLATE);

	// print after move to get the filepath of the final output file
	ytdl_args.arg("--print").arg(MOVE_PRINT_TEMPLATE);

	// ensure it is not in simulate mode ("--print" implies simulate)
	ytdl_args.arg("--no-simulate");

	// set the output template for ytdl
	ytdl_args.arg("-o").arg(&options.output_template);

	// apply all extra arguments
	for extra_arg in extra_args {
		ytdl_args.arg(extra_arg);
	}

	// apply the locator to download as the last argument
	ytdl_args.arg(locator);

	return ytdl_args.into();
}

/// Helper Function to assemble all ytdl command arguments for resolving metadata only
#[inline]
pub fn assemble_ytdl_resolve_command(extra_args: &[OsString], query: &str) -> Vec<OsString> {
	let mut ytdl_args = ArgsHelper::new();

	// output one json object for the whole query, with "entries" for searches
	ytdl_args.arg("--dump-single-json");
	// dont download any media
	ytdl_args.arg("--skip-download");
	ytdl_args.arg("--no-playlist");
	ytdl_args.arg("--no-warnings");

	for extra_arg in extra_args {
		ytdl_args.arg(extra_arg);
	}

	ytdl_args.arg(query);

	return ytdl_args.into();
}
