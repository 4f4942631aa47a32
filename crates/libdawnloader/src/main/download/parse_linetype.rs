use std::{
	path::PathBuf,
	sync::LazyLock,
};

use regex::Regex;

use super::{
	assemble_cmd::{
		MOVE_PREFIX,
		PROGRESS_PREFIX,
	},
	progress::RawProgress,
};

/// Line type for a ytdl output line
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LineType {
	/// Variant for lines from the custom "--progress-template"
	Progress,
	/// Variant for the custom "--print after_move:" lines
	Move,
	/// Variant for ytdl download lines (like "[download] Destination: ...")
	Download,
	/// Variant for post-processing lines (like "[ExtractAudio] Destination: ...")
	PostProcess,
	/// Variant for provider specific lines (like youtube counting website)
	ProviderSpecific,
	/// Variant for lines that start with "ERROR:"
	Error,
	/// Variant for lines that start with "WARNING:"
	Warning,
}

/// Names inside "[]" that are from post-processors
const POST_PROCESSOR_NAMES: &[&str] = &[
	"ffmpeg",
	"extractaudio",
	"merger",
	"metadata",
	"videoconvertor",
	"videoremuxer",
	"fixupm4a",
	"fixupm3u8",
];

impl LineType {
	/// Try to get the correct Variant for a input line
	/// Will return [`None`] if no type has been found
	pub fn try_from_line(input: &str) -> Option<Self> {
		/// basic regex to test if the line is "[something] something", and if it is, return what is inside "[]"
		static BASIC_TYPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?mi)^\[([\da-z:_]*)\]").unwrap();
		});

		// custom lines first, because they are the most common with "--quiet"
		if input.starts_with(PROGRESS_PREFIX) {
			return Some(Self::Progress);
		}

		if input.starts_with(MOVE_PREFIX) {
			return Some(Self::Move);
		}

		// check if the line is from a provider-like output
		if let Some(cap) = BASIC_TYPE_REGEX.captures(input) {
			let name = cap[1].to_lowercase();

			if name == "download" {
				return Some(Self::Download);
			}

			if POST_PROCESSOR_NAMES.contains(&name.as_str()) {
				return Some(Self::PostProcess);
			}

			// everything that is not specially handled before, will get treated as being a provider
			return Some(Self::ProviderSpecific);
		}

		if input.starts_with("ERROR:") {
			return Some(Self::Error);
		}

		if input.starts_with("yt-dlp: error:") || input.starts_with("youtube-dl: error:") {
			return Some(Self::Error);
		}

		if input.starts_with("WARNING:") {
			return Some(Self::Warning);
		}

		// if nothing above matches, return None, because no type has been found
		return None;
	}

	/// Try to get a [`RawProgress`] from input
	/// Works on [`LineType::Progress`] lines and as a fallback on default [`LineType::Download`] progress lines
	/// Returns [`None`] if not being of one of those variants or if no progress can be found
	pub fn try_get_progress<I: AsRef<str>>(&self, input: I) -> Option<RawProgress> {
		/// Regex to parse the custom progress line
		/// cap1: status, cap2: percent string
		static PROGRESS_TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?m)^DL_PROGRESS '([^']*)' '([^']*)'$").unwrap();
		});
		/// Regex to parse the download percentage from a default progress line
		/// cap1: percent string
		static DOWNLOAD_PERCENTAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
			return Regex::new(r"(?mi)^\[download\]\s+(\d{1,3}(?:\.\d+)?%)").unwrap();
		});

		let input = input.as_ref();

		return match self {
			Self::Progress => {
				let cap = PROGRESS_TEMPLATE_REGEX.captures(input)?;

				Some(RawProgress::new(&cap[1], Some(cap[2].to_owned())))
			},
			Self::Download => {
				let cap = DOWNLOAD_PERCENTAGE_REGEX.captures(input)?;

				Some(RawProgress::new("downloading", Some(cap[1].to_owned())))
			},
			_ => None,
		};
	}

	/// Try to get the final file path from a [`LineType::Move`] line
	/// Returns [`None`] if not being of variant [`LineType::Move`] or if the line has no path
	pub fn try_get_move_path<I: AsRef<str>>(&self, input: I) -> Option<PathBuf> {
		// this function only works with Move lines
		if self != &Self::Move {
			return None;
		}

		let path = input.as_ref().strip_prefix(MOVE_PREFIX)?.trim();

		// youtube-dl prints "NA" for fields that are not available
		if path.is_empty() || path == "NA" {
			return None;
		}

		return Some(PathBuf::from(path));
	}
}
