//! Module containing [`DownloadMode`]

use std::str::FromStr;

/// What kind of output a request should produce, selected once per request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadMode {
	/// Best available video, merged with the best audio into a single container
	#[default]
	Video,
	/// Best available audio, transcoded to a fixed lossy codec
	Audio,
}

impl DownloadMode {
	/// Get current [`DownloadMode`] as a str
	pub fn to_str(&self) -> &'static str {
		return match self {
			DownloadMode::Video => "video",
			DownloadMode::Audio => "audio",
		};
	}

	/// Get a human readable label for prompts
	pub fn label(&self) -> &'static str {
		return match self {
			DownloadMode::Video => "Video (Best Quality)",
			DownloadMode::Audio => "Audio (MP3 320kbps)",
		};
	}
}

impl FromStr for DownloadMode {
	type Err = crate::Error;

	/// Input will be trimmed and lowercased for matching
	fn from_str(input: &str) -> Result<Self, Self::Err> {
		let lower = input.trim().to_lowercase();

		return match lower.as_str() {
			"video" | "v" | "1" => Ok(Self::Video),
			"audio" | "a" | "2" => Ok(Self::Audio),
			_ => Err(crate::Error::other(format!("Unknown download mode \"{}\"", input.trim()))),
		};
	}
}

// Implement Display for ease-of-use
impl std::fmt::Display for DownloadMode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		return f.write_str(self.to_str());
	}
}
