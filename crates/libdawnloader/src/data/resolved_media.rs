//! Module containing [`ResolvedMedia`]

use super::metadata::MetadataRecord;

/// Title used when youtube-dl did not provide one
pub const DEFAULT_TITLE: &str = "Video";
/// Uploader used when youtube-dl did not provide one
pub const DEFAULT_UPLOADER: &str = "Unknown";

/// The single media a query resolved to, only lives for the duration of one request
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMedia {
	/// The title of the media
	pub title:             String,
	/// The uploader (or channel) of the media
	pub uploader:          String,
	/// The duration of the media in whole seconds, if known
	pub duration:          Option<u64>,
	/// The unambiguous locator to use for downloading
	pub canonical_locator: String,
}

impl ResolvedMedia {
	/// Crate a new instance of [`ResolvedMedia`]
	pub fn new<T: AsRef<str>, U: AsRef<str>, L: AsRef<str>>(title: T, uploader: U, canonical_locator: L) -> Self {
		return Self {
			title:             title.as_ref().into(),
			uploader:          uploader.as_ref().into(),
			duration:          None,
			canonical_locator: canonical_locator.as_ref().into(),
		};
	}

	/// Builder function to add a duration
	#[must_use]
	pub fn with_duration(mut self, duration: u64) -> Self {
		self.duration = Some(duration);

		return self;
	}

	/// Convert a single (non-search) [`MetadataRecord`] into a [`ResolvedMedia`]
	/// `fallback_locator` is used when the record does not contain any URL
	pub fn from_record(record: MetadataRecord, fallback_locator: &str) -> Self {
		let canonical_locator = record
			.webpage_url
			.or(record.original_url)
			.or(record.url)
			.unwrap_or_else(|| return fallback_locator.to_owned());

		return Self {
			title: record.title.unwrap_or_else(|| return DEFAULT_TITLE.to_owned()),
			uploader: record
				.uploader
				.or(record.channel)
				.unwrap_or_else(|| return DEFAULT_UPLOADER.to_owned()),
			// negative or non-finite durations are not meaningful
			duration: record
				.duration
				.filter(|v| return v.is_finite() && *v >= 0.0)
				.map(|v| return v.round() as u64),
			canonical_locator,
		};
	}

	/// Format the duration as "H:MM:SS" or "M:SS", if known
	pub fn duration_display(&self) -> Option<String> {
		let duration = self.duration?;
		let hours = duration / 3600;
		let minutes = (duration % 3600) / 60;
		let seconds = duration % 60;

		if hours > 0 {
			return Some(format!("{hours}:{minutes:02}:{seconds:02}"));
		}

		return Some(format!("{minutes}:{seconds:02}"));
	}
}
