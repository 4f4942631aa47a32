//! Module containing the typed [`DownloadOptions`]

use std::path::PathBuf;

use crate::data::{
	mode::DownloadMode,
	save_directory::SaveDirectory,
};

/// Format selector for [`DownloadMode::Video`], best video and best audio merged, or the best combined format
pub const VIDEO_FORMAT_SELECTOR: &str = "bestvideo+bestaudio/best";
/// Format selector for [`DownloadMode::Audio`], best audio-only, or the best combined format to extract from
pub const AUDIO_FORMAT_SELECTOR: &str = "bestaudio/best";
/// Bitrate (in kbps) audio gets transcoded to
pub const AUDIO_QUALITY_KBPS: u32 = 320;
/// youtube-dl output template inside the save directory, title and extension are filled in by youtube-dl
pub const OUTPUT_FILENAME_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Lossy audio codecs that audio can be extracted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
	Mp3,
}

impl AudioCodec {
	/// Get the codec name as youtube-dl expects it, which is also the file extension
	pub fn to_str(&self) -> &'static str {
		return match self {
			AudioCodec::Mp3 => "mp3",
		};
	}
}

/// Containers that separately downloaded streams can be merged into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoContainer {
	Mp4,
}

impl VideoContainer {
	/// Get the container name as youtube-dl expects it, which is also the file extension
	pub fn to_str(&self) -> &'static str {
		return match self {
			VideoContainer::Mp4 => "mp4",
		};
	}
}

/// A single post-processing step applied after the transfer finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcessor {
	/// Extract (and transcode) the audio to `codec` with `quality_kbps`
	ExtractAudio {
		codec:        AudioCodec,
		quality_kbps: u32,
	},
}

/// Declarative configuration for one [`crate::traits::media_service::MediaService::fetch_and_process`] call
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadOptions {
	/// Full output template, including the save directory
	pub output_template:     PathBuf,
	/// The youtube-dl format selector
	pub format_selector:     String,
	/// Post-processing applied after the transfer, at most one entry
	pub post_processors:     Vec<PostProcessor>,
	/// Container to merge separately downloaded streams into
	pub merge_output_format: Option<VideoContainer>,
	/// Suppress non-progress output of the service
	pub quiet:               bool,
	/// Write the thumbnail as a separate file next to the media
	pub write_thumbnail:     bool,
	/// Embed metadata (title, uploader, ...) into the output container
	pub add_metadata:        bool,
}

impl DownloadOptions {
	/// Build the options for `mode`, outputting into `save_dir`
	pub fn new(mode: DownloadMode, save_dir: &SaveDirectory) -> Self {
		let output_template = save_dir.path().join(OUTPUT_FILENAME_TEMPLATE);

		let (format_selector, post_processors, merge_output_format) = match mode {
			DownloadMode::Video => (VIDEO_FORMAT_SELECTOR, Vec::new(), Some(VideoContainer::Mp4)),
			DownloadMode::Audio => (
				AUDIO_FORMAT_SELECTOR,
				vec![PostProcessor::ExtractAudio {
					codec:        AudioCodec::Mp3,
					quality_kbps: AUDIO_QUALITY_KBPS,
				}],
				None,
			),
		};

		return Self {
			output_template,
			format_selector: format_selector.to_owned(),
			post_processors,
			merge_output_format,
			quiet: true,
			write_thumbnail: false,
			add_metadata: true,
		};
	}

	/// Builder function to set [`Self::write_thumbnail`]
	#[must_use]
	pub fn with_write_thumbnail(mut self, write_thumbnail: bool) -> Self {
		self.write_thumbnail = write_thumbnail;

		return self;
	}

	/// Check that the options can be handed to the service
	/// There has to be exactly one format selector and at most one post-processor
	pub fn validate(&self) -> Result<(), crate::Error> {
		if self.format_selector.trim().is_empty() {
			return Err(crate::Error::invalid_options("Format selector is empty"));
		}

		if self.post_processors.len() > 1 {
			return Err(crate::Error::invalid_options(format!(
				"Expected at most one post-processor, got {}",
				self.post_processors.len()
			)));
		}

		if self.output_template.as_os_str().is_empty() {
			return Err(crate::Error::invalid_options("Output template is empty"));
		}

		return Ok(());
	}
}
