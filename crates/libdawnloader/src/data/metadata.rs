//! Module containing [`MetadataRecord`], the subset of a youtube-dl info-json that is used

use serde::Deserialize;

/// A single record as output by `yt-dlp --dump-single-json`
/// A search or playlist will have `entries`, a single media will not
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct MetadataRecord {
	/// The ID of the media (or search / playlist)
	#[serde(default)]
	pub id:           Option<String>,
	/// The extractor that resolved this record, like "youtube" or "youtube:search"
	#[serde(default)]
	pub extractor:    Option<String>,
	/// The title of the media
	#[serde(default)]
	pub title:        Option<String>,
	/// The uploader of the media
	#[serde(default)]
	pub uploader:     Option<String>,
	/// The channel of the media, some providers only set this instead of "uploader"
	#[serde(default)]
	pub channel:      Option<String>,
	/// Duration in seconds, youtube-dl may output this as a float
	#[serde(default)]
	pub duration:     Option<f64>,
	/// The page URL of the media
	#[serde(default)]
	pub webpage_url:  Option<String>,
	/// The URL as originally given to youtube-dl
	#[serde(default)]
	pub original_url: Option<String>,
	/// The URL of the media, for flat entries this is the page URL
	#[serde(default)]
	pub url:          Option<String>,
	/// The entries of a search or playlist
	#[serde(default)]
	pub entries:      Option<Vec<MetadataRecord>>,
}

impl MetadataRecord {
	/// Parse a record from the raw JSON bytes output by youtube-dl
	pub fn from_json_slice(input: &[u8]) -> Result<Self, crate::Error> {
		return Ok(serde_json::from_slice(input)?);
	}
}
