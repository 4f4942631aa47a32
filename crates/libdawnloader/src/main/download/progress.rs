//! Module for converting raw youtube-dl progress reports into [`ProgressEvent`]s

use std::sync::LazyLock;

use regex::Regex;

/// Status of a [`ProgressEvent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
	/// The transfer is in progress, the percent is meaningful
	Downloading,
	/// The transfer is complete, post-processing is about to start
	Finished,
	/// The service reported a error for the transfer
	Error,
}

/// A normalized progress event, emitted many times per request and never persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
	/// The status of the transfer
	pub status:  ProgressStatus,
	/// The percentage of the transfer in range `0..=100`, only meaningful for [`ProgressStatus::Downloading`]
	pub percent: f64,
}

impl ProgressEvent {
	/// Create a [`ProgressStatus::Downloading`] event
	pub fn downloading(percent: f64) -> Self {
		return Self {
			status: ProgressStatus::Downloading,
			percent,
		};
	}

	/// Create a [`ProgressStatus::Finished`] event, always with 100 percent
	pub fn finished() -> Self {
		return Self {
			status:  ProgressStatus::Finished,
			percent: 100.0,
		};
	}

	/// Create a [`ProgressStatus::Error`] event
	pub fn error() -> Self {
		return Self {
			status:  ProgressStatus::Error,
			percent: 0.0,
		};
	}
}

/// A progress report as emitted by the service, before any parsing
#[derive(Debug, Clone, PartialEq)]
pub struct RawProgress {
	/// The status string, like "downloading" or "finished"
	pub status:      String,
	/// The percentage string, like " 45.3%", may be missing or not be a number at all
	pub percent_str: Option<String>,
}

impl RawProgress {
	/// Crate a new instance of [`RawProgress`]
	pub fn new<S: Into<String>>(status: S, percent_str: Option<String>) -> Self {
		return Self {
			status: status.into(),
			percent_str,
		};
	}
}

/// Convert a [`RawProgress`] into a [`ProgressEvent`]
///
/// Returns [`None`] for unknown statuses and for "downloading" reports whose percentage cannot be parsed or is outside `0..=100`,
/// a malformed report must never abort the download
pub fn normalize(raw: &RawProgress) -> Option<ProgressEvent> {
	return match raw.status.trim() {
		"downloading" => {
			let percent = parse_percent(raw.percent_str.as_deref()?)?;

			Some(ProgressEvent::downloading(percent))
		},
		"finished" => Some(ProgressEvent::finished()),
		"error" => Some(ProgressEvent::error()),
		other => {
			trace!("Ignoring unknown progress status \"{}\"", other);
			None
		},
	};
}

/// Parse a percent string like " 45.3%" (possibly with terminal color codes) into a float
/// Returns [`None`] if not parseable or not in range `0..=100`
fn parse_percent(input: &str) -> Option<f64> {
	/// Regex to match terminal escape sequences (like colors)
	static ANSI_ESCAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
		return Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").unwrap();
	});

	let cleaned = ANSI_ESCAPE_REGEX.replace_all(input, "");
	let cleaned = cleaned.trim();
	let cleaned = cleaned.strip_suffix('%').unwrap_or(cleaned).trim_end();

	let percent = cleaned.parse::<f64>().ok()?;

	// this also filters out "NaN"
	if !(0.0..=100.0).contains(&percent) {
		return None;
	}

	return Some(percent);
}
