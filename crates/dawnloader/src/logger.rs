//! Module for all Logger related things

use colored::{
	Color,
	Colorize,
};
use flexi_logger::{
	DeferredNow,
	LogSpecification,
	Logger,
	LoggerHandle,
	Record,
	style,
};

/// Function for setting up the logger
/// This function is mainly to keep the code structured and sorted
#[inline]
pub fn setup_logger() -> Result<LoggerHandle, crate::Error> {
	let handle = Logger::try_with_env_or_str("warn")
		.map_err(|err| return crate::Error::other(format!("Could not parse log specification: {err}")))?
		.adaptive_format_for_stderr(flexi_logger::AdaptiveFormat::Custom(log_format, color_log_format))
		.log_to_stderr()
		.start()
		.map_err(|err| return crate::Error::other(format!("Could not start logger: {err}")))?;

	return Ok(handle);
}

/// Get the log specification string for the given "-v" count
/// Returns [`None`] for a count of 0, so that the "RUST_LOG" or default specification stays in place
pub fn verbosity_spec(verbosity: u8) -> Option<&'static str> {
	return match verbosity {
		0 => None,
		1 => Some("info"),
		2 => Some("debug"),
		_ => Some("trace"),
	};
}

/// Apply the verbosity from the cli to the already running logger
pub fn apply_verbosity(handle: &LoggerHandle, verbosity: u8) -> Result<(), crate::Error> {
	let Some(spec) = verbosity_spec(verbosity) else {
		return Ok(());
	};

	let spec = LogSpecification::parse(spec)
		.map_err(|err| return crate::Error::other(format!("Could not parse log specification: {err}")))?;
	handle.set_new_spec(spec);

	return Ok(());
}

/// ISO 8601 Time Format for logging
/// format to be "1977-11-30T13:30:30.000+0200"
pub const ISO8601_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Logging format for log files and non-interactive formats
/// Not Colored and not padded
///
/// Example Lines:
/// `[2022-03-02T13:42:43.374+0100 ERROR module]: test line`
/// `[2022-03-02T13:42:43.374+0100 WARN module::deeper]: test line`
pub fn log_format(w: &mut dyn std::io::Write, now: &mut DeferredNow, record: &Record) -> Result<(), std::io::Error> {
	return write!(
		w,
		"[{} {} {}]: {}", // dont pad anything for non-interactive logs
		now.format(ISO8601_TIME_FORMAT),
		record.level(),
		record.module_path().unwrap_or("<unnamed module>"),
		&record.args()
	);
}

/// Logging format for a tty for interactive formats
/// Colored and padded
///
/// Example Lines:
/// `[2022-03-02T13:42:43.374+0100 ERROR module]: test line`
/// `[2022-03-02T13:42:43.374+0100 WARN  module::deeper]: test line`
pub fn color_log_format(
	w: &mut dyn std::io::Write,
	now: &mut DeferredNow,
	record: &Record,
) -> Result<(), std::io::Error> {
	let level = record.level();
	return write!(
		w,
		"[{} {} {}]: {}",
		now.format(ISO8601_TIME_FORMAT).to_string().color(Color::BrightBlack), // Bright Black = Grey
		style(level).paint(format!("{:5}", level)), // pad level to 5 characters, cannot be done in the string itself, because of the color characters
		record.module_path().unwrap_or("<unnamed module>"),
		&record.args() // dont apply any color to the input, so that the input can dynamically set the color
	);
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_verbosity_spec() {
		assert_eq!(None, verbosity_spec(0));
		assert_eq!(Some("info"), verbosity_spec(1));
		assert_eq!(Some("debug"), verbosity_spec(2));
		assert_eq!(Some("trace"), verbosity_spec(3));
		assert_eq!(Some("trace"), verbosity_spec(10));
	}

	#[test]
	fn test_verbosity_specs_parse() {
		for verbosity in 1..=3 {
			let spec = verbosity_spec(verbosity).expect("Expected a spec for non-zero verbosity");
			assert!(LogSpecification::parse(spec).is_ok());
		}
	}
}
