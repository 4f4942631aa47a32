//! Module for utility functions, that may be used in various other modules

use std::{
	borrow::Cow,
	path::{
		Path,
		PathBuf,
	},
};

use path_absolutize::Absolutize;
use unicode_segmentation::UnicodeSegmentation;

/// Simple helper to resolve "~" to the Home directory
/// System agnostic as long as [`dirs::home_dir`] support's it
pub fn expand_tidle<I: AsRef<Path>>(input: I) -> Option<PathBuf> {
	let path = input.as_ref();

	if !path.starts_with("~") {
		return Some(path.to_owned());
	}
	if path == Path::new("~") {
		return dirs::home_dir();
	}

	return dirs::home_dir().map(|mut v| {
		// handle case where "home_dir" might be set to the root POSIX directory
		return if v == Path::new("/") {
			// "unwrap" can be used, because it is already checked that the variable starts with value
			path.strip_prefix("~").unwrap().to_owned() // return the input path, just without "~"
		} else {
			// "unwrap" can be used, because it is already checked that the variable starts with value
			v.push(path.strip_prefix("~/").unwrap());
			v
		};
	});
}

/// Convert input path to a absolute path, without hitting the filesystem.
/// This function handles `~`(home)
///
/// If the start is not absolute, CWD will be used.
///
/// This functions behavior:
/// - `/path/to/inner/../somewhere` -> `/path/to/somewhere`
/// - `relative/to/somewhere` -> `CWD/relative/to/somewhere`
/// - `~/somewhere/in/home` -> `HOME/somewhere/in/home`
pub fn to_absolute<P: AsRef<Path>>(input: P) -> std::io::Result<PathBuf> {
	let Some(converted) = expand_tidle(input) else {
		return Err(std::io::Error::new(
			std::io::ErrorKind::InvalidInput,
			"Could not resolve \"~\"",
		));
	};

	return converted.absolutize().map(|v| return v.to_path_buf());
}

/// Suffix added to messages that got truncated by [`truncate_message`]
pub const TRUNCATE_SUFFIX: &str = "...";

/// Truncate `msg` to at most `max_graphemes` user-perceived characters, adding [`TRUNCATE_SUFFIX`] when something was cut
/// Returns the input unmodified if it already fits
///
/// Cuts on grapheme boundaries, so that combined characters (like emoji with modifiers) are never split
pub fn truncate_message(msg: &str, max_graphemes: usize) -> Cow<'_, str> {
	let mut graphemes = msg.grapheme_indices(true);

	// "nth" is 0-based, so this gets the first grapheme that would be too much
	let Some((cut_at, _)) = graphemes.nth(max_graphemes) else {
		return Cow::Borrowed(msg);
	};

	let mut truncated = String::with_capacity(cut_at + TRUNCATE_SUFFIX.len());
	truncated.push_str(msg[..cut_at].trim_end());
	truncated.push_str(TRUNCATE_SUFFIX);

	return Cow::Owned(truncated);
}

#[cfg(test)]
mod test {
	use super::*;

	mod expand_tidle {
		use super::*;

		#[test]
		fn basic_func() {
			// should not modify a absolute path
			let absolue_path = PathBuf::from("/absolute/to/path");
			assert_eq!(
				absolue_path,
				expand_tidle(&absolue_path).expect("Expected to return a SOME value")
			);

			// should not modify a relative path
			let relative_path = PathBuf::from("./inner/path");
			assert_eq!(
				relative_path,
				expand_tidle(&relative_path).expect("Expected to return a SOME value")
			);

			// should resolve "~" without extra paths
			let home_no_extensions = PathBuf::from("~");
			assert_eq!(
				dirs::home_dir().expect("Expected to return a SOME value"),
				expand_tidle(home_no_extensions).expect("Expected to return a SOME value")
			);

			// should resolve "~" with extra paths
			let home_with_extensions = PathBuf::from("~/some/path");
			assert_eq!(
				Path::join(&dirs::home_dir().expect("Expected to return a SOME value"), "some/path"),
				expand_tidle(home_with_extensions).expect("Expected to return a SOME value")
			);

			// should return weird path "~user"
			let weird_path = PathBuf::from("~user");
			assert_eq!(
				weird_path,
				expand_tidle(&weird_path).expect("Expected to return a SOME value")
			);
		}
	}

	mod to_absolute {
		use super::*;

		#[test]
		fn basic_func() {
			// should not modify the input
			let absolue_path = PathBuf::from("/absolute/to/path");
			assert_eq!(
				absolue_path,
				to_absolute(&absolue_path).expect("Expected to return a OK value")
			);

			// should modify the input, but not the base
			let absolue_containing_relative = PathBuf::from("/absolute/to/inner/../path");
			assert_eq!(
				absolue_path,
				to_absolute(absolue_containing_relative).expect("Expected to return a OK value")
			);

			// should add CWD as a base
			let relative_path = PathBuf::from("./inner/path");
			assert_eq!(
				Path::join(&std::env::current_dir().expect("Expected to have a CWD"), "inner/path"),
				to_absolute(relative_path).expect("Expected to return a OK value")
			);
		}
	}

	mod truncate_message {
		use super::*;

		#[test]
		fn should_not_modify_short_messages() {
			assert_eq!(Cow::Borrowed("short"), truncate_message("short", 10));
			// exact length is not truncated
			assert_eq!(Cow::Borrowed("0123456789"), truncate_message("0123456789", 10));
		}

		#[test]
		fn should_truncate_long_messages() {
			assert_eq!(
				"ERROR: [youtube] abc: Video unav...",
				truncate_message("ERROR: [youtube] abc: Video unavailable", 32)
			);
		}

		#[test]
		fn should_trim_whitespace_before_suffix() {
			assert_eq!("Hello...", truncate_message("Hello World", 6));
		}

		#[test]
		fn should_not_split_graphemes() {
			// "e" + combining acute accent is one grapheme
			let input = "cafe\u{301} au lait";
			assert_eq!("cafe\u{301}...", truncate_message(input, 4));
		}
	}
}
