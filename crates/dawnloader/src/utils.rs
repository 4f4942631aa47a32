//! Utils for the `dawnloader` binary

use crate::clap_conf::CliDerive;
use indicatif::{
	ProgressBar,
	ProgressDrawTarget,
};
use libdawnloader::error::IOErrorToError;
use std::{
	borrow::Cow,
	io::{
		BufRead,
		Write,
	},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Suffix added to messages truncated by [`truncate_message_display_pos`]
const ELLIPSIS: &str = "...";

/// Helper function to set the progressbar to a draw target if mode is interactive
pub fn set_progressbar(bar: &ProgressBar, main_args: &CliDerive) {
	if main_args.is_interactive() {
		bar.set_draw_target(ProgressDrawTarget::stderr());
	}
}

/// Ask the user for a single choice out of `possible`, case-insensitive
/// Returns the lowercased input, `default` if the input was empty, or [`None`] when stdin got closed (EOF)
pub fn get_input(msg: &str, possible: &[&'static str], default: &'static str) -> Result<Option<String>, crate::Error> {
	return get_input_from(&mut std::io::stdin().lock(), msg, possible, default);
}

/// Ask for a single choice by reading from `reader`, see [`get_input`]
fn get_input_from<R: BufRead>(
	reader: &mut R,
	msg: &str,
	possible: &[&'static str],
	default: &'static str,
) -> Result<Option<String>, crate::Error> {
	let possible_converted = possible
		.iter()
		.map(|v| {
			return v.to_lowercase();
		})
		.collect::<Vec<String>>();
	// dont use "possible_converted" for "possible_converted_string", because otherwise the default will not be shown anymore
	let possible_converted_string = possible.join("/");
	loop {
		print!("{} [{}]: ", msg, possible_converted_string);
		// ensure the message is printed before reading
		std::io::stdout().flush().attach_location_err("stdout flush")?;

		// stdin got closed, there will never be a valid input
		let Some(input) = read_line_from(reader)? else {
			return Ok(None);
		};

		let input = input.trim().to_lowercase();

		// return default if empty and default is set
		if input.is_empty() {
			if default.is_empty() {
				// special case when empty, to more emphasize that its empty
				println!("... Invalid Input: (Empty)");
				continue;
			}

			return Ok(Some(default.to_owned()));
		}

		if possible_converted.contains(&input) {
			return Ok(Some(input));
		}

		println!("... Invalid Input: \"{}\"", input);
	}
}

/// Ask the user for a free-text line
/// Returns [`None`] when stdin got closed (EOF), otherwise the line without the line-ending
pub fn read_line(msg: &str) -> Result<Option<String>, crate::Error> {
	print!("{}: ", msg);
	std::io::stdout().flush().attach_location_err("stdout flush")?;

	return read_line_from(&mut std::io::stdin().lock());
}

/// Read a single line from `reader`, see [`read_line`]
fn read_line_from<R: BufRead>(reader: &mut R) -> Result<Option<String>, crate::Error> {
	let mut input = String::new();
	let read = reader.read_line(&mut input).attach_location_err("stdin read_line")?;

	if read == 0 {
		return Ok(None);
	}

	return Ok(Some(input.trim_end_matches(['\n', '\r']).to_owned()));
}

/// Get the display width of a single grapheme
fn grapheme_display_width(grapheme: &str) -> usize {
	let width = grapheme.width();

	// VS16 requests emoji-style, which some terminals draw 2 wide even when the base character is 1 wide
	if cfg!(feature = "workaround_fe0f") && width == 1 && grapheme.contains('\u{fe0f}') {
		return 2;
	}

	return width;
}

/// Truncate `msg` so that it takes at most `display_width_available` terminal columns
/// Adds [`ELLIPSIS`] when truncated and `add_ellipsis` is set (and there is space for it)
///
/// Returns the input unmodified if it already fits
pub fn truncate_message_display_pos<M>(msg: &M, display_width_available: usize, add_ellipsis: bool) -> Cow<'_, str>
where
	M: AsRef<str> + ?Sized,
{
	let msg = msg.as_ref();

	let total_width: usize = msg.graphemes(true).map(grapheme_display_width).sum();

	if total_width <= display_width_available {
		return Cow::Borrowed(msg);
	}

	let add_ellipsis = add_ellipsis && display_width_available >= ELLIPSIS.len();
	let available_for_msg = if add_ellipsis {
		display_width_available - ELLIPSIS.len()
	} else {
		display_width_available
	};

	let mut used_width = 0;
	let mut cut_at = 0;

	for (idx, grapheme) in msg.grapheme_indices(true) {
		let width = grapheme_display_width(grapheme);

		if used_width + width > available_for_msg {
			break;
		}

		used_width += width;
		cut_at = idx + grapheme.len();
	}

	let mut truncated = String::with_capacity(cut_at + ELLIPSIS.len());
	truncated.push_str(&msg[..cut_at]);

	if add_ellipsis {
		truncated.push_str(ELLIPSIS);
	}

	return Cow::Owned(truncated);
}

/// Truncate `msg` to the current terminal width minus `static_size`
/// Returns the message unmodified if the terminal width cannot be determined
pub fn truncate_message_term_width<M>(msg: &M, static_size: usize) -> String
where
	M: AsRef<str> + ?Sized,
{
	let display_width_available = terminal_size::terminal_size().map(|(w, _h)| {
		return (w.0 as usize).saturating_sub(static_size);
	});

	let Some(display_width_available) = display_width_available else {
		return msg.as_ref().into();
	};

	return truncate_message_display_pos(msg, display_width_available, true).to_string();
}
