//! Module for [`TerminalSink`], the [`OutputSink`] drawing to the terminal

use std::sync::{
	LazyLock,
	Mutex,
};

use colored::{
	Color,
	Colorize,
};
use indicatif::{
	ProgressBar,
	ProgressStyle,
};
use libdawnloader::{
	error::ErrorInner,
	main::download::{
		Completion,
		progress::{
			ProgressEvent,
			ProgressStatus,
		},
	},
	traits::output_sink::OutputSink,
};

use crate::{
	clap_conf::CliDerive,
	utils,
};

/// Static for easily referencing the 100% length for a progressbar
const PG_PERCENT_100: u64 = 100;
/// Static size the Download Progress Style will take (plus some spacers)
/// currently accounts for `[00:00:00] ` + 30 bar characters + ` 100% `
const STYLE_STATIC_SIZE: usize = 47;

/// Style for the progressbar of a single request
static DOWNLOAD_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
	return ProgressStyle::default_bar()
		.template("[{elapsed_precise}] {bar:30.cyan/blue} {pos:>3}% {msg}")
		.expect("Expected ProgressStyle template to be valid")
		.progress_chars("#>-");
});

/// Message shown once all data is transferred, but the postprocessors still run
const POSTPROCESS_MESSAGE: &str = "Processing...";

/// [`OutputSink`] that draws a progressbar when interactive and plain lines otherwise
///
/// The progressbar is created new for every request with [`TerminalSink::begin`].
#[derive(Debug)]
pub struct TerminalSink {
	/// The progressbar of the current request, if any
	pgbar:       Mutex<Option<ProgressBar>>,
	/// Draw a progressbar instead of plain lines
	interactive: bool,
}

impl TerminalSink {
	/// Crate a new instance of [`TerminalSink`], interactivity is taken from `main_args`
	pub fn new(main_args: &CliDerive) -> Self {
		return Self {
			pgbar:       Mutex::new(None),
			interactive: main_args.is_interactive(),
		};
	}

	/// Prepare a fresh progressbar for the next request
	pub fn begin(&self, main_args: &CliDerive) {
		let bar = ProgressBar::hidden()
			.with_style(DOWNLOAD_STYLE.clone())
			.with_position(0);
		bar.set_length(PG_PERCENT_100);
		utils::set_progressbar(&bar, main_args);

		if let Ok(mut guard) = self.pgbar.lock() {
			// a bar of a earlier request that never got a final result
			if let Some(old) = guard.replace(bar) {
				old.finish_and_clear();
			}
		}
	}

	/// Run `f` with the current progressbar, if there is one
	fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
		if let Ok(guard) = self.pgbar.lock() {
			if let Some(bar) = guard.as_ref() {
				f(bar);
			}
		}
	}

	/// Clear the current progressbar, so that the final line is printed cleanly
	fn end(&self) {
		if let Ok(mut guard) = self.pgbar.lock() {
			if let Some(bar) = guard.take() {
				bar.finish_and_clear();
			}
		}
	}
}

impl OutputSink for TerminalSink {
	fn status(&self, msg: &str) {
		if !self.interactive {
			println!("{}", msg);
			return;
		}

		self.with_bar(|bar| {
			bar.set_message(utils::truncate_message_term_width(msg, STYLE_STATIC_SIZE));
			bar.set_position(0);
		});
	}

	fn progress(&self, event: &ProgressEvent) {
		if !self.interactive {
			trace!("Progress: {:?}", event);
			return;
		}

		match event.status {
			ProgressStatus::Downloading => {
				#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // always within 0..=100
				let percent = event.percent.round() as u64;
				self.with_bar(|bar| {
					bar.set_position(percent.min(PG_PERCENT_100));
				});
			},
			ProgressStatus::Finished => {
				self.with_bar(|bar| {
					bar.set_position(PG_PERCENT_100);
					bar.set_message(POSTPROCESS_MESSAGE);
				});
			},
			ProgressStatus::Error => {
				debug!("Download reported a error, waiting for the final result");
			},
		}
	}

	fn success(&self, completion: &Completion) {
		self.end();

		println!("{} {}", "Downloaded:".color(Color::Green), completion_line(completion));

		if let Some(path) = &completion.path {
			info!("Saved to \"{}\"", path.display());
		}
	}

	fn failure(&self, err: &libdawnloader::Error) {
		self.end();

		// not a failure of the request itself, the user only needs to type something
		if matches!(err.inner(), ErrorInner::EmptyQuery) {
			println!("{}", err.message().color(Color::Yellow));
			return;
		}

		println!("{} {}", "Error:".color(Color::Red), err.message());
		// only captured when enabled with "RUST_BACKTRACE"
		trace!("Error backtrace:\n{}", err.get_backtrace());
	}
}

/// Format the line shown for a finished download, like "Title (Uploader, 3:32)"
fn completion_line(completion: &Completion) -> String {
	let media = &completion.media;

	return match media.duration_display() {
		Some(duration) => format!("{} ({}, {})", media.title, media.uploader, duration),
		None => format!("{} ({})", media.title, media.uploader),
	};
}
