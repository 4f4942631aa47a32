//! Module for the "download" subcommand, a single request without a prompt

use libdawnloader::{
	data::mode::DownloadMode,
	main::request::process_request,
};

use crate::{
	clap_conf::{
		CliDerive,
		CommandDownload,
	},
	sink::TerminalSink,
	state::SessionState,
};

/// Handler function for the "download" subcommand
/// This function is mainly to keep the code structured and sorted
#[inline]
pub fn command_download(main_args: &CliDerive, sub_args: &CommandDownload) -> Result<(), crate::Error> {
	let state = SessionState::new(&sub_args.session)?;

	let mode = if sub_args.audio_only_enable {
		DownloadMode::Audio
	} else {
		DownloadMode::Video
	};

	let request = state.request(sub_args.joined_query(), mode);
	let sink = TerminalSink::new(main_args);
	sink.begin(main_args);

	// nothing else needs the main thread, so no worker is needed
	let res = process_request(state.service().as_ref(), &request, state.save_dir(), &sink);

	match res {
		Ok(_) => return Ok(()),
		// the error was already reported by the sink, only the exit code needs to be set
		Err(err) if err.is_request_error() => {
			warn!("Exiting with non-zero code because of a failed request");
			std::process::exit(1);
		},
		Err(err) => return Err(err),
	}
}
