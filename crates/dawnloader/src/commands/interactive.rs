//! Module for the "interactive" subcommand, the request prompt loop

use std::{
	str::FromStr,
	sync::Arc,
};

use colored::{
	Color,
	Colorize,
};
use libdawnloader::{
	data::mode::DownloadMode,
	main::{
		query::Query,
		worker::RequestWorker,
	},
	traits::output_sink::OutputSink,
};

use super::{
	check_termination,
	set_in_flight,
};
use crate::{
	clap_conf::{
		CliDerive,
		CommandInteractive,
	},
	sink::TerminalSink,
	state::SessionState,
	utils,
};

/// Inputs that end the prompt loop
const EXIT_INPUTS: &[&str] = &[":q", ":quit", ":exit"];

/// What the prompt loop should do with a line of input
#[derive(Debug, PartialEq)]
enum PromptInput {
	/// The user wants to leave
	Exit,
	/// A query that can be submitted
	Query(String),
	/// A input that was rejected, with the reason
	Rejected(crate::Error),
}

/// Decide what to do with a line from the query prompt
/// [`None`] means stdin was closed, which is handled like a exit
fn parse_prompt_input(input: Option<String>) -> PromptInput {
	let Some(input) = input else {
		return PromptInput::Exit;
	};

	if EXIT_INPUTS.contains(&input.trim()) {
		return PromptInput::Exit;
	}

	// validate early, so that the mode is not asked for a input that would fail anyway
	return match Query::new(&input) {
		Ok(_) => PromptInput::Query(input),
		Err(err) => PromptInput::Rejected(err),
	};
}

/// Handler function for the "interactive" subcommand
/// This function is mainly to keep the code structured and sorted
#[inline]
pub fn command_interactive(main_args: &CliDerive, sub_args: &CommandInteractive) -> Result<(), crate::Error> {
	let state = SessionState::new(&sub_args.session)?;

	println!(
		"Saving to \"{}\", type \"{}\" to exit",
		state.save_dir().path().display(),
		EXIT_INPUTS[0]
	);

	let sink = Arc::new(TerminalSink::new(main_args));
	let mut worker = RequestWorker::new(state.service(), Arc::clone(&sink), state.save_dir().clone());

	loop {
		if check_termination().is_err() {
			break;
		}

		let query = match parse_prompt_input(utils::read_line("Paste Link or Search Name")?) {
			PromptInput::Exit => break,
			PromptInput::Query(v) => v,
			PromptInput::Rejected(err) => {
				sink.failure(&err);
				continue;
			},
		};

		// stdin got closed while asking for the mode, handled like the query prompt
		let Some(mode) = utils::get_input(
			&format!(
				"Select Format, v = {}, a = {}",
				DownloadMode::Video.label(),
				DownloadMode::Audio.label()
			),
			&["V", "a"],
			"v",
		)?
		else {
			break;
		};
		let mode = DownloadMode::from_str(&mode)?;
		println!("Mode: {}", mode.label().color(Color::Cyan));

		sink.begin(main_args);
		set_in_flight(true)?;

		if let Err(err) = worker.submit(state.request(query, mode)) {
			set_in_flight(false)?;

			if err.is_request_error() {
				sink.failure(&err);
				continue;
			}

			return Err(err);
		}

		// the request reports its own progress and result through the sink
		let res = worker.wait();
		set_in_flight(false)?;

		match res {
			Some(Err(err)) if !err.is_request_error() => return Err(err),
			Some(_) => (),
			None => warn!("Submitted request had no result"),
		}
	}

	println!("Bye");

	return Ok(());
}
