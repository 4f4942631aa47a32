#![allow(clippy::needless_return)]
#![warn(clippy::implicit_return)]

#[macro_use]
extern crate log;

use std::sync::RwLock;

mod clap_conf;
use clap_conf::*;

mod commands;
mod logger;
mod sink;
mod state;
mod utils;

pub use libdawnloader::Error;

/// Exit code used when exiting because of a (repeated) termination request
const TERMINATION_EXIT_CODE: i32 = 130;

/// Tracks termination requests (like CTRL+C)
#[derive(Debug)]
pub struct Terminate {
	/// How often termination was requested
	requested: usize,
	/// A request is currently running, which should be allowed to finish
	in_flight: bool,
}

impl Terminate {
	/// Crate a new instance of [`Terminate`]
	const fn new() -> Self {
		return Self {
			requested: 0,
			in_flight: false,
		};
	}

	/// Get whether termination was requested at least once
	pub fn termination_requested(&self) -> bool {
		return self.requested > 0;
	}

	/// Set whether a request is currently in flight
	pub fn set_in_flight(&mut self, in_flight: bool) {
		self.in_flight = in_flight;
	}

	/// Record a termination request
	/// Returns "true" if the process should exit immediately
	fn request(&mut self) -> bool {
		self.requested += 1;

		return !self.in_flight || self.requested > 1;
	}
}

/// Global termination state, set by the CTRL+C handler
pub static TERMINATE: RwLock<Terminate> = RwLock::new(Terminate::new());

/// Main
fn main() -> Result<(), crate::Error> {
	let logger_handle = logger::setup_logger()?;

	let cli_matches = CliDerive::custom_parse()?;

	if cli_matches.force_color {
		colored::control::set_override(true);
	} else if !cli_matches.enable_colors() {
		colored::control::set_override(false);
	}

	log::info!("CLI Verbosity is {}", cli_matches.verbosity);

	// apply cli "verbosity" argument to the log level
	logger::apply_verbosity(&logger_handle, cli_matches.verbosity)?;

	ctrlc::set_handler(|| {
		let exit_now = match TERMINATE.write() {
			Ok(mut lock) => lock.request(),
			Err(_) => true,
		};

		if exit_now {
			// children run in their own process group, so they did not get the interrupt
			libdawnloader::spawn::group::terminate_running();
			std::process::exit(TERMINATION_EXIT_CODE);
		}

		eprintln!("Termination requested, finishing the current request first (press again to exit now)");
	})
	.map_err(|err| return crate::Error::other(format!("Could not set termination handler: {err}")))?;

	match &cli_matches.subcommands {
		Some(SubCommands::Download(v)) => commands::download::command_download(&cli_matches, v),
		Some(SubCommands::Interactive(v)) => commands::interactive::command_interactive(&cli_matches, v),
		Some(SubCommands::Completions(v)) => commands::completions::command_completions(&cli_matches, v),
		None => commands::interactive::command_interactive(&cli_matches, &CommandInteractive::from_env()?),
	}?;

	return Ok(());
}
