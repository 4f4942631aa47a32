//! Module for Clap related structs (derived)

#![deny(missing_docs)] // comments are used for "--help" generation, so it should always be defined

use clap::{
	ArgAction,
	Args,
	Parser,
	Subcommand,
};
use is_terminal::IsTerminal;
use std::{
	ffi::OsString,
	path::PathBuf,
};

/// Trait to check and transform all Command Structures
trait Check {
	/// Check and transform self to be correct
	fn check(&mut self) -> Result<(), crate::Error>;
}

#[derive(Debug, Parser, Clone, PartialEq)]
#[command(author, version = env!("DAWNLOADER_VERSION"), about, long_about = None)]
#[command(bin_name("dawnloader"))]
#[command(args_override_self(true))] // specifying a argument multiple times overwrites the earlier ones
#[command(disable_help_subcommand(true))] // Disable subcommand "help", only "-h --help" should be used
pub struct CliDerive {
	/// Set Logging verbosity (0 - Default - WARN, 1 - INFO, 2 - DEBUG, 3 - TRACE)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	pub verbosity:    u8,
	/// Explicitly set interactive / not interactive
	#[arg(long = "interactive", global = true)]
	pub explicit_tty: Option<bool>,
	/// Force Color to be active in any mode
	#[arg(long = "color", global = true)]
	pub force_color:  bool,

	/// Run without a subcommand to start the interactive prompt
	#[command(subcommand)]
	pub subcommands: Option<SubCommands>,
}

impl CliDerive {
	/// Execute clap::Parser::parse and apply custom validation and transformation logic
	pub fn custom_parse() -> Result<Self, crate::Error> {
		let mut parsed = Self::parse();

		Check::check(&mut parsed)?;

		return Ok(parsed);
	}

	/// Get if the mode is interactive or not
	#[must_use]
	pub fn is_interactive(&self) -> bool {
		if let Some(explicit) = self.explicit_tty {
			return explicit;
		}

		return std::io::stdout().is_terminal() && std::io::stdin().is_terminal();
	}

	/// Get if the colors are enabled or not
	#[must_use]
	pub fn enable_colors(&self) -> bool {
		return self.force_color | self.is_interactive();
	}
}

impl Check for CliDerive {
	fn check(&mut self) -> Result<(), crate::Error> {
		return match &mut self.subcommands {
			Some(v) => Check::check(v),
			None => Ok(()),
		};
	}
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum SubCommands {
	/// Download a single link or search term and exit
	Download(CommandDownload),
	/// Repeatedly ask for a link or search term and download it (the default)
	Interactive(CommandInteractive),
	/// Generate shell completions
	Completions(CommandCompletions),
}

impl Check for SubCommands {
	fn check(&mut self) -> Result<(), crate::Error> {
		match self {
			SubCommands::Download(v) => return Check::check(v),
			SubCommands::Interactive(v) => return Check::check(v),
			SubCommands::Completions(v) => return Check::check(v),
		}
	}
}

/// Options shared by every command that downloads something
#[derive(Debug, Args, Clone, PartialEq, Default)]
pub struct SessionArgs {
	/// Directory to save downloads into, by default "/sdcard/Download/Dawnloader" (if "/sdcard" exists) or "~/Downloads/Dawnloader", with "./Dawnloader" as fallback
	#[arg(short, long = "output", env = "DAWN_OUT")]
	pub output_path:            Option<PathBuf>,
	/// Also save the thumbnail of the media next to the downloaded file
	#[arg(long = "write-thumbnail")]
	pub write_thumbnail:        bool,
	/// Print Youtube-DL stdout
	/// This will still require logging verbosity set to 3 or "RUST_LOG=trace"
	#[arg(long = "youtubedl-stdout")]
	pub print_youtubedl_stdout: bool,
	/// Extra arguments for youtube-dl, can be specified multiple times
	/// Argument and value may be given as one, like "--limit-rate 1M"
	#[arg(long = "extra-ytdl-arg", allow_hyphen_values = true)]
	pub extra_ytdl_args:        Vec<String>,
}

impl SessionArgs {
	/// Get all extra youtube-dl arguments, with argument and value split into separate arguments (split once)
	#[must_use]
	pub fn extra_ytdl_args_split(&self) -> Vec<OsString> {
		return self
			.extra_ytdl_args
			.iter()
			.flat_map(|v| {
				if let Some((split1, split2)) = v.split_once(' ') {
					return Vec::from([OsString::from(split1), OsString::from(split2)]);
				}
				return Vec::from([OsString::from(v)]);
			})
			.collect();
	}
}

impl Check for SessionArgs {
	fn check(&mut self) -> Result<(), crate::Error> {
		self.extra_ytdl_args = self
			.extra_ytdl_args
			.iter()
			.map(|v| return v.trim())
			.filter(|v| return !v.is_empty())
			.map(|v| return v.to_owned())
			.collect();

		if let Some(path) = &self.output_path {
			if path.as_os_str().is_empty() {
				self.output_path = None;
			} else if path.is_file() {
				return Err(crate::Error::invalid_options(format!(
					"Output path \"{}\" is a file, expected a directory",
					path.display()
				)));
			}
		}

		return Ok(());
	}
}

/// Download a single link or search term and exit
#[derive(Debug, Parser, Clone, PartialEq)]
pub struct CommandDownload {
	/// Download the audio only and convert it to mp3 (default is the best video)
	#[arg(short = 'a', long = "audio-only")]
	pub audio_only_enable: bool,

	/// Options shared with the interactive prompt
	#[command(flatten)]
	pub session: SessionArgs,

	/// Link or search term to download, multiple values are joined with a space
	#[arg(required = true, num_args = 1..)]
	pub query: Vec<String>,
}

impl CommandDownload {
	/// Get the query as a single string, like it would have been typed into the prompt
	#[must_use]
	pub fn joined_query(&self) -> String {
		return self.query.join(" ");
	}
}

impl Check for CommandDownload {
	fn check(&mut self) -> Result<(), crate::Error> {
		if self.query.iter().all(|v| return v.trim().is_empty()) {
			return Err(crate::Error::empty_query());
		}

		return Check::check(&mut self.session);
	}
}

/// Repeatedly ask for a link or search term and download it
#[derive(Debug, Parser, Clone, PartialEq, Default)]
pub struct CommandInteractive {
	/// Options used for every request of the prompt
	#[command(flatten)]
	pub session: SessionArgs,
}

impl CommandInteractive {
	/// Create a [`CommandInteractive`] only from environment variables and defaults, for when no subcommand is given
	pub fn from_env() -> Result<Self, crate::Error> {
		let mut parsed = Self::try_parse_from(["dawnloader"])
			.map_err(|err| return crate::Error::invalid_options(format!("{err}")))?;

		Check::check(&mut parsed)?;

		return Ok(parsed);
	}
}

impl Check for CommandInteractive {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Check::check(&mut self.session);
	}
}

/// Generate shell completions
#[derive(Debug, Parser, Clone, PartialEq)]
pub struct CommandCompletions {
	/// Shell to generate completions for
	pub shell:            clap_complete::Shell,
	/// File to write the completions to, by default stdout
	#[arg(long = "out")]
	pub output_file_path: Option<PathBuf>,
}

impl Check for CommandCompletions {
	fn check(&mut self) -> Result<(), crate::Error> {
		return Ok(());
	}
}
