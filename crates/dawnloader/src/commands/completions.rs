use std::io::{
	BufWriter,
	Write,
};

use clap::CommandFactory;
use clap_complete::generate;
use libdawnloader::error::IOErrorToError;

use crate::clap_conf::{
	CliDerive,
	CommandCompletions,
};

/// Handler function for the "completions" subcommand
/// This function is mainly to keep the code structured and sorted
#[inline]
pub fn command_completions(_main_args: &CliDerive, sub_args: &CommandCompletions) -> Result<(), crate::Error> {
	let mut writer: BufWriter<Box<dyn Write>> = match &sub_args.output_file_path {
		Some(v) => {
			if v.exists() {
				return Err(crate::Error::custom_ioerror_path(
					std::io::ErrorKind::AlreadyExists,
					"Output file already exists",
					v,
				));
			}
			if let Some(parent) = v.parent() {
				std::fs::create_dir_all(parent).attach_path_err(parent)?;
			}
			BufWriter::new(Box::from(std::fs::File::create(v).attach_path_err(v)?))
		},
		None => BufWriter::new(Box::from(std::io::stdout())),
	};

	write_completions(sub_args.shell, &mut writer);

	writer.flush().attach_location_err("completions flush")?;

	return Ok(());
}

/// Generate the completions for `shell` into `writer`
fn write_completions<W: Write>(shell: clap_complete::Shell, writer: &mut W) {
	let mut parsed = CliDerive::command();
	let bin_name = parsed.get_bin_name().unwrap_or("dawnloader").to_string();
	generate(shell, &mut parsed, bin_name, writer);
}
