//! Module for all (longer) commands

pub mod completions;
pub mod download;
pub mod interactive;

/// Helper to quickly check for termination
fn check_termination() -> Result<(), crate::Error> {
	// handle terminate
	if crate::TERMINATE
		.read()
		.map_err(|err| return crate::Error::other(format!("{err}")))?
		.termination_requested()
	{
		return Err(crate::Error::other("Termination Requested"));
	}

	return Ok(());
}

/// Set whether a request is currently in flight, for the termination handler
fn set_in_flight(in_flight: bool) -> Result<(), crate::Error> {
	crate::TERMINATE
		.write()
		.map_err(|err| return crate::Error::other(format!("{err}")))?
		.set_in_flight(in_flight);

	return Ok(());
}
