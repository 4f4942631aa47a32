//! Module for the [`ProgressObserver`] trait

use crate::main::download::progress::ProgressEvent;

/// Observer for normalized download progress
///
/// [`ProgressObserver::on_event`] is called zero or more times before [`crate::main::download::download`] returns.
/// It is called from whatever thread runs the download, which commonly is not the primary thread,
/// so implementations need to be [`Send`] and must not assume to be on the thread that created them.
pub trait ProgressObserver: Send {
	/// Handle a single [`ProgressEvent`]
	fn on_event(&mut self, event: ProgressEvent);
}

impl<F> ProgressObserver for F
where
	F: FnMut(ProgressEvent) + Send,
{
	fn on_event(&mut self, event: ProgressEvent) {
		self(event);
	}
}
