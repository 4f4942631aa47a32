//! Module for the [`OutputSink`] trait

use crate::main::download::{
	Completion,
	progress::ProgressEvent,
};

/// Capability to report what a request is currently doing, passed explicitly into the request flow
///
/// Like [`super::progress::ProgressObserver`], all methods may be called from a non-primary thread.
pub trait OutputSink: Send + Sync {
	/// Report a short status text, like "Searching and Processing..."
	fn status(&self, msg: &str);
	/// Report a normalized progress event of the current download
	fn progress(&self, event: &ProgressEvent);
	/// Report that the request finished successfully
	fn success(&self, completion: &Completion);
	/// Report that the request failed, `err` is already a request-level error with a truncated message
	fn failure(&self, err: &crate::Error);
}
